use anyhow::Result;
use inquire::{InquireError, Text};
use sheetrename_core::MappingRules;
use std::path::Path;

/// Only a literal `y` or `Y` proceeds.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer, "y" | "Y")
}

pub fn show_plan_and_confirm(root: &Path, rules: &MappingRules) -> Result<bool> {
    println!("\n📁 Rename plan for {}:", root.display());
    println!("  {} directory mapping(s)", rules.directories.len());
    println!("  {} file mapping(s)", rules.files.len());

    let message = format!("Process directory '{}'? (y/n)", root.display());
    match Text::new(&message).prompt() {
        Ok(answer) => Ok(is_affirmative(&answer)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
