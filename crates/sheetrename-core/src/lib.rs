use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

pub mod mapping;
pub mod renamer;
pub mod workbook;

pub use mapping::{extract_mapping, ExtractGap, ExtractedMapping, MappingRules, NameMapping, SheetTable};
pub use renamer::{
    execute_tasks, resolve_collision, scan_tree, sort_deepest_first, split_extension, EntryKind,
    RenameTask, TaskOutcome,
};
pub use workbook::{load_rules, SheetNames};

#[derive(thiserror::Error, Debug)]
pub enum MappingError {
    #[error("Cannot open mapping workbook {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("Cannot read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum RenameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid target name '{name}'")]
    InvalidName { name: String },
}

/// A single entry that could not be renamed.
#[derive(Debug)]
pub struct RenameFailure {
    pub path: PathBuf,
    pub reason: RenameError,
}

#[derive(Debug, Default)]
pub struct RenameReport {
    pub scanned: usize,
    pub renamed: usize,
    pub collisions: usize,
    pub unchanged: usize,
    pub failures: Vec<RenameFailure>,
}

/// Scans `root`, orders the matches deepest first and renames them in place.
///
/// Per-entry failures are collected in the report; only a missing or
/// non-directory root is an error.
pub fn rename_tree(root: &Path, rules: &MappingRules) -> Result<RenameReport> {
    if !root.exists() {
        anyhow::bail!("Root directory does not exist: {:?}", root);
    }

    if !root.is_dir() {
        anyhow::bail!("Root must be a directory: {:?}", root);
    }

    info!("Starting rename under: {:?}", root);

    let mut tasks = scan_tree(root, rules);
    sort_deepest_first(&mut tasks);
    let report = execute_tasks(root, &tasks, rules);

    info!(
        "Rename complete: {} scanned, {} renamed, {} collisions, {} failed",
        report.scanned,
        report.renamed,
        report.collisions,
        report.failures.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rename_tree_end_to_end() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("skins/Old Hero")).unwrap();
        fs::write(temp.path().join("skins/Old Hero/icon.png"), "png").unwrap();
        fs::write(temp.path().join("skins/Old Hero/unrelated.txt"), "txt").unwrap();

        let rules = MappingRules::new(
            [("Old Hero", "New Hero")].into_iter().collect(),
            [("icon", "portrait")].into_iter().collect(),
        );

        let report = rename_tree(temp.path(), &rules).unwrap();

        assert_eq!(report.scanned, 2);
        assert_eq!(report.renamed, 2);
        assert!(report.failures.is_empty());
        assert!(temp.path().join("skins/New Hero/portrait.png").exists());
        assert!(temp.path().join("skins/New Hero/unrelated.txt").exists());
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = rename_tree(&temp.path().join("missing"), &MappingRules::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(rename_tree(&file, &MappingRules::default()).is_err());
    }

    #[test]
    fn test_failure_display() {
        let failure = RenameFailure {
            path: PathBuf::from("a.txt"),
            reason: RenameError::InvalidName {
                name: "../b".to_string(),
            },
        };
        assert_eq!(failure.reason.to_string(), "Invalid target name '../b'");
    }
}
