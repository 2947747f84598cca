mod cli;
mod prompt;

use anyhow::Result;
use cli::Cli;
use sheetrename_core::{MappingRules, RenameReport};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    setup_logging(&cli)?;

    info!("Starting sheetrename");

    if let Some(report) = run(&cli, prompt::show_plan_and_confirm)? {
        print_summary(&report);
    }

    info!("Sheetrename completed");
    Ok(())
}

fn run<F>(cli: &Cli, confirm: F) -> Result<Option<RenameReport>>
where
    F: FnOnce(&Path, &MappingRules) -> Result<bool>,
{
    info!("Reading mappings from {:?}", cli.mappings);

    let rules = sheetrename_core::load_rules(&cli.mappings, &cli.sheet_names())?;

    apply_rules(&cli.root, &rules, cli.yes, confirm)
}

/// Renames under `root` once confirmed. Returns `None` when nothing was attempted.
fn apply_rules<F>(
    root: &Path,
    rules: &MappingRules,
    assume_yes: bool,
    confirm: F,
) -> Result<Option<RenameReport>>
where
    F: FnOnce(&Path, &MappingRules) -> Result<bool>,
{
    if rules.is_empty() {
        warn!("No usable mappings found");
        println!("No valid mappings found, please check the spreadsheet layout.");
        return Ok(None);
    }

    info!(
        "Loaded {} directory mapping(s) and {} file mapping(s)",
        rules.directories.len(),
        rules.files.len()
    );

    if !root.is_dir() {
        anyhow::bail!("Root directory does not exist or is not a directory: {:?}", root);
    }

    if !assume_yes && !confirm(root, rules)? {
        println!("Operation cancelled.");
        return Ok(None);
    }

    Ok(Some(sheetrename_core::rename_tree(root, rules)?))
}

fn print_summary(report: &RenameReport) {
    println!("Renaming complete!");
    println!("  Entries matched: {}", report.scanned);
    println!("  Renamed: {}", report.renamed);
    println!("  Collisions resolved: {}", report.collisions);
    if report.unchanged > 0 {
        println!("  Unchanged: {}", report.unchanged);
    }
    println!("  Failed: {}", report.failures.len());
    for failure in &report.failures {
        println!("    ✗ {}: {}", failure.path.display(), failure.reason);
    }
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact()
        )
        .with(filter)
        .init();

    Ok(())
}
