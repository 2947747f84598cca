use std::path::Path;
use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

fn main() -> Result<()> {
    let args = clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about("Install sheetrename binary locally"))
        .subcommand(
            Command::new("run")
                .about("Build and run sheetrename with arguments")
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(clap::Arg::new("args")
                    .help("Arguments to pass to sheetrename")
                    .action(clap::ArgAction::Append)
                    .num_args(0..))
        )
        .subcommand(
            Command::new("test")
                .about("Test Operations")
                .subcommand(Command::new("all").about("Run all tests for the entire project"))
                .subcommand(Command::new("core").about("Run tests for sheetrename-core"))
                .subcommand(Command::new("bin").about("Run tests for sheetrename-bin"))
                .subcommand(Command::new("integration").about("Run integration tests"))
        )
        .get_matches();

    match args.subcommand() {
        Some(("install", args)) => handle_install_command(args),
        Some(("run", args)) => handle_run_command(args),
        Some(("test", args)) => handle_test_commands(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn cargo<I, S>(args: I) -> Result<process::ExitStatus>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Ok(process::Command::new("cargo").args(args).status()?)
}

fn handle_install_command(_args: &ArgMatches) -> Result<()> {
    println!("Installing sheetrename...");
    if !cargo(["install", "--path", "crates/sheetrename-bin"])?.success() {
        anyhow::bail!("Failed to install sheetrename");
    }

    println!("✓ sheetrename installed");
    Ok(())
}

fn handle_run_command(args: &ArgMatches) -> Result<()> {
    let passthrough = args
        .get_many::<String>("args")
        .into_iter()
        .flatten()
        .map(String::as_str);
    let command: Vec<&str> = ["run", "--bin", "sheetrename", "--"]
        .into_iter()
        .chain(passthrough)
        .collect();

    if !cargo(command)?.success() {
        anyhow::bail!("Failed to run sheetrename");
    }

    Ok(())
}

fn handle_test_commands(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("all", _args)) => test_all(),
        Some(("core", _args)) => cargo_test(&["--package", "sheetrename-core"]),
        Some(("bin", _args)) => cargo_test(&["--package", "sheetrename-bin"]),
        Some(("integration", _args)) => test_integration(),
        _ => {
            println!("Available test commands:");
            println!("  all          - Run all tests for the entire project");
            println!("  core         - Run tests for sheetrename-core");
            println!("  bin          - Run tests for sheetrename-bin");
            println!("  integration  - Run integration tests");
            Ok(())
        }
    }
}

fn test_all() -> Result<()> {
    println!("🧪 Running all tests for the sheetrename project...\n");

    let suites: [(&str, fn() -> Result<()>); 4] = [
        ("sheetrename-core", || cargo_test(&["--package", "sheetrename-core"])),
        ("sheetrename-bin", || cargo_test(&["--package", "sheetrename-bin"])),
        ("documentation", || cargo_test(&["--doc", "--package", "sheetrename-core"])),
        ("integration", test_integration),
    ];

    let mut failed = Vec::new();
    for (name, suite) in suites {
        println!("▶ Running {} tests...", name);
        match suite() {
            Ok(()) => println!("✅ {} tests passed\n", name),
            Err(err) => {
                println!("❌ {} tests failed: {}\n", name, err);
                failed.push(name);
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("Test suite failed: {}", failed.join(", "));
    }

    println!("🎉 All tests passed successfully!");
    Ok(())
}

fn cargo_test(args: &[&str]) -> Result<()> {
    let command = std::iter::once("test").chain(args.iter().copied());

    if !cargo(command)?.success() {
        anyhow::bail!("cargo test {} failed", args.join(" "));
    }
    Ok(())
}

fn run_sheetrename(args: &[&str]) -> Result<process::ExitStatus> {
    cargo(["run", "--quiet", "--bin", "sheetrename", "--"].iter().chain(args))
}

fn test_integration() -> Result<()> {
    for flag in ["--help", "--version"] {
        if !run_sheetrename(&[flag])?.success() {
            anyhow::bail!("sheetrename {} failed", flag);
        }
    }

    // A missing workbook must fail before anything is touched
    let missing = Path::new("target").join("xtask-missing-mappings.xlsx");
    let missing = missing.to_string_lossy();
    if run_sheetrename(&["--yes", "--mappings", &missing])?.success() {
        anyhow::bail!("sheetrename accepted a missing mappings workbook");
    }

    Ok(())
}
