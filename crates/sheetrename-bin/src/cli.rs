use clap::Parser;
use sheetrename_core::SheetNames;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetrename")]
#[command(version)]
#[command(about = "Rename directories and files in bulk from spreadsheet mappings")]
#[command(long_about = "A CLI tool that renames directories and file base-names under a root directory, using old -> new name mappings read from two sheets of a spreadsheet. File extensions are preserved and name collisions get a numeric suffix.")]
pub struct Cli {
    #[arg(
        short,
        long,
        env = "SHEETRENAME_MAPPINGS",
        default_value = "skin_names.xlsx",
        help = "Spreadsheet holding the name mappings"
    )]
    pub mappings: PathBuf,

    #[arg(
        short,
        long,
        env = "SHEETRENAME_ROOT",
        default_value = "skins-1",
        help = "Root directory whose tree is renamed in place"
    )]
    pub root: PathBuf,

    #[arg(long, default_value = "Sheet1", help = "Sheet with directory mappings")]
    pub dir_sheet: String,

    #[arg(long, default_value = "Sheet2", help = "Sheet with file base-name mappings")]
    pub file_sheet: String,

    #[arg(short, long, help = "Skip the confirmation prompt")]
    pub yes: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn sheet_names(&self) -> SheetNames {
        SheetNames {
            directories: self.dir_sheet.clone(),
            files: self.file_sheet.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sheetrename"]).unwrap();

        assert_eq!(cli.mappings, PathBuf::from("skin_names.xlsx"));
        assert_eq!(cli.root, PathBuf::from("skins-1"));
        assert_eq!(cli.sheet_names(), SheetNames::default());
        assert!(!cli.yes);
    }

    #[test]
    fn test_overrides() {
        let args = vec![
            "sheetrename",
            "--mappings",
            "names.xlsx",
            "--root",
            "/data/skins",
            "--dir-sheet",
            "Folders",
            "--file-sheet",
            "Files",
            "--yes",
            "-v",
        ];

        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.mappings, PathBuf::from("names.xlsx"));
        assert_eq!(cli.root, PathBuf::from("/data/skins"));
        assert_eq!(cli.sheet_names().directories, "Folders");
        assert_eq!(cli.sheet_names().files, "Files");
        assert!(cli.yes);
        assert!(cli.verbose);
    }
}
