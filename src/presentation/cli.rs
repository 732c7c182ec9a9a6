//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--json, --verbose, --config) are inherited by all subcommands
//! - Build flags override the loaded configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::application::FileChange;
use crate::config::{MergeKind, SetConfig};
use crate::domain::value_objects::FileStatus;

/// resmerge - incremental, layered resource and asset merging
#[derive(Parser, Debug)]
#[command(name = "resmerge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./resmerge.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge the declared sets into the output folder
    Merge {
        #[command(flatten)]
        build: BuildArgs,

        /// Ignore the blob and rescan every set, even when changes are listed
        #[arg(long)]
        full: bool,

        /// A changed source file as STATUS:PATH (new, changed, removed).
        /// Without any, every set is rescanned.
        #[arg(long = "change", value_name = "STATUS:PATH", value_parser = parse_change)]
        changes: Vec<FileChange>,
    },

    /// Report whether the merge blob can seed an incremental build
    CheckBlob {
        #[command(flatten)]
        build: BuildArgs,
    },

    /// Check a resource name
    ValidateName {
        /// The name, with extension for file resources
        name: String,

        /// Folder type (drawable, layout, ...) or value type (string, color, ...)
        #[arg(long = "type", value_name = "TYPE")]
        resource_type: String,

        /// Accept names that are still being typed
        #[arg(long)]
        partial: bool,
    },

    /// Escape text for use in a string resource
    Escape {
        /// Text to escape (read from stdin when absent)
        text: Option<String>,

        /// Also escape XML markup characters
        #[arg(long)]
        xml: bool,
    },

    /// Unescape string resource text
    Unescape {
        /// Text to unescape (read from stdin when absent)
        text: Option<String>,

        /// Also decode XML entities
        #[arg(long)]
        entities: bool,

        /// Keep leading and trailing whitespace
        #[arg(long)]
        no_trim: bool,
    },

    /// Watch the source folders and merge continuously
    Watch {
        #[command(flatten)]
        build: BuildArgs,
    },
}

/// Flags shared by every command that builds.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArgs {
    /// What to merge
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Output folder
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Folder holding merger.xml
    #[arg(long)]
    pub blob_dir: Option<PathBuf>,

    /// A set as NAME=DIR[,DIR...]; repeat in priority order, lowest first
    #[arg(long = "set", value_name = "NAME=DIRS", value_parser = parse_set)]
    pub sets: Vec<SetConfig>,

    /// Worker threads for loading sets (0 = available parallelism)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Skip resource name validation
    #[arg(long)]
    pub no_validate: bool,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Resources,
    Assets,
}

impl From<KindArg> for MergeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Resources => MergeKind::Resources,
            KindArg::Assets => MergeKind::Assets,
        }
    }
}

fn parse_set(value: &str) -> Result<SetConfig, String> {
    let (name, folders) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=DIR[,DIR...], got '{value}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("set name is empty".to_string());
    }
    let folders: Vec<&str> = folders.split(',').filter(|f| !f.is_empty()).collect();
    if folders.is_empty() {
        return Err(format!("set '{name}' has no source folder"));
    }
    Ok(SetConfig::new(name, folders))
}

fn parse_change(value: &str) -> Result<FileChange, String> {
    let (status, path) = value
        .split_once(':')
        .ok_or_else(|| format!("expected STATUS:PATH, got '{value}'"))?;
    let status = FileStatus::parse(status)
        .ok_or_else(|| format!("unknown status '{status}' (new, changed, removed)"))?;
    if path.is_empty() {
        return Err("change has an empty path".to_string());
    }
    Ok(FileChange::new(path, status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cli_parse_merge_defaults() {
        let cli = Cli::try_parse_from(["resmerge", "merge"]).unwrap();
        match cli.command {
            Commands::Merge {
                build,
                full,
                changes,
            } => {
                assert_eq!(build, BuildArgs::default());
                assert!(!full);
                assert!(changes.is_empty());
            }
            other => panic!("Expected Merge command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_sets_in_order() {
        let cli = Cli::try_parse_from([
            "resmerge",
            "merge",
            "--set",
            "main=src/main/res,src/gen/res",
            "--set",
            "debug=src/debug/res",
        ])
        .unwrap();
        let Commands::Merge { build, .. } = cli.command else {
            panic!("Expected Merge command");
        };
        assert_eq!(
            build.sets,
            vec![
                SetConfig::new("main", ["src/main/res", "src/gen/res"]),
                SetConfig::new("debug", ["src/debug/res"]),
            ]
        );
    }

    #[test]
    fn test_cli_parse_set_without_folder_fails() {
        assert!(Cli::try_parse_from(["resmerge", "merge", "--set", "main="]).is_err());
        assert!(Cli::try_parse_from(["resmerge", "merge", "--set", "main"]).is_err());
    }

    #[test]
    fn test_cli_parse_changes() {
        let cli = Cli::try_parse_from([
            "resmerge",
            "merge",
            "--change",
            "removed:res/values/strings.xml",
            "--change",
            "new:res/drawable/icon.png",
        ])
        .unwrap();
        let Commands::Merge { changes, .. } = cli.command else {
            panic!("Expected Merge command");
        };
        assert_eq!(changes[0].status, FileStatus::Removed);
        assert_eq!(changes[0].path, Path::new("res/values/strings.xml"));
        assert_eq!(changes[1].status, FileStatus::New);
    }

    #[test]
    fn test_cli_parse_change_with_unknown_status_fails() {
        assert!(Cli::try_parse_from(["resmerge", "merge", "--change", "moved:a.xml"]).is_err());
    }

    #[test]
    fn test_cli_parse_validate_name() {
        let cli = Cli::try_parse_from([
            "resmerge",
            "validate-name",
            "icon.pn",
            "--type",
            "drawable",
            "--partial",
        ])
        .unwrap();
        match cli.command {
            Commands::ValidateName {
                name,
                resource_type,
                partial,
            } => {
                assert_eq!(name, "icon.pn");
                assert_eq!(resource_type, "drawable");
                assert!(partial);
            }
            other => panic!("Expected ValidateName command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["resmerge", "check-blob", "--json", "-vv", "--kind", "assets"])
                .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        let Commands::CheckBlob { build } = cli.command else {
            panic!("Expected CheckBlob command");
        };
        assert_eq!(build.kind, Some(KindArg::Assets));
    }
}
