//! Command handlers for the `resmerge` binary

mod check_blob;
mod escape;
mod merge;
mod validate_name;
mod watch;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use resmerge::application::{BuildDriver, BuildOptions, WorkerPool};
use resmerge::config::{load_or_default, Config, PROJECT_CONFIG_FILE};
use resmerge::domain::ports::DataKind;
use resmerge::presentation::{BuildArgs, Cli, Commands, OutputFormat};

/// Run the parsed command line.
pub fn dispatch(cli: Cli) -> Result<ExitCode> {
    let format = OutputFormat::from_json_flag(cli.json);
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Merge {
            build,
            full,
            changes,
        } => {
            let config = load_build_config(config_path, &build)?;
            merge::cmd_merge(&config, full, changes, format, cli.verbose)
        }
        Commands::CheckBlob { build } => {
            let config = load_build_config(config_path, &build)?;
            check_blob::cmd_check_blob(&config, format)
        }
        Commands::ValidateName {
            name,
            resource_type,
            partial,
        } => validate_name::cmd_validate_name(&name, &resource_type, partial, format),
        Commands::Escape { text, xml } => escape::cmd_escape(text, xml),
        Commands::Unescape {
            text,
            entities,
            no_trim,
        } => escape::cmd_unescape(text, entities, !no_trim),
        Commands::Watch { build } => {
            let config = load_build_config(config_path, &build)?;
            watch::cmd_watch(&config, format)
        }
    }
}

/// Config file, then environment, then flags; every path made absolute.
fn load_build_config(config_path: Option<&Path>, build: &BuildArgs) -> Result<Config> {
    let (mut config, warnings) = load_or_default(config_path)?;
    for warning in &warnings {
        eprintln!("Warning: {warning}");
    }
    apply_build_args(&mut config, build);
    config.resolve_paths(&std::env::current_dir()?);

    let origin = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    config.validate(&origin)?;
    Ok(config)
}

fn apply_build_args(config: &mut Config, build: &BuildArgs) {
    if let Some(kind) = build.kind {
        config.kind = kind.into();
    }
    if let Some(output) = &build.output {
        config.output = output.clone();
    }
    if let Some(blob_dir) = &build.blob_dir {
        config.blob_dir = blob_dir.clone();
    }
    if !build.sets.is_empty() {
        config.sets = build.sets.clone();
    }
    if let Some(workers) = build.workers {
        config.merge.workers = workers;
    }
    if build.no_validate {
        config.merge.validate_names = false;
    }
}

fn create_driver<K: DataKind>(kind: K, config: &Config) -> BuildDriver<K> {
    BuildDriver::new(
        kind,
        BuildOptions::from_config(config),
        WorkerPool::new(config.merge.workers),
    )
}

/// Read the argument or, when absent, stdin without its final newline.
fn text_or_stdin(text: Option<String>) -> Result<String> {
    use std::io::Read;

    match text {
        Some(text) => Ok(text),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            if input.ends_with('\n') {
                input.pop();
                if input.ends_with('\r') {
                    input.pop();
                }
            }
            Ok(input)
        }
    }
}
