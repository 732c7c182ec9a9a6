use std::process::ExitCode;

use anyhow::Result;
use is_terminal::IsTerminal;
use resmerge::application::{BuildMode, BuildReport, FileChange};
use resmerge::assets::{AssetKind, MergedAssetWriter};
use resmerge::config::{Config, MergeKind};
use resmerge::presentation::{create_renderer, OutputFormat};
use resmerge::resources::{MergedResourceWriter, ResourceKind};

use super::create_driver;

pub fn cmd_merge(
    config: &Config,
    full: bool,
    changes: Vec<FileChange>,
    format: OutputFormat,
    verbose: u8,
) -> Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let changes: Vec<FileChange> = changes
        .into_iter()
        .map(|change| FileChange::new(cwd.join(&change.path), change.status))
        .collect();
    // Without a change list there is nothing to replay against the blob.
    let mode = if full || changes.is_empty() {
        BuildMode::Full
    } else {
        BuildMode::Incremental(changes)
    };

    let report = run_build(config, mode)?;
    let unicode = std::io::stdout().is_terminal();
    print!(
        "{}",
        create_renderer(format, unicode, verbose).render(&report, config.kind)
    );
    if format == OutputFormat::Json {
        println!();
    }
    Ok(ExitCode::SUCCESS)
}

fn run_build(config: &Config, mode: BuildMode) -> Result<BuildReport> {
    let report = match config.kind {
        MergeKind::Resources => {
            let mut writer = MergedResourceWriter::new(&config.output);
            create_driver(ResourceKind, config).run(&mut writer, mode)?
        }
        MergeKind::Assets => {
            let mut writer = MergedAssetWriter::new(&config.output);
            create_driver(AssetKind, config).run(&mut writer, mode)?
        }
    };
    Ok(report)
}
