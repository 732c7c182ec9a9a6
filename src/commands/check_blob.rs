use std::process::ExitCode;

use anyhow::Result;
use resmerge::application::BlobState;
use resmerge::assets::AssetKind;
use resmerge::config::{Config, MergeKind};
use resmerge::presentation::{render_blob_state, OutputFormat};
use resmerge::resources::ResourceKind;

use super::create_driver;

/// Exits 0 only when the blob can seed an incremental build.
pub fn cmd_check_blob(config: &Config, format: OutputFormat) -> Result<ExitCode> {
    let state = match config.kind {
        MergeKind::Resources => create_driver(ResourceKind, config).check_blob()?,
        MergeKind::Assets => create_driver(AssetKind, config).check_blob()?,
    };
    println!("{}", render_blob_state(state, format));
    Ok(if state == BlobState::Reusable {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
