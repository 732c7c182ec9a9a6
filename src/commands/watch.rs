use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use is_terminal::IsTerminal;
use resmerge::assets::{AssetKind, MergedAssetWriter};
use resmerge::config::{Config, MergeKind};
use resmerge::presentation::{render_watch_event, OutputFormat};
use resmerge::resources::{MergedResourceWriter, ResourceKind};
use resmerge::watcher::{watch, WatchEvent};

use super::create_driver;

pub fn cmd_watch(config: &Config, format: OutputFormat) -> Result<ExitCode> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    let unicode = std::io::stdout().is_terminal();
    let on_event = |event: WatchEvent| match format {
        OutputFormat::Json => println!("{}", event.to_json()),
        OutputFormat::Text => {
            let rendered = render_watch_event(&timestamp(), &event, unicode);
            match event {
                WatchEvent::Error { .. } => eprint!("{rendered}"),
                _ => print!("{rendered}"),
            }
        }
    };

    match config.kind {
        MergeKind::Resources => {
            let mut writer = MergedResourceWriter::new(&config.output);
            let mut driver = create_driver(ResourceKind, config);
            watch(&mut driver, &mut writer, running, on_event)?;
        }
        MergeKind::Assets => {
            let mut writer = MergedAssetWriter::new(&config.output);
            let mut driver = create_driver(AssetKind, config);
            watch(&mut driver, &mut writer, running, on_event)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// `HH:MM:SS` in UTC
fn timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 86_400;
            format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
        })
        .unwrap_or_else(|_| "00:00:00".to_string())
}
