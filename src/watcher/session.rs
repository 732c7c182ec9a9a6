//! The watch loop: debounced incremental builds from file-system events

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use super::event::{status_for, WatchEvent, WatcherState};
use crate::application::{BuildDriver, BuildMode};
use crate::domain::ports::{DataKind, MergeConsumer};
use crate::domain::value_objects::FileStatus;
use crate::error::{MergeError, MergeResult};
use crate::merge::FileValidity;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Build once, then rebuild incrementally on every debounced batch of
/// changes until `running` turns false.
///
/// A failed build is reported through `on_event` and the loop keeps going;
/// the next batch retries from whatever state the driver kept.
pub fn watch<K, C>(
    driver: &mut BuildDriver<K>,
    consumer: &mut C,
    running: Arc<AtomicBool>,
    on_event: impl Fn(WatchEvent),
) -> MergeResult<()>
where
    K: DataKind,
    C: MergeConsumer<K::Value> + ?Sized,
{
    let folders = source_folders(driver);
    on_event(WatchEvent::WatchStarted {
        sets: driver.options().sets.iter().map(|s| s.name.clone()).collect(),
        watching: folders.iter().map(|f| f.display().to_string()).collect(),
    });

    // Sources may have changed while nothing was watching.
    run_build(driver, consumer, BuildMode::Full, &on_event);

    let (tx, rx) = channel::<(PathBuf, FileStatus)>();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if let Some(status) = status_for(&event.kind) {
                    for path in event.paths {
                        let _ = tx.send((path, status));
                    }
                }
            }
            Err(e) => warn!(error = %e, "watch error"),
        },
        Config::default(),
    )
    .map_err(notify_error)?;

    for folder in &folders {
        watcher
            .watch(folder, RecursiveMode::Recursive)
            .map_err(notify_error)?;
    }

    let mut state = WatcherState::new();
    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok((path, status)) => {
                if path.is_dir() {
                    continue;
                }
                match driver.classify(&path) {
                    FileValidity::Valid { .. } => {
                        debug!(path = %path.display(), %status, "queued change");
                        state.add_change(path, status);
                    }
                    other => on_event(WatchEvent::FileSkipped {
                        path: path.display().to_string(),
                        validity: other.label().to_string(),
                    }),
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if state.should_flush() {
            let changes = state.take_changes();
            for change in &changes {
                on_event(WatchEvent::FileChanged {
                    path: change.path.display().to_string(),
                    status: change.status,
                });
            }
            run_build(driver, consumer, BuildMode::Incremental(changes), &on_event);
        }
    }

    drop(watcher);
    driver.pool_mut().shutdown();
    on_event(WatchEvent::Shutdown);
    Ok(())
}

fn run_build<K, C>(
    driver: &mut BuildDriver<K>,
    consumer: &mut C,
    mode: BuildMode,
    on_event: &impl Fn(WatchEvent),
) where
    K: DataKind,
    C: MergeConsumer<K::Value> + ?Sized,
{
    let changes = match &mode {
        BuildMode::Full => 0,
        BuildMode::Incremental(changes) => changes.len(),
    };
    on_event(WatchEvent::BuildStarted { changes });
    match driver.run(consumer, mode) {
        Ok(report) => on_event(WatchEvent::build_complete(&report)),
        Err(e) => on_event(WatchEvent::Error {
            message: e.to_string(),
        }),
    }
}

/// Every declared source folder that exists now.
fn source_folders<K: DataKind>(driver: &BuildDriver<K>) -> Vec<PathBuf> {
    let mut folders: Vec<PathBuf> = driver
        .options()
        .sets
        .iter()
        .flat_map(|set| set.sources.iter().cloned())
        .filter(|folder| folder.is_dir())
        .collect();
    folders.sort();
    folders.dedup();
    folders
}

fn notify_error(e: notify::Error) -> MergeError {
    MergeError::Io(std::io::Error::other(e.to_string()))
}
