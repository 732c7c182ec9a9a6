//! Watch event types and debouncing

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::EventKind;
use serde::Serialize;

use crate::application::{BuildReport, FileChange};
use crate::domain::value_objects::FileStatus;

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    WatchStarted {
        sets: Vec<String>,
        watching: Vec<String>,
    },
    FileChanged {
        path: String,
        status: FileStatus,
    },
    /// A path outside the inputs: `ignored` or `unknown`.
    FileSkipped {
        path: String,
        validity: String,
    },
    BuildStarted {
        changes: usize,
    },
    BuildComplete {
        incremental: bool,
        applied: usize,
        skipped: usize,
        added: usize,
        removed: usize,
        kept: usize,
        fallback: Option<String>,
        duration_ms: u64,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl WatchEvent {
    pub fn build_complete(report: &BuildReport) -> Self {
        WatchEvent::BuildComplete {
            incremental: report.incremental,
            applied: report.applied,
            skipped: report.skipped,
            added: report.merge.added,
            removed: report.merge.removed,
            kept: report.merge.kept,
            fallback: report.fallback.clone(),
            duration_ms: report.duration_ms,
        }
    }

    /// One NDJSON line with a `"command": "watch"` field.
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Change reported by a notify event kind; access and metadata-free
/// events carry none.
pub fn status_for(kind: &EventKind) -> Option<FileStatus> {
    match kind {
        EventKind::Create(_) => Some(FileStatus::New),
        EventKind::Modify(_) => Some(FileStatus::Changed),
        EventKind::Remove(_) => Some(FileStatus::Removed),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

/// Pending changes, coalesced per path until the debounce period passes.
#[derive(Debug, Default)]
pub struct WatcherState {
    pending: BTreeMap<PathBuf, FileStatus>,
    last_change: Option<Instant>,
}

impl WatcherState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_change(&mut self, path: PathBuf, status: FileStatus) {
        let merged = match (self.pending.get(&path), status) {
            (Some(FileStatus::New), FileStatus::Changed) => FileStatus::New,
            (Some(FileStatus::Removed), FileStatus::New) => FileStatus::Changed,
            (_, status) => status,
        };
        self.pending.insert(path, merged);
        self.last_change = Some(Instant::now());
    }

    pub fn should_flush(&self) -> bool {
        match self.last_change {
            Some(last) => {
                !self.pending.is_empty() && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
            }
            None => false,
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drain pending changes. The file system has the last word on whether
    /// a path still exists.
    pub fn take_changes(&mut self) -> Vec<FileChange> {
        self.last_change = None;
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(path, status)| {
                let status = settle(&path, status);
                FileChange { path, status }
            })
            .collect()
    }
}

fn settle(path: &Path, status: FileStatus) -> FileStatus {
    match (path.exists(), status) {
        (false, _) => FileStatus::Removed,
        (true, FileStatus::Removed) => FileStatus::Changed,
        (true, status) => status,
    }
}
