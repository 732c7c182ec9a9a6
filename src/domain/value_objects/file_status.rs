//! File status value object - the kind of change reported for one source file
//!
//! - `New`: the file appeared
//! - `Changed`: the file content changed
//! - `Removed`: the file was deleted

use serde::{Deserialize, Serialize};

/// Change reported by a file-system event for a single source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    New,
    Changed,
    Removed,
}

impl FileStatus {
    /// Returns true if the file still exists on disk after this change
    pub fn is_present(&self) -> bool {
        !matches!(self, FileStatus::Removed)
    }

    /// Parse the textual form used in change lists (`new`, `changed`, `removed`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" | "added" => Some(FileStatus::New),
            "changed" | "modified" => Some(FileStatus::Changed),
            "removed" | "deleted" => Some(FileStatus::Removed),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::New => write!(f, "new"),
            FileStatus::Changed => write!(f, "changed"),
            FileStatus::Removed => write!(f, "removed"),
        }
    }
}
