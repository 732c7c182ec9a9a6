//! Classification of a changed path against a merger's sets

use std::path::PathBuf;

/// Where a file-system event belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileValidity {
    /// Inside `source_folder` of the set at `set_index`
    Valid {
        set_index: usize,
        source_folder: PathBuf,
    },
    /// Inside a known source folder but not an input
    Ignored,
    /// Outside every source folder
    Unknown,
}

impl FileValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, FileValidity::Valid { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileValidity::Valid { .. } => "valid",
            FileValidity::Ignored => "ignored",
            FileValidity::Unknown => "unknown",
        }
    }
}
