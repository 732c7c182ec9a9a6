//! Writes merged assets into an output folder

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::kind::relative_key;
use crate::domain::ports::{MergeConsumer, MergeEntry};
use crate::error::{MergeError, MergeResult};
use crate::infrastructure::fs::LocalFs;

/// Output counters of one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub copied: usize,
    pub deleted: usize,
}

/// Copies `<source>` to `<root>/<key>` and deletes removed keys.
#[derive(Debug)]
pub struct MergedAssetWriter {
    root: PathBuf,
    fs: LocalFs,
    stats: WriteStats,
}

impl MergedAssetWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fs: LocalFs::new(),
            stats: WriteStats::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    fn target(&self, key: &str) -> PathBuf {
        key.split('/').fold(self.root.clone(), |path, part| path.join(part))
    }
}

impl MergeConsumer<()> for MergedAssetWriter {
    fn start(&mut self) -> MergeResult<()> {
        self.stats = WriteStats::default();
        std::fs::create_dir_all(&self.root).map_err(|e| MergeError::write_failure(&self.root, e))
    }

    fn add_item(&mut self, entry: MergeEntry<'_, ()>) -> MergeResult<()> {
        let target = self.target(entry.item.key());
        let source = entry.item.source().ok_or_else(|| MergeError::Consumer {
            message: format!("asset {} has no source file", entry.item.key()),
        })?;
        if self.fs.copy_file(source, &target)? {
            debug!(target = %target.display(), "copied asset");
            self.stats.copied += 1;
        }
        Ok(())
    }

    fn remove_item(
        &mut self,
        removed: MergeEntry<'_, ()>,
        replaced_by: Option<MergeEntry<'_, ()>>,
    ) -> MergeResult<()> {
        if replaced_by.is_some() {
            return Ok(());
        }
        let target = self.target(removed.item.key());
        if self.fs.remove_file(&target, &self.root)? {
            debug!(target = %target.display(), "deleted asset");
            self.stats.deleted += 1;
        }
        Ok(())
    }

    fn clean_up(&mut self, live_keys: &BTreeSet<String>) -> MergeResult<()> {
        if !self.root.is_dir() {
            return Ok(());
        }
        let stale: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                relative_key(&self.root, entry.path()).is_some_and(|key| !live_keys.contains(&key))
            })
            .map(|entry| entry.into_path())
            .collect();
        for path in stale {
            if self.fs.remove_file(&path, &self.root)? {
                debug!(target = %path.display(), "pruned stale asset");
                self.stats.deleted += 1;
            }
        }
        Ok(())
    }
}
