//! Incremental build driver
//!
//! Owns the merger between runs, the worker pool used to load sets, and the
//! lock on the blob folder. A run is either a full rescan or an incremental
//! update from a list of changed files; an incremental run whose blob cannot
//! be reused silently turns into a full one.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use fs2::FileExt;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use super::worker_pool::WorkerPool;
use crate::config::{Config, SetConfig};
use crate::domain::ports::{DataKind, MergeConsumer};
use crate::domain::value_objects::FileStatus;
use crate::error::{MergeError, MergeResult};
use crate::infrastructure::fs::LocalFs;
use crate::merge::{blob_path, DataMerger, DataSet, FileValidity, MergeReport};

const LOCK_FILE_NAME: &str = "merger.lock";

/// A change reported for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: PathBuf,
    pub status: FileStatus,
}

impl FileChange {
    pub fn new(path: impl Into<PathBuf>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
    /// Rescan every set and rewrite the output from scratch.
    Full,
    /// Apply these changes to the previous state.
    Incremental(Vec<FileChange>),
}

/// Whether the blob in the blob folder can seed an incremental build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlobState {
    Missing,
    /// Present but unreadable, from another version, or another kind.
    Unusable,
    /// Readable but declares different sets.
    Stale,
    Reusable,
}

impl BlobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlobState::Missing => "missing",
            BlobState::Unusable => "unusable",
            BlobState::Stale => "stale",
            BlobState::Reusable => "reusable",
        }
    }
}

/// Outcome of one build run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub incremental: bool,
    /// Why a requested incremental build rescanned instead.
    pub fallback: Option<String>,
    pub sets: usize,
    pub applied: usize,
    pub skipped: usize,
    pub merge: MergeReport,
    pub duration_ms: u64,
}

/// Everything a driver needs from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub sets: Vec<SetConfig>,
    pub output: PathBuf,
    pub blob_dir: PathBuf,
    pub project_root: Option<PathBuf>,
    pub validate_names: bool,
}

impl BuildOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sets: config.sets.clone(),
            output: config.output.clone(),
            blob_dir: config.blob_dir.clone(),
            project_root: config.project_root.clone(),
            validate_names: config.merge.validate_names,
        }
    }
}

/// Exclusive lock on the blob folder, released on drop.
struct BlobLock {
    file: File,
}

impl BlobLock {
    fn acquire(folder: &Path) -> MergeResult<Self> {
        fs::create_dir_all(folder).map_err(|e| MergeError::write_failure(folder, e))?;
        let path = folder.join(LOCK_FILE_NAME);
        let file = File::create(&path).map_err(|e| MergeError::write_failure(&path, e))?;
        FileExt::lock_exclusive(&file).map_err(|e| MergeError::write_failure(&path, e))?;
        Ok(Self { file })
    }
}

impl Drop for BlobLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

pub struct BuildDriver<K: DataKind> {
    kind: K,
    options: BuildOptions,
    pool: WorkerPool,
    merger: Option<DataMerger<K>>,
}

impl<K: DataKind> BuildDriver<K> {
    pub fn new(kind: K, options: BuildOptions, pool: WorkerPool) -> Self {
        Self {
            kind,
            options,
            pool,
            merger: None,
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// State after the last successful run.
    pub fn merger(&self) -> Option<&DataMerger<K>> {
        self.merger.as_ref()
    }

    pub fn pool_mut(&mut self) -> &mut WorkerPool {
        &mut self.pool
    }

    /// Fresh, unloaded sets as configured.
    pub fn declared_sets(&self) -> Vec<DataSet<K>> {
        self.options
            .sets
            .iter()
            .map(|entry| {
                let mut set = DataSet::new(entry.name.clone(), self.kind.clone())
                    .with_sources(entry.sources.iter().cloned());
                set.set_validate_enabled(self.options.validate_names);
                set
            })
            .collect()
    }

    fn new_merger(&self) -> DataMerger<K> {
        let merger = DataMerger::new(self.kind.clone());
        match &self.options.project_root {
            Some(root) => merger.with_project_root(root.clone()),
            None => merger,
        }
    }

    /// Where a changed path belongs, judged against the declared sets.
    pub fn classify(&self, path: &Path) -> FileValidity {
        if let Some(merger) = &self.merger {
            return merger.find_data_set_containing(path);
        }
        let mut merger = self.new_merger();
        for set in self.declared_sets() {
            merger.add_data_set(set);
        }
        merger.find_data_set_containing(path)
    }

    /// Inspect the blob without changing anything.
    pub fn check_blob(&self) -> MergeResult<BlobState> {
        if !blob_path(&self.options.blob_dir).is_file() {
            return Ok(BlobState::Missing);
        }
        let mut merger = self.new_merger();
        if !merger.load_from_blob(&self.options.blob_dir, true)? {
            return Ok(BlobState::Unusable);
        }
        if merger.check_valid_update(&self.declared_sets()) {
            Ok(BlobState::Reusable)
        } else {
            Ok(BlobState::Stale)
        }
    }

    /// Run one build through `consumer`.
    pub fn run<C>(&mut self, consumer: &mut C, mode: BuildMode) -> MergeResult<BuildReport>
    where
        C: MergeConsumer<K::Value> + ?Sized,
    {
        let span = info_span!("build", kind = self.kind.label());
        let _enter = span.enter();
        let started = Instant::now();
        let _lock = BlobLock::acquire(&self.options.blob_dir)?;

        let mut report = match mode {
            BuildMode::Full => self.full_build(consumer, None)?,
            BuildMode::Incremental(changes) => match self.take_incremental_merger()? {
                Ok(merger) => self.incremental_build(merger, consumer, &changes)?,
                Err(reason) => {
                    warn!(%reason, "incremental build not possible, rescanning");
                    self.full_build(consumer, Some(reason))?
                }
            },
        };
        report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            incremental = report.incremental,
            applied = report.applied,
            added = report.merge.added,
            removed = report.merge.removed,
            duration_ms = report.duration_ms,
            "build finished"
        );
        Ok(report)
    }

    /// The merger to update: the one kept from the last run, or one loaded
    /// from the blob. `Ok(Err(reason))` asks for a rescan.
    fn take_incremental_merger(&mut self) -> MergeResult<Result<DataMerger<K>, String>> {
        if let Some(merger) = self.merger.take() {
            return Ok(Ok(merger));
        }
        let mut merger = self.new_merger();
        if !merger.load_from_blob(&self.options.blob_dir, true)? {
            return Ok(Err("no usable merge blob".to_string()));
        }
        let declared = self.declared_sets();
        if !merger.check_valid_update(&declared) {
            return Ok(Err("declared sets differ from the merge blob".to_string()));
        }
        for set in merger.data_sets_mut() {
            set.set_validate_enabled(self.options.validate_names);
        }
        Ok(Ok(merger))
    }

    fn full_build<C>(&mut self, consumer: &mut C, fallback: Option<String>) -> MergeResult<BuildReport>
    where
        C: MergeConsumer<K::Value> + ?Sized,
    {
        self.merger = None;
        let mut sets = self.declared_sets();
        self.pool
            .install(|| sets.par_iter_mut().try_for_each(DataSet::load_from_files))??;

        let mut merger = self.new_merger();
        let set_count = sets.len();
        for set in sets {
            merger.add_data_set(set);
        }
        merger.clean_blob(&self.options.blob_dir)?;
        LocalFs::new().remove_dir_all(&self.options.output)?;

        let merge = merger.write_blob_to(&self.options.blob_dir, consumer)?;
        self.merger = Some(merger);
        Ok(BuildReport {
            incremental: false,
            fallback,
            sets: set_count,
            applied: 0,
            skipped: 0,
            merge,
            duration_ms: 0,
        })
    }

    fn incremental_build<C>(
        &mut self,
        mut merger: DataMerger<K>,
        consumer: &mut C,
        changes: &[FileChange],
    ) -> MergeResult<BuildReport>
    where
        C: MergeConsumer<K::Value> + ?Sized,
    {
        let mut applied = 0;
        let mut skipped = 0;
        for change in changes {
            let result = merger.update_with(&change.path, change.status);
            match result {
                Ok(true) => applied += 1,
                Ok(false) => {
                    debug!(path = %change.path.display(), status = %change.status, "change not applied");
                    skipped += 1;
                }
                Err(e) => {
                    self.merger = Some(merger);
                    return Err(e);
                }
            }
        }

        let merge = merger.write_blob_to(&self.options.blob_dir, consumer);
        let sets = merger.data_sets().len();
        self.merger = Some(merger);
        Ok(BuildReport {
            incremental: true,
            fallback: None,
            sets,
            applied,
            skipped,
            merge: merge?,
            duration_ms: 0,
        })
    }
}
