//! The overlay stack and the merge drive
//!
//! Sets are ordered lowest priority first. `merge_data` walks every key,
//! works out what the output has and what it should have, and reports the
//! difference to a [`MergeConsumer`]. Status changes are staged during the
//! walk and committed only once the consumer has accepted the whole merge.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use super::blob;
use super::data_set::DataSet;
use super::validity::FileValidity;
use crate::domain::entities::{DataItem, ItemStatus, Revision};
use crate::domain::ports::{DataKind, MergeConsumer, MergeEntry};
use crate::domain::value_objects::FileStatus;
use crate::error::MergeResult;
use crate::infrastructure::fs::LocalFs;

/// Counts of consumer notifications from one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub added: usize,
    pub removed: usize,
    pub kept: usize,
}

/// Position of a revision: set index and index within the key's stack.
type Slot = (usize, usize);

struct StatusCommit {
    set: usize,
    key: String,
    index: usize,
    status: ItemStatus,
}

/// Changes accumulated during a merge, applied after `end`.
struct Staged<V> {
    commits: Vec<StatusCommit>,
    merged: Vec<(String, Option<Arc<DataItem<V>>>)>,
    live_keys: BTreeSet<String>,
    report: MergeReport,
}

impl<V> Staged<V> {
    fn new() -> Self {
        Self {
            commits: Vec::new(),
            merged: Vec::new(),
            live_keys: BTreeSet::new(),
            report: MergeReport::default(),
        }
    }

    fn commit(&mut self, (set, index): Slot, key: &str, status: ItemStatus) {
        self.commits.push(StatusCommit {
            set,
            key: key.to_string(),
            index,
            status,
        });
    }
}

fn emitted(status: ItemStatus) -> ItemStatus {
    ItemStatus {
        written: true,
        touched: false,
        removed: status.removed,
    }
}

fn retracted(status: ItemStatus) -> ItemStatus {
    ItemStatus {
        written: false,
        ..status
    }
}

#[derive(Debug, Clone)]
pub struct DataMerger<K: DataKind> {
    kind: K,
    sets: Vec<DataSet<K>>,
    merged_items: BTreeMap<String, Arc<DataItem<K::Value>>>,
    project_root: Option<PathBuf>,
}

impl<K: DataKind> DataMerger<K> {
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            sets: Vec::new(),
            merged_items: BTreeMap::new(),
            project_root: None,
        }
    }

    /// Builder: paths under `root` are stored relative to it in the blob
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Append a set; later sets override earlier ones.
    pub fn add_data_set(&mut self, set: DataSet<K>) {
        self.sets.push(set);
    }

    pub fn data_sets(&self) -> &[DataSet<K>] {
        &self.sets
    }

    pub fn data_sets_mut(&mut self) -> &mut [DataSet<K>] {
        &mut self.sets
    }

    /// Items remembered from the last combined merge, by key.
    pub fn merged_items(&self) -> &BTreeMap<String, Arc<DataItem<K::Value>>> {
        &self.merged_items
    }

    /// Every revision of every set, grouped by key, lowest priority first.
    pub fn data_map(&self) -> BTreeMap<String, Vec<&Revision<K::Value>>> {
        let mut map: BTreeMap<String, Vec<&Revision<K::Value>>> = BTreeMap::new();
        for set in &self.sets {
            for (key, stack) in set.data_map() {
                map.entry(key.clone()).or_default().extend(stack.iter());
            }
        }
        map
    }

    /// Highest-priority live item for `key`.
    pub fn authoritative(&self, key: &str) -> Option<&Arc<DataItem<K::Value>>> {
        self.sets
            .iter()
            .rev()
            .find_map(|set| set.authoritative(key))
            .map(|rev| &rev.item)
    }

    /// Whether `candidates` declare the same layers as this merger: same
    /// count, same names in order, same source folders per set in any order.
    pub fn check_valid_update(&self, candidates: &[DataSet<K>]) -> bool {
        if self.sets.len() != candidates.len() {
            return false;
        }
        self.sets.iter().zip(candidates).all(|(ours, theirs)| {
            ours.name() == theirs.name()
                && ours.source_folders().iter().collect::<BTreeSet<_>>()
                    == theirs.source_folders().iter().collect::<BTreeSet<_>>()
        })
    }

    pub fn find_data_set_containing(&self, file: &Path) -> FileValidity {
        for (set_index, set) in self.sets.iter().enumerate() {
            let Some(folder) = set.find_matching_source_folder(file) else {
                continue;
            };
            if set.ignore_rules().is_ignored_under(folder, file)
                || !self.kind.is_valid_source_file(folder, file)
            {
                return FileValidity::Ignored;
            }
            return FileValidity::Valid {
                set_index,
                source_folder: folder.to_path_buf(),
            };
        }
        FileValidity::Unknown
    }

    /// Route one file-system event to the set that owns the file.
    pub fn update_with(&mut self, file: &Path, status: FileStatus) -> MergeResult<bool> {
        match self.find_data_set_containing(file) {
            FileValidity::Valid {
                set_index,
                source_folder,
            } => self.sets[set_index].update_with(&source_folder, file, status),
            other => {
                debug!(file = %file.display(), validity = other.label(), "skipping change");
                Ok(false)
            }
        }
    }

    /// Replace the sets with the snapshot stored in `folder`.
    ///
    /// Returns `Ok(false)` when there is no usable snapshot; the merger is
    /// left as it was and the caller should rescan.
    pub fn load_from_blob(&mut self, folder: &Path, incremental_state: bool) -> MergeResult<bool> {
        let Some(snapshot) = blob::read_blob(
            &self.kind,
            folder,
            self.project_root.as_deref(),
            incremental_state,
        )?
        else {
            return Ok(false);
        };
        self.sets = snapshot.sets;
        self.merged_items = snapshot.merged_items;
        Ok(true)
    }

    /// Merge with clean-up through `consumer`, then snapshot the result.
    pub fn write_blob_to<C>(&mut self, folder: &Path, consumer: &mut C) -> MergeResult<MergeReport>
    where
        C: MergeConsumer<K::Value> + ?Sized,
    {
        let report = self.merge_data(consumer, true)?;
        blob::write_blob(
            &self.kind,
            &self.sets,
            &self.merged_items,
            folder,
            self.project_root.as_deref(),
        )?;
        Ok(report)
    }

    /// Delete the snapshot in `folder`, if any.
    pub fn clean_blob(&self, folder: &Path) -> MergeResult<()> {
        LocalFs::new().remove_file(&blob::blob_path(folder), folder)?;
        Ok(())
    }

    /// Reconcile all sets against what `consumer` already has.
    ///
    /// On error no status is committed, so the merge can be retried.
    pub fn merge_data<C>(&mut self, consumer: &mut C, do_clean_up: bool) -> MergeResult<MergeReport>
    where
        C: MergeConsumer<K::Value> + ?Sized,
    {
        let span = info_span!("merge_data", kind = self.kind.label(), sets = self.sets.len());
        let _enter = span.enter();

        for set in &self.sets {
            set.check_items()?;
        }

        consumer.start()?;
        let keys: BTreeSet<&str> = self.sets.iter().flat_map(DataSet::keys).collect();
        let mut staged = Staged::new();
        for key in keys {
            if self.requires_merge(key) {
                self.merge_combined_key(key, consumer, &mut staged)?;
            } else {
                self.merge_key(key, consumer, &mut staged)?;
            }
        }
        consumer.end()?;
        if do_clean_up {
            consumer.clean_up(&staged.live_keys)?;
        }

        let report = staged.report;
        self.apply(staged);
        if do_clean_up {
            for set in &mut self.sets {
                set.prune_removed();
            }
        }

        info!(
            added = report.added,
            removed = report.removed,
            kept = report.kept,
            "merge complete"
        );
        Ok(report)
    }

    fn requires_merge(&self, key: &str) -> bool {
        self.sets
            .iter()
            .filter_map(|set| set.revisions(key))
            .flatten()
            .next()
            .is_some_and(|rev| self.kind.requires_merge(&rev.item))
    }

    fn revision(&self, key: &str, (set, index): Slot) -> Option<&Revision<K::Value>> {
        self.sets.get(set)?.revisions(key)?.get(index)
    }

    fn merge_key<C>(&self, key: &str, consumer: &mut C, staged: &mut Staged<K::Value>) -> MergeResult<()>
    where
        C: MergeConsumer<K::Value> + ?Sized,
    {
        let mut to_write: Option<Slot> = None;
        let mut previously_written: Option<Slot> = None;

        'sets: for (set_index, set) in self.sets.iter().enumerate().rev() {
            let Some(stack) = set.revisions(key) else {
                continue;
            };
            for (index, revision) in stack.iter().enumerate().rev() {
                if consumer.ignore_item_in_merge(&revision.item) {
                    continue;
                }
                if previously_written.is_none() && revision.status.written {
                    previously_written = Some((set_index, index));
                }
                if to_write.is_none() && revision.is_live() {
                    to_write = Some((set_index, index));
                }
                if to_write.is_some() && previously_written.is_some() {
                    break 'sets;
                }
            }
        }

        let lookup = |slot: Slot| self.revision(key, slot);
        match (to_write, previously_written) {
            (None, None) => {}
            (None, Some(old)) => {
                if let Some(old_rev) = lookup(old) {
                    consumer.remove_item(MergeEntry::new(&old_rev.item, old_rev.status), None)?;
                    staged.commit(old, key, retracted(old_rev.status));
                    staged.report.removed += 1;
                }
            }
            (Some(new), Some(old)) if old != new => {
                if let (Some(new_rev), Some(old_rev)) = (lookup(new), lookup(old)) {
                    let replacement = MergeEntry::new(
                        &new_rev.item,
                        ItemStatus {
                            touched: true,
                            ..new_rev.status
                        },
                    );
                    consumer.add_item(replacement)?;
                    consumer.remove_item(
                        MergeEntry::new(&old_rev.item, old_rev.status),
                        Some(replacement),
                    )?;
                    staged.commit(new, key, emitted(new_rev.status));
                    staged.commit(old, key, retracted(old_rev.status));
                    staged.report.added += 1;
                    staged.report.removed += 1;
                    staged.live_keys.insert(key.to_string());
                }
            }
            (Some(new), _) => {
                if let Some(new_rev) = lookup(new) {
                    let entry = MergeEntry::new(&new_rev.item, new_rev.status);
                    if new_rev.status.needs_write() {
                        consumer.add_item(entry)?;
                        staged.commit(new, key, emitted(new_rev.status));
                        staged.report.added += 1;
                    } else {
                        consumer.keep_item(entry)?;
                        staged.report.kept += 1;
                    }
                    staged.live_keys.insert(key.to_string());
                }
            }
        }
        Ok(())
    }

    /// Keys whose live revisions are combined across every set instead of
    /// overridden.
    fn merge_combined_key<C>(
        &self,
        key: &str,
        consumer: &mut C,
        staged: &mut Staged<K::Value>,
    ) -> MergeResult<()>
    where
        C: MergeConsumer<K::Value> + ?Sized,
    {
        let mut live: Vec<Slot> = Vec::new();
        let mut retired: Vec<Slot> = Vec::new();
        for (set_index, set) in self.sets.iter().enumerate() {
            let Some(stack) = set.revisions(key) else {
                continue;
            };
            for (index, revision) in stack.iter().enumerate() {
                if consumer.ignore_item_in_merge(&revision.item) {
                    continue;
                }
                if revision.is_live() {
                    live.push((set_index, index));
                } else if revision.status.written {
                    retired.push((set_index, index));
                }
            }
        }
        for &slot in &retired {
            if let Some(rev) = self.revision(key, slot) {
                staged.commit(slot, key, retracted(rev.status));
            }
        }

        let previous = self.merged_items.get(key);
        let contributors: Vec<&Revision<K::Value>> =
            live.iter().filter_map(|&slot| self.revision(key, slot)).collect();
        let values: Vec<&K::Value> = contributors.iter().map(|rev| rev.item.value()).collect();
        let merged_value = self.kind.merge_values(&values);

        let (Some(top), Some(value)) = (contributors.last(), merged_value) else {
            if let Some(previous) = previous {
                let status = ItemStatus {
                    removed: true,
                    ..ItemStatus::written()
                };
                consumer.remove_item(MergeEntry::new(previous, status), None)?;
                staged.merged.push((key.to_string(), None));
                staged.report.removed += 1;
            }
            return Ok(());
        };

        match previous {
            Some(previous) if *previous.value() == value => {
                consumer.keep_item(MergeEntry::new(previous, ItemStatus::written()))?;
                staged.report.kept += 1;
            }
            _ => {
                let mut merged = DataItem::new(top.item.name(), key, value)
                    .with_qualifiers(top.item.qualifiers());
                if let Some(source) = top.item.source() {
                    merged = merged.with_source(source);
                }
                let merged = Arc::new(merged);
                consumer.add_item(MergeEntry::new(&merged, ItemStatus::fresh()))?;
                staged.merged.push((key.to_string(), Some(merged)));
                staged.report.added += 1;
            }
        }
        for (&slot, rev) in live.iter().zip(&contributors) {
            staged.commit(slot, key, emitted(rev.status));
        }
        staged.live_keys.insert(key.to_string());
        Ok(())
    }

    fn apply(&mut self, staged: Staged<K::Value>) {
        for commit in staged.commits {
            match self
                .sets
                .get_mut(commit.set)
                .and_then(|set| set.revision_mut(&commit.key, commit.index))
            {
                Some(revision) => revision.status = commit.status,
                None => warn!(key = %commit.key, "staged status for a vanished revision"),
            }
        }
        for (key, item) in staged.merged {
            match item {
                Some(item) => {
                    self.merged_items.insert(key, item);
                }
                None => {
                    self.merged_items.remove(&key);
                }
            }
        }
    }
}
