//! MergeConsumer port - the sink a merge reports to
//!
//! The merger walks every key and tells the consumer what changed. Writers
//! turn these notifications into file copies and deletes; the repository
//! turns them into an in-memory index.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::entities::{DataItem, ItemStatus};
use crate::error::MergeResult;

/// An item handed to a consumer along with its status at merge time.
#[derive(Debug)]
pub struct MergeEntry<'a, V> {
    pub item: &'a Arc<DataItem<V>>,
    pub status: ItemStatus,
}

impl<V> Clone for MergeEntry<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for MergeEntry<'_, V> {}

impl<'a, V> MergeEntry<'a, V> {
    pub fn new(item: &'a Arc<DataItem<V>>, status: ItemStatus) -> Self {
        Self { item, status }
    }
}

pub trait MergeConsumer<V> {
    fn start(&mut self) -> MergeResult<()> {
        Ok(())
    }

    fn end(&mut self) -> MergeResult<()> {
        Ok(())
    }

    /// The item is now authoritative for its key and is new or changed.
    fn add_item(&mut self, entry: MergeEntry<'_, V>) -> MergeResult<()>;

    /// A previously emitted item is gone, or superseded by `replaced_by`.
    ///
    /// When an item is replaced, `add_item` for the replacement has already
    /// been called.
    fn remove_item(
        &mut self,
        removed: MergeEntry<'_, V>,
        replaced_by: Option<MergeEntry<'_, V>>,
    ) -> MergeResult<()>;

    /// The item is authoritative and unchanged since the last merge.
    fn keep_item(&mut self, _entry: MergeEntry<'_, V>) -> MergeResult<()> {
        Ok(())
    }

    /// Items the merge should skip entirely for this consumer.
    fn ignore_item_in_merge(&self, item: &DataItem<V>) -> bool {
        item.ignored_from_merge()
    }

    /// Called after `end` when the merge prunes history.
    fn clean_up(&mut self, _live_keys: &BTreeSet<String>) -> MergeResult<()> {
        Ok(())
    }
}
