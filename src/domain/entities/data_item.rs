//! DataItem entity - one named unit of merged data
//!
//! An item is immutable once parsed. Its lifecycle flags live beside it in
//! a [`Revision`], so the same `Arc<DataItem>` can sit in a set's history
//! and in a read-side index without either seeing the other's mutations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Lifecycle flags of one revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemStatus {
    /// Already reflected in the physical output
    pub written: bool,
    /// Changed since the last successful write
    pub touched: bool,
    /// Superseded or deleted at the source
    pub removed: bool,
}

impl ItemStatus {
    /// Status of a freshly parsed revision.
    pub fn fresh() -> Self {
        Self {
            touched: true,
            ..Self::default()
        }
    }

    /// Status of a revision already present in the output.
    pub fn written() -> Self {
        Self {
            written: true,
            ..Self::default()
        }
    }

    /// Whether the merge must (re)emit this revision when authoritative.
    pub fn needs_write(&self) -> bool {
        self.touched || !self.written
    }
}

/// A named item produced by parsing a source file.
#[derive(Debug, Clone, PartialEq)]
pub struct DataItem<V> {
    name: String,
    key: String,
    qualifiers: String,
    value: V,
    source: Option<PathBuf>,
    ignored_from_merge: bool,
}

impl<V> DataItem<V> {
    pub fn new(name: impl Into<String>, key: impl Into<String>, value: V) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            qualifiers: String::new(),
            value,
            source: None,
            ignored_from_merge: false,
        }
    }

    /// Builder: set the folder qualifiers
    pub fn with_qualifiers(mut self, qualifiers: impl Into<String>) -> Self {
        self.qualifiers = qualifiers.into();
        self
    }

    /// Builder: set the source file
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Builder: mark as folded into its owner instead of emitted alone
    pub fn with_ignored_from_merge(mut self, ignored: bool) -> Self {
        self.ignored_from_merge = ignored;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn qualifiers(&self) -> &str {
        &self.qualifiers
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// The file this item was parsed from. Merged items report their
    /// highest-priority contributor.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn ignored_from_merge(&self) -> bool {
        self.ignored_from_merge
    }

    pub fn is_from(&self, file: &Path) -> bool {
        self.source.as_deref() == Some(file)
    }
}

/// One entry of a key's history inside a set.
#[derive(Debug, Clone)]
pub struct Revision<V> {
    pub item: Arc<DataItem<V>>,
    pub status: ItemStatus,
}

impl<V> Revision<V> {
    pub fn new(item: DataItem<V>, status: ItemStatus) -> Self {
        Self {
            item: Arc::new(item),
            status,
        }
    }

    pub fn is_live(&self) -> bool {
        !self.status.removed
    }
}
