//! DataKind port - what the generic merge engine needs from a specialization
//!
//! A set and a merger hold only a `DataKind`; everything category-specific
//! (parsing, keys, duplicate tolerance, combined merges, blob encoding) goes
//! through this trait.

use std::fmt;
use std::path::Path;

use crate::domain::entities::{DataItem, FileType};
use crate::error::MergeResult;
use crate::xml::XmlElement;

/// One item parsed out of a source file, before it gets a key.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedItem<V> {
    pub name: String,
    pub value: V,
    pub ignored_from_merge: bool,
}

impl<V> ParsedItem<V> {
    pub fn new(name: impl Into<String>, value: V) -> Self {
        Self {
            name: name.into(),
            value,
            ignored_from_merge: false,
        }
    }

    pub fn ignored(mut self) -> Self {
        self.ignored_from_merge = true;
        self
    }
}

/// Result of parsing one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile<V> {
    pub file_type: FileType,
    pub qualifiers: String,
    pub items: Vec<ParsedItem<V>>,
}

impl<V> ParsedFile<V> {
    pub fn single(qualifiers: impl Into<String>, item: ParsedItem<V>) -> Self {
        Self {
            file_type: FileType::Single,
            qualifiers: qualifiers.into(),
            items: vec![item],
        }
    }

    pub fn values(qualifiers: impl Into<String>, items: Vec<ParsedItem<V>>) -> Self {
        Self {
            file_type: FileType::Values,
            qualifiers: qualifiers.into(),
            items,
        }
    }
}

/// Capability interface of one merge specialization.
pub trait DataKind: Clone + fmt::Debug + Send + Sync + 'static {
    type Value: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Short label used in logs and in the blob (`assets`, `resources`).
    fn label(&self) -> &'static str;

    /// Whether `file` under `source_folder` is an input of this kind.
    ///
    /// Files that fail this check are reported as ignored, not unknown.
    fn is_valid_source_file(&self, source_folder: &Path, file: &Path) -> bool;

    /// Parse `file`. `Ok(None)` skips the file without error.
    fn parse_file(
        &self,
        source_folder: &Path,
        file: &Path,
        validate_names: bool,
    ) -> MergeResult<Option<ParsedFile<Self::Value>>>;

    /// Identity of an item within the merge.
    fn item_key(&self, name: &str, value: &Self::Value, qualifiers: &str) -> String;

    /// Whether two live revisions of this item may coexist in one set.
    fn allows_repetition(&self, _item: &DataItem<Self::Value>) -> bool {
        false
    }

    /// Whether revisions across sets are combined instead of overridden.
    fn requires_merge(&self, _item: &DataItem<Self::Value>) -> bool {
        false
    }

    /// Combine live values ordered lowest priority first.
    fn merge_values(&self, values: &[&Self::Value]) -> Option<Self::Value> {
        values.last().map(|value| (*value).clone())
    }

    /// Store `value` on a blob `<entry>` element.
    fn write_blob_value(&self, value: &Self::Value, entry: &mut XmlElement);

    /// Rebuild a value from a blob `<entry>` element written by
    /// [`DataKind::write_blob_value`].
    fn read_blob_value(&self, file: &Path, entry: &XmlElement) -> MergeResult<Self::Value>;
}
