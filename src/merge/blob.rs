//! Merge snapshot codec (`merger.xml`)
//!
//! ```xml
//! <merger version="3" kind="resources">
//!     <dataSet config="main">
//!         <source path="$TOP$$SEP$src$SEP$main$SEP$res">
//!             <file path="..." qualifiers="en" type="values">
//!                 <entry name="app_name" type="string" written="true">...</entry>
//!             </file>
//!         </source>
//!     </dataSet>
//!     <mergedItems>
//!         <entry key="declare-styleable/Button" name="Button" type="declare-styleable">...</entry>
//!     </mergedItems>
//! </merger>
//! ```
//!
//! Paths under the project root start with `$TOP$` and every separator is
//! written as `$SEP$`, so a snapshot can move between checkouts.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};
use std::sync::Arc;

use tracing::{debug, warn};

use super::data_set::DataSet;
use crate::domain::entities::{DataItem, FileType, ItemStatus, Revision, SourceFile};
use crate::domain::ports::DataKind;
use crate::error::{MergeError, MergeResult};
use crate::infrastructure::fs::LocalFs;
use crate::xml::{self, XmlElement};

pub const BLOB_FILE_NAME: &str = "merger.xml";
pub const BLOB_VERSION: &str = "3";

const TOP_PLACEHOLDER: &str = "$TOP$";
const SEP_PLACEHOLDER: &str = "$SEP$";

const TAG_MERGER: &str = "merger";
const TAG_DATA_SET: &str = "dataSet";
const TAG_SOURCE: &str = "source";
const TAG_FILE: &str = "file";
const TAG_ENTRY: &str = "entry";
const TAG_MERGED_ITEMS: &str = "mergedItems";

pub fn blob_path(folder: &Path) -> PathBuf {
    folder.join(BLOB_FILE_NAME)
}

/// Sets and combined items read back from a snapshot.
#[derive(Debug)]
pub(crate) struct Snapshot<K: DataKind> {
    pub sets: Vec<DataSet<K>>,
    pub merged_items: BTreeMap<String, Arc<DataItem<K::Value>>>,
}

/// Rewrites paths to and from their portable form.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PathCodec<'a> {
    root: Option<&'a Path>,
}

impl<'a> PathCodec<'a> {
    pub fn new(root: Option<&'a Path>) -> Self {
        Self { root }
    }

    pub fn encode(&self, path: &Path) -> String {
        if let Some(relative) = self.root.and_then(|root| path.strip_prefix(root).ok()) {
            let mut out = String::from(TOP_PLACEHOLDER);
            for component in relative.components() {
                out.push_str(SEP_PLACEHOLDER);
                out.push_str(&component.as_os_str().to_string_lossy());
            }
            return out;
        }
        path.to_string_lossy()
            .replace(MAIN_SEPARATOR_STR, SEP_PLACEHOLDER)
    }

    /// `None` when the path is root-relative and no root is known.
    pub fn decode(&self, encoded: &str) -> Option<PathBuf> {
        let native = |s: &str| s.replace(SEP_PLACEHOLDER, MAIN_SEPARATOR_STR);
        match encoded.strip_prefix(TOP_PLACEHOLDER) {
            Some(rest) => {
                let root = self.root?;
                let rest = native(rest);
                let rest = rest.trim_start_matches(MAIN_SEPARATOR);
                Some(if rest.is_empty() {
                    root.to_path_buf()
                } else {
                    root.join(rest)
                })
            }
            None => Some(PathBuf::from(native(encoded))),
        }
    }
}

fn flag(entry: &mut XmlElement, name: &str, on: bool) {
    if on {
        entry.set_attr(name, "true");
    }
}

fn read_flag(entry: &XmlElement, name: &str) -> bool {
    entry.attr(name) == Some("true")
}

fn encode_set<K: DataKind>(kind: &K, set: &DataSet<K>, paths: PathCodec<'_>) -> XmlElement {
    let mut set_node = XmlElement::new(TAG_DATA_SET).with_attr("config", set.name());
    for folder in set.source_folders() {
        let mut source_node = XmlElement::new(TAG_SOURCE).with_attr("path", paths.encode(folder));
        for file in set.source_files().filter(|f| f.source_folder() == folder) {
            let mut file_node = XmlElement::new(TAG_FILE)
                .with_attr("path", paths.encode(file.path()))
                .with_attr("type", file.file_type().as_str());
            if !file.qualifiers().is_empty() {
                file_node.set_attr("qualifiers", file.qualifiers());
            }
            for key in file.keys() {
                let revisions = set.revisions(key).unwrap_or_default();
                for revision in revisions.iter().filter(|rev| rev.item.is_from(file.path())) {
                    let mut entry = XmlElement::new(TAG_ENTRY).with_attr("name", revision.item.name());
                    kind.write_blob_value(revision.item.value(), &mut entry);
                    flag(&mut entry, "written", revision.status.written);
                    flag(&mut entry, "touched", revision.status.touched);
                    flag(&mut entry, "removed", revision.status.removed);
                    flag(&mut entry, "ignored", revision.item.ignored_from_merge());
                    file_node = file_node.with_child(entry);
                }
            }
            source_node = source_node.with_child(file_node);
        }
        set_node = set_node.with_child(source_node);
    }
    set_node
}

/// Serialize the merger state into `folder/merger.xml`.
pub(crate) fn write_blob<K: DataKind>(
    kind: &K,
    sets: &[DataSet<K>],
    merged_items: &BTreeMap<String, Arc<DataItem<K::Value>>>,
    folder: &Path,
    root: Option<&Path>,
) -> MergeResult<()> {
    let paths = PathCodec::new(root);
    let mut document = XmlElement::new(TAG_MERGER)
        .with_attr("version", BLOB_VERSION)
        .with_attr("kind", kind.label());
    for set in sets {
        document = document.with_child(encode_set(kind, set, paths));
    }

    if !merged_items.is_empty() {
        let mut merged_node = XmlElement::new(TAG_MERGED_ITEMS);
        for (key, item) in merged_items {
            let mut entry = XmlElement::new(TAG_ENTRY)
                .with_attr("key", key.as_str())
                .with_attr("name", item.name());
            if !item.qualifiers().is_empty() {
                entry.set_attr("qualifiers", item.qualifiers());
            }
            kind.write_blob_value(item.value(), &mut entry);
            merged_node = merged_node.with_child(entry);
        }
        document = document.with_child(merged_node);
    }

    let target = blob_path(folder);
    LocalFs::new().write_atomic(&target, document.to_document_string().as_bytes())?;
    debug!(blob = %target.display(), sets = sets.len(), "wrote merge blob");
    Ok(())
}

/// Read `folder/merger.xml`.
///
/// `Ok(None)` means the snapshot is absent or unusable. Only I/O failures on
/// an existing snapshot are errors.
pub(crate) fn read_blob<K: DataKind>(
    kind: &K,
    folder: &Path,
    root: Option<&Path>,
    incremental_state: bool,
) -> MergeResult<Option<Snapshot<K>>> {
    let path = blob_path(folder);
    if !path.is_file() {
        debug!(blob = %path.display(), "no merge blob");
        return Ok(None);
    }
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            warn!(blob = %path.display(), "merge blob is not UTF-8, ignoring");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    match decode(kind, &path, &text, root, incremental_state) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(e) => {
            warn!(blob = %path.display(), error = %e, "merge blob unusable, full rescan needed");
            Ok(None)
        }
    }
}

fn incompatible(reason: impl Into<String>) -> MergeError {
    MergeError::IncompatibleSnapshot {
        reason: reason.into(),
    }
}

fn decode<K: DataKind>(
    kind: &K,
    blob: &Path,
    text: &str,
    root: Option<&Path>,
    incremental_state: bool,
) -> MergeResult<Snapshot<K>> {
    let document = xml::parse_root(blob, text)?;
    if document.name != TAG_MERGER {
        return Err(incompatible(format!("unexpected root <{}>", document.name)));
    }
    match document.attr("version") {
        Some(BLOB_VERSION) => {}
        other => {
            return Err(incompatible(format!(
                "version {} is not {BLOB_VERSION}",
                other.unwrap_or("<none>")
            )))
        }
    }
    if let Some(label) = document.attr("kind") {
        if label != kind.label() {
            return Err(incompatible(format!("written for {label}, not {}", kind.label())));
        }
    }

    let paths = PathCodec::new(root);
    let decode_path = |encoded: Option<&str>, what: &str| -> MergeResult<PathBuf> {
        let encoded = encoded.ok_or_else(|| incompatible(format!("{what} without a path")))?;
        paths
            .decode(encoded)
            .ok_or_else(|| incompatible(format!("{encoded} needs a project root")))
    };

    let mut snapshot = Snapshot {
        sets: Vec::new(),
        merged_items: BTreeMap::new(),
    };

    for node in document.elements() {
        match node.name.as_str() {
            TAG_DATA_SET => {
                let name = node
                    .attr("config")
                    .ok_or_else(|| incompatible("data set without a name"))?;
                let mut set = DataSet::new(name, kind.clone());
                for source_node in node.elements().filter(|n| n.name == TAG_SOURCE) {
                    let folder = decode_path(source_node.attr("path"), "source")?;
                    set.add_source(folder.clone());
                    for file_node in source_node.elements().filter(|n| n.name == TAG_FILE) {
                        decode_file(
                            kind,
                            &mut set,
                            &folder,
                            &file_node.scoped(&document.namespaces),
                            &decode_path,
                            incremental_state,
                        )?;
                    }
                }
                snapshot.sets.push(set);
            }
            TAG_MERGED_ITEMS if incremental_state => {
                for entry in node.elements().filter(|n| n.name == TAG_ENTRY) {
                    let (Some(key), Some(name)) = (entry.attr("key"), entry.attr("name")) else {
                        return Err(incompatible("merged item without key or name"));
                    };
                    let value = kind.read_blob_value(blob, &entry.scoped(&document.namespaces))?;
                    let item = DataItem::new(name, key, value)
                        .with_qualifiers(entry.attr("qualifiers").unwrap_or_default());
                    snapshot.merged_items.insert(key.to_string(), Arc::new(item));
                }
            }
            _ => {}
        }
    }
    Ok(snapshot)
}

fn decode_file<K, F>(
    kind: &K,
    set: &mut DataSet<K>,
    folder: &Path,
    file_node: &XmlElement,
    decode_path: &F,
    incremental_state: bool,
) -> MergeResult<()>
where
    K: DataKind,
    F: Fn(Option<&str>, &str) -> MergeResult<PathBuf>,
{
    let path = decode_path(file_node.attr("path"), "file")?;
    let qualifiers = file_node.attr("qualifiers").unwrap_or_default();
    let file_type = match file_node.attr("type") {
        Some(t) => FileType::parse(t).ok_or_else(|| incompatible(format!("unknown file type {t}")))?,
        None => FileType::Single,
    };
    let mut source = SourceFile::new(&path, folder, qualifiers, file_type);

    for entry in file_node.elements().filter(|n| n.name == TAG_ENTRY) {
        let name = entry
            .attr("name")
            .ok_or_else(|| incompatible("entry without a name"))?;
        let removed = read_flag(entry, "removed");
        let status = if incremental_state {
            ItemStatus {
                written: read_flag(entry, "written"),
                touched: read_flag(entry, "touched"),
                removed,
            }
        } else if removed {
            continue;
        } else {
            ItemStatus::fresh()
        };
        let value = kind.read_blob_value(&path, &entry.scoped(&file_node.namespaces))?;
        let key = kind.item_key(name, &value, qualifiers);
        let item = DataItem::new(name, key.clone(), value)
            .with_qualifiers(qualifiers)
            .with_source(&path)
            .with_ignored_from_merge(read_flag(entry, "ignored"));
        if !removed {
            source.add_key(key.clone());
        }
        set.push_revision(key, Revision::new(item, status));
    }
    set.insert_source_file(source);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_paths_use_placeholders() {
        let root = Path::new("/work/app");
        let codec = PathCodec::new(Some(root));
        let encoded = codec.encode(Path::new("/work/app/src/main/res"));
        assert_eq!(encoded, "$TOP$$SEP$src$SEP$main$SEP$res");

        let moved = PathCodec::new(Some(Path::new("/other/checkout")));
        assert_eq!(
            moved.decode(&encoded),
            Some(PathBuf::from("/other/checkout/src/main/res"))
        );
    }

    #[test]
    fn root_itself_encodes_to_top() {
        let codec = PathCodec::new(Some(Path::new("/work/app")));
        assert_eq!(codec.encode(Path::new("/work/app")), "$TOP$");
        assert_eq!(codec.decode("$TOP$"), Some(PathBuf::from("/work/app")));
    }

    #[test]
    fn unrooted_paths_only_replace_separators() {
        let codec = PathCodec::new(None);
        let encoded = codec.encode(Path::new("/main/res1"));
        assert_eq!(encoded, "$SEP$main$SEP$res1");
        assert_eq!(codec.decode(&encoded), Some(PathBuf::from("/main/res1")));
    }

    #[test]
    fn top_without_root_is_undecodable() {
        assert_eq!(PathCodec::new(None).decode("$TOP$$SEP$res"), None);
    }
}
