//! File-identity specialization
//!
//! Every file under a source folder is one item whose key is its
//! `/`-separated path relative to that folder. Contents are never parsed.

use std::path::{Component, Path};

use crate::domain::ports::{DataKind, ParsedFile, ParsedItem};
use crate::error::MergeResult;
use crate::xml::XmlElement;

/// `/`-separated path of `file` relative to `source_folder`.
pub fn relative_key(source_folder: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(source_folder).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!parts.is_empty()).then(|| parts.join("/"))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetKind;

impl DataKind for AssetKind {
    type Value = ();

    fn label(&self) -> &'static str {
        "assets"
    }

    fn is_valid_source_file(&self, source_folder: &Path, file: &Path) -> bool {
        relative_key(source_folder, file).is_some()
    }

    fn parse_file(
        &self,
        source_folder: &Path,
        file: &Path,
        _validate_names: bool,
    ) -> MergeResult<Option<ParsedFile<()>>> {
        Ok(relative_key(source_folder, file)
            .map(|name| ParsedFile::single("", ParsedItem::new(name, ()))))
    }

    fn item_key(&self, name: &str, _value: &(), _qualifiers: &str) -> String {
        name.to_string()
    }

    fn write_blob_value(&self, _value: &(), _entry: &mut XmlElement) {}

    fn read_blob_value(&self, _file: &Path, _entry: &XmlElement) -> MergeResult<()> {
        Ok(())
    }
}
