//! Value-aware specialization
//!
//! Source folders hold typed subfolders (`drawable-hdpi`, `values-fr`).
//! Files in typed folders are single items named after the file; files in
//! `values*` folders are documents holding many items.

use std::path::Path;

use tracing::warn;

use super::parser::parse_values_file;
use super::styleable::merge_styleables;
use super::value::ResourceValue;
use crate::domain::entities::DataItem;
use crate::domain::ports::{DataKind, ParsedFile, ParsedItem};
use crate::domain::services::FileResourceNameValidator;
use crate::domain::value_objects::{FolderConfiguration, ResourceFolderType, ResourceType};
use crate::error::{MergeError, MergeResult};
use crate::xml::{XmlElement, XmlNode};

/// `type[-qualifiers]/name`
pub fn resource_key(resource_type: ResourceType, qualifiers: &str, name: &str) -> String {
    if qualifiers.is_empty() {
        format!("{resource_type}/{name}")
    } else {
        format!("{resource_type}-{qualifiers}/{name}")
    }
}

/// Folder type and raw qualifier string of the typed folder holding `file`,
/// provided that folder sits directly under `source_folder`.
pub fn typed_folder<'a>(source_folder: &Path, file: &'a Path) -> Option<(ResourceFolderType, &'a str)> {
    let folder = file.parent()?;
    if folder.parent()? != source_folder {
        return None;
    }
    ResourceFolderType::from_folder_name(folder.file_name()?.to_str()?)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceKind;

impl DataKind for ResourceKind {
    type Value = ResourceValue;

    fn label(&self) -> &'static str {
        "resources"
    }

    fn is_valid_source_file(&self, source_folder: &Path, file: &Path) -> bool {
        typed_folder(source_folder, file).is_some()
    }

    fn parse_file(
        &self,
        source_folder: &Path,
        file: &Path,
        validate_names: bool,
    ) -> MergeResult<Option<ParsedFile<ResourceValue>>> {
        let Some((folder_type, raw_qualifiers)) = typed_folder(source_folder, file) else {
            return Ok(None);
        };
        let Some(config) = FolderConfiguration::from_qualifier_str(raw_qualifiers) else {
            warn!(file = %file.display(), qualifiers = raw_qualifiers, "skipping file in folder with invalid qualifiers");
            return Ok(None);
        };
        let qualifiers = config.qualifier_string();

        let Some(resource_type) = folder_type.file_resource_type() else {
            let items = parse_values_file(file, validate_names)?;
            return Ok(Some(ParsedFile::values(qualifiers, items)));
        };

        if validate_names {
            FileResourceNameValidator::validate(file, folder_type)?;
        }
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = file_name.split('.').next().unwrap_or_default();
        if name.is_empty() {
            warn!(file = %file.display(), "skipping resource file without a name");
            return Ok(None);
        }
        Ok(Some(ParsedFile::single(
            qualifiers,
            ParsedItem::new(name, ResourceValue::file(resource_type)),
        )))
    }

    fn item_key(&self, name: &str, value: &ResourceValue, qualifiers: &str) -> String {
        resource_key(value.resource_type(), qualifiers, name)
    }

    fn allows_repetition(&self, item: &DataItem<ResourceValue>) -> bool {
        let resource_type = item.value().resource_type();
        resource_type.tolerates_repetition()
            || (resource_type == ResourceType::Attr && item.ignored_from_merge())
    }

    fn requires_merge(&self, item: &DataItem<ResourceValue>) -> bool {
        item.value().resource_type() == ResourceType::DeclareStyleable
    }

    fn merge_values(&self, values: &[&ResourceValue]) -> Option<ResourceValue> {
        let declarations: Vec<&XmlElement> = values.iter().filter_map(|v| v.as_element()).collect();
        merge_styleables(&declarations)
            .map(|element| ResourceValue::element(ResourceType::DeclareStyleable, element))
    }

    fn write_blob_value(&self, value: &ResourceValue, entry: &mut XmlElement) {
        entry.set_attr("type", value.resource_type().name());
        if let Some(element) = value.as_element() {
            entry.children.push(XmlNode::Element(element.clone()));
        }
    }

    fn read_blob_value(&self, file: &Path, entry: &XmlElement) -> MergeResult<ResourceValue> {
        let resource_type = entry
            .attr("type")
            .and_then(ResourceType::from_name)
            .ok_or_else(|| MergeError::IncompatibleSnapshot {
                reason: format!("entry for {} has no valid type", file.display()),
            })?;
        Ok(match entry.elements().next() {
            Some(payload) => ResourceValue::element(resource_type, payload.scoped(&entry.namespaces)),
            None => ResourceValue::file(resource_type),
        })
    }
}
