//! Values document parser
//!
//! Turns a `values*/*.xml` document into value-backed items. Every child
//! element of `<resources>` with a known tag is one item; `<item>` takes
//! its category from the `type` attribute. Attributes defined inline in a
//! `declare-styleable` are reported as extra `attr` items that stay out of
//! the merged output.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::styleable::is_attr_definition;
use super::value::ResourceValue;
use crate::domain::ports::ParsedItem;
use crate::domain::services::ValueResourceNameValidator;
use crate::domain::value_objects::ResourceType;
use crate::error::{MergeError, MergeResult};
use crate::xml;

const ROOT_TAG: &str = "resources";

/// Parse the values document at `file`.
pub fn parse_values_file(file: &Path, validate_names: bool) -> MergeResult<Vec<ParsedItem<ResourceValue>>> {
    let bytes = fs::read(file)?;
    let text = String::from_utf8(bytes)
        .map_err(|_| MergeError::malformed(file, "file is not valid UTF-8"))?;
    parse_values(file, &text, validate_names)
}

/// Parse values document `text` read from `file`.
pub fn parse_values(
    file: &Path,
    text: &str,
    validate_names: bool,
) -> MergeResult<Vec<ParsedItem<ResourceValue>>> {
    let document = xml::parse_document(file, text)?;
    let root = document.root_element();
    if root.tag_name().name() != ROOT_TAG {
        return Err(xml::error_at(
            file,
            root,
            format!("Expected <{ROOT_TAG}> as the root element"),
        ));
    }

    let mut items = Vec::new();
    for node in root.children().filter(|n| n.is_element()) {
        let tag = node.tag_name().name();
        let item_type = node.attribute("type");
        let Some(resource_type) = ResourceType::from_value_tag(tag, item_type) else {
            if tag == "item" {
                let message = match item_type {
                    Some(t) => format!("Unsupported type '{t}'"),
                    None => "Missing type attribute on <item>".to_string(),
                };
                return Err(xml::error_at(file, node, message));
            }
            debug!(file = %file.display(), tag, "skipping values element");
            continue;
        };
        let Some(name) = node.attribute("name") else {
            return Err(xml::error_at(file, node, "Found item with no name"));
        };
        if validate_names {
            ValueResourceNameValidator::validate(name, file)?;
        }

        if resource_type == ResourceType::DeclareStyleable {
            for attr in node.children().filter(|c| c.has_tag_name("attr")) {
                let Some(attr_name) = attr.attribute("name") else {
                    continue;
                };
                let element = xml::detach(attr);
                if attr_name.contains(':') || !is_attr_definition(&element) {
                    continue;
                }
                items.push(
                    ParsedItem::new(attr_name, ResourceValue::element(ResourceType::Attr, element))
                        .ignored(),
                );
            }
        }
        items.push(ParsedItem::new(
            name,
            ResourceValue::element(resource_type, xml::detach(node)),
        ));
    }
    Ok(items)
}
