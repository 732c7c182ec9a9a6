//! Union of `declare-styleable` declarations across sets
//!
//! Declarations are folded lowest priority first. Child `attr` elements are
//! matched by name: an unseen name is appended, and a seen one is replaced
//! in place only by an attr that defines something (a `format` or element
//! children). A bare reference never hides an earlier definition.

use std::collections::BTreeMap;

use crate::xml::{XmlElement, XmlNode};

const STYLEABLE_TAG: &str = "declare-styleable";

/// Whether an `<attr>` defines the attribute rather than referencing it.
pub fn is_attr_definition(attr: &XmlElement) -> bool {
    attr.attr("format").is_some() || attr.has_element_children()
}

/// Merge `declarations`, ordered lowest priority first.
pub fn merge_styleables(declarations: &[&XmlElement]) -> Option<XmlElement> {
    let top = declarations.last()?;
    let mut namespaces = BTreeMap::new();
    let mut attrs: Vec<XmlElement> = Vec::new();

    for declaration in declarations {
        for (prefix, uri) in &declaration.namespaces {
            namespaces.entry(prefix.clone()).or_insert_with(|| uri.clone());
        }
        for child in declaration.elements() {
            let Some(name) = child.attr("name") else {
                continue;
            };
            match attrs.iter().position(|a| a.attr("name") == Some(name)) {
                Some(index) if is_attr_definition(child) => attrs[index] = child.clone(),
                Some(_) => {}
                None => attrs.push(child.clone()),
            }
        }
    }

    let mut merged = XmlElement::new(STYLEABLE_TAG);
    merged.attributes = top.attributes.clone();
    merged.namespaces = namespaces;
    merged.children = attrs.into_iter().map(XmlNode::Element).collect();
    Some(merged)
}
