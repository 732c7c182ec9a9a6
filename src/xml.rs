//! Owned XML element tree
//!
//! Source documents are parsed with `roxmltree`, which keeps byte ranges so
//! errors can carry `line:column`. Values that must outlive the parsed
//! document (resource values, blob payloads) are detached into
//! [`XmlElement`], which also knows how to serialize itself back.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::error::{MergeError, MergeResult};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A node inside an owned element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
}

/// An owned, detached XML element.
///
/// Names are kept qualified (`xliff:g`). A detached root carries the
/// namespace declarations its subtree actually uses, so it can be written
/// on its own or folded into a parent that declares them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub namespaces: BTreeMap<String, String>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Local part of the element name.
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map(|(_, local)| local)
            .unwrap_or(&self.name)
    }

    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn has_element_children(&self) -> bool {
        self.elements().next().is_some()
    }

    /// Concatenated text of this element.
    ///
    /// Nested markup (for example `xliff:g` placeholders) is skipped while
    /// its text is kept, so whitespace between placeholders survives.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Copy of this element declaring the part of `scope` its subtree uses.
    ///
    /// Elements pulled out of a larger tree lose the declarations made on
    /// their ancestors; this restores them.
    pub fn scoped(&self, scope: &BTreeMap<String, String>) -> XmlElement {
        let mut prefixes = BTreeSet::new();
        self.collect_prefixes(&mut prefixes);
        let mut copy = self.clone();
        for prefix in prefixes {
            if let Some(uri) = scope.get(prefix) {
                copy.namespaces
                    .entry(prefix.to_string())
                    .or_insert_with(|| uri.clone());
            }
        }
        copy
    }

    fn collect_prefixes<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        out.insert(self.prefix().unwrap_or(""));
        for (name, _) in &self.attributes {
            if let Some((prefix, _)) = name.split_once(':') {
                if prefix != "xml" && prefix != "xmlns" {
                    out.insert(prefix);
                }
            }
        }
        for child in self.elements() {
            child.collect_prefixes(out);
        }
    }

    /// Serialize as a standalone document.
    pub fn to_document_string(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        self.write_into(&mut out, 0, &self.namespaces);
        out.push('\n');
        out
    }

    /// Serialize this element at `depth`, declaring `namespaces` on it.
    ///
    /// Child elements declare their own `namespaces`, so a detached value
    /// stays well-formed wherever it is embedded.
    pub fn write_into(&self, out: &mut String, depth: usize, namespaces: &BTreeMap<String, String>) {
        out.push('<');
        out.push_str(&self.name);
        for (prefix, uri) in namespaces {
            if prefix.is_empty() {
                out.push_str(" xmlns=\"");
            } else {
                out.push_str(" xmlns:");
                out.push_str(prefix);
                out.push_str("=\"");
            }
            escape_into(uri, true, out);
            out.push('"');
        }
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        let mixed = self
            .children
            .iter()
            .any(|child| matches!(child, XmlNode::Text(_)));
        for child in &self.children {
            if !mixed {
                out.push('\n');
                push_indent(out, depth + 1);
            }
            match child {
                XmlNode::Element(element) => {
                    let child_depth = if mixed { depth } else { depth + 1 };
                    element.write_into(out, child_depth, &element.namespaces)
                }
                XmlNode::Text(text) => escape_into(text, false, out),
                XmlNode::Comment(text) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
            }
        }
        if !mixed {
            out.push('\n');
            push_indent(out, depth);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn collect_text(children: &[XmlNode], out: &mut String) {
    for child in children {
        match child {
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::Element(element) => collect_text(&element.children, out),
            XmlNode::Comment(_) => {}
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
}

/// Parse `text` read from `file`, mapping syntax errors to positioned
/// [`MergeError::MalformedSource`] values.
pub fn parse_document<'input>(
    file: &Path,
    text: &'input str,
) -> MergeResult<roxmltree::Document<'input>> {
    roxmltree::Document::parse(text).map_err(|e| {
        let pos = e.pos();
        let message = e.to_string();
        let suffix = format!(" at {}:{}", pos.row, pos.col);
        let message = message
            .strip_suffix(&suffix)
            .map(str::to_string)
            .unwrap_or(message);
        MergeError::MalformedSource {
            file: file.to_path_buf(),
            line: Some(pos.row),
            column: Some(pos.col),
            message,
        }
    })
}

/// Parse a document and detach its root element.
pub fn parse_root(file: &Path, text: &str) -> MergeResult<XmlElement> {
    let doc = parse_document(file, text)?;
    Ok(detach(doc.root_element()))
}

/// `line:column` of a node in its document.
pub fn position(node: roxmltree::Node<'_, '_>) -> (u32, u32) {
    let pos = node.document().text_pos_at(node.range().start);
    (pos.row, pos.col)
}

/// Build a positioned error pointing at `node`.
pub fn error_at(file: &Path, node: roxmltree::Node<'_, '_>, message: impl Into<String>) -> MergeError {
    let (line, column) = position(node);
    MergeError::MalformedSource {
        file: file.to_path_buf(),
        line: Some(line),
        column: Some(column),
        message: message.into(),
    }
}

/// Copy `node` and its subtree into an owned element that declares the
/// namespaces the subtree uses.
pub fn detach(node: roxmltree::Node<'_, '_>) -> XmlElement {
    let mut used = BTreeMap::new();
    let mut element = convert(node, &mut used);
    element.namespaces = used;
    element
}

fn convert(node: roxmltree::Node<'_, '_>, used: &mut BTreeMap<String, String>) -> XmlElement {
    let tag = node.tag_name();
    let name = qualify(node, tag.namespace(), tag.name(), used, true);

    let attributes = node
        .attributes()
        .map(|attr| {
            (
                qualify(node, attr.namespace(), attr.name(), used, false),
                attr.value().to_string(),
            )
        })
        .collect();

    // Only line-breaking indentation between elements is layout; any other
    // whitespace run is content, such as the gap between two placeholders.
    let element_only = node.children().any(|c| c.is_element())
        && !node
            .children()
            .any(|c| c.is_text() && !c.text().unwrap_or_default().trim().is_empty());
    let is_layout = |text: &str| element_only && text.trim().is_empty() && text.contains('\n');

    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(XmlNode::Element(convert(child, used)));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            if !is_layout(text) {
                children.push(XmlNode::Text(text.to_string()));
            }
        } else if child.is_comment() {
            children.push(XmlNode::Comment(child.text().unwrap_or_default().to_string()));
        }
    }

    XmlElement {
        name,
        attributes,
        namespaces: BTreeMap::new(),
        children,
    }
}

fn qualify(
    node: roxmltree::Node<'_, '_>,
    namespace: Option<&str>,
    local: &str,
    used: &mut BTreeMap<String, String>,
    is_element: bool,
) -> String {
    let Some(uri) = namespace else {
        return local.to_string();
    };
    if uri == XML_NAMESPACE {
        return format!("xml:{local}");
    }
    match node.lookup_prefix(uri) {
        Some(prefix) if !prefix.is_empty() => {
            used.insert(prefix.to_string(), uri.to_string());
            format!("{prefix}:{local}")
        }
        _ => {
            if is_element {
                used.insert(String::new(), uri.to_string());
            }
            local.to_string()
        }
    }
}
