//! Writes merged resources into an output `res` folder
//!
//! File-backed items are copied to `<type>[-q]/<file name>`. Value-backed
//! items are collected per qualifier and each qualifier whose content moved
//! gets its `values[-q]/values[-q].xml` regenerated at `end()`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use walkdir::WalkDir;

use super::value::ResourceValue;
use crate::assets::WriteStats;
use crate::domain::entities::DataItem;
use crate::domain::ports::{MergeConsumer, MergeEntry};
use crate::domain::value_objects::{ResourceFolderType, ResourceType};
use crate::error::{MergeError, MergeResult};
use crate::infrastructure::fs::LocalFs;
use crate::xml::{XmlElement, XmlNode};

type Item = Arc<DataItem<ResourceValue>>;

fn folder_name(base: &str, qualifiers: &str) -> String {
    if qualifiers.is_empty() {
        base.to_string()
    } else {
        format!("{base}-{qualifiers}")
    }
}

/// Render the values document for one qualifier, items sorted by type then
/// name.
pub fn render_values(items: &[Item]) -> String {
    let mut sorted: Vec<&Item> = items.iter().collect();
    sorted.sort_by(|a, b| {
        (a.value().resource_type(), a.name()).cmp(&(b.value().resource_type(), b.name()))
    });
    let mut root = XmlElement::new("resources");
    for item in sorted {
        if let Some(element) = item.value().as_element() {
            root.children.push(XmlNode::Element(element.clone()));
        }
    }
    root.to_document_string()
}

#[derive(Debug)]
pub struct MergedResourceWriter {
    root: PathBuf,
    fs: LocalFs,
    values: BTreeMap<String, Vec<Item>>,
    dirty: BTreeSet<String>,
    outputs: BTreeSet<PathBuf>,
    stats: WriteStats,
}

impl MergedResourceWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fs: LocalFs::new(),
            values: BTreeMap::new(),
            dirty: BTreeSet::new(),
            outputs: BTreeSet::new(),
            stats: WriteStats::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// `values[-q]/values[-q].xml`
    pub fn values_file(&self, qualifiers: &str) -> PathBuf {
        let folder = folder_name(ResourceFolderType::Values.name(), qualifiers);
        self.root.join(&folder).join(format!("{folder}.xml"))
    }

    fn file_target(&self, item: &DataItem<ResourceValue>, resource_type: ResourceType) -> MergeResult<PathBuf> {
        let missing = |what: &str| MergeError::Consumer {
            message: format!("resource {} has no {what}", item.key()),
        };
        let folder = ResourceFolderType::for_file_resource(resource_type)
            .ok_or_else(|| missing("output folder"))?;
        let file_name = item
            .source()
            .and_then(Path::file_name)
            .ok_or_else(|| missing("source file"))?;
        Ok(self
            .root
            .join(folder_name(folder.name(), item.qualifiers()))
            .join(file_name))
    }

    fn track_value(&mut self, item: &Item) {
        self.values
            .entry(item.qualifiers().to_string())
            .or_default()
            .push(Arc::clone(item));
    }

    fn delete(&mut self, path: &Path) -> MergeResult<()> {
        if self.fs.remove_file(path, &self.root)? {
            debug!(target = %path.display(), "deleted resource output");
            self.stats.deleted += 1;
        }
        Ok(())
    }
}

impl MergeConsumer<ResourceValue> for MergedResourceWriter {
    fn start(&mut self) -> MergeResult<()> {
        self.values.clear();
        self.dirty.clear();
        self.outputs.clear();
        self.stats = WriteStats::default();
        std::fs::create_dir_all(&self.root).map_err(|e| MergeError::write_failure(&self.root, e))
    }

    fn add_item(&mut self, entry: MergeEntry<'_, ResourceValue>) -> MergeResult<()> {
        let item = entry.item;
        match item.value() {
            ResourceValue::Element { .. } => {
                self.track_value(item);
                self.dirty.insert(item.qualifiers().to_string());
            }
            ResourceValue::File { resource_type } => {
                let target = self.file_target(item, *resource_type)?;
                let source = item.source().ok_or_else(|| MergeError::Consumer {
                    message: format!("resource {} has no source file", item.key()),
                })?;
                if self.fs.copy_file(source, &target)? {
                    debug!(target = %target.display(), "copied resource file");
                    self.stats.copied += 1;
                }
                self.outputs.insert(target);
            }
        }
        Ok(())
    }

    fn keep_item(&mut self, entry: MergeEntry<'_, ResourceValue>) -> MergeResult<()> {
        let item = entry.item;
        match item.value() {
            ResourceValue::Element { .. } => self.track_value(item),
            ResourceValue::File { resource_type } => {
                let target = self.file_target(item, *resource_type)?;
                self.outputs.insert(target);
            }
        }
        Ok(())
    }

    fn remove_item(
        &mut self,
        removed: MergeEntry<'_, ResourceValue>,
        replaced_by: Option<MergeEntry<'_, ResourceValue>>,
    ) -> MergeResult<()> {
        let item = removed.item;
        match item.value() {
            ResourceValue::Element { .. } => {
                self.dirty.insert(item.qualifiers().to_string());
            }
            ResourceValue::File { resource_type } => {
                let target = self.file_target(item, *resource_type)?;
                let replacement = match replaced_by.map(|r| r.item) {
                    Some(new) => match new.value() {
                        ResourceValue::File { resource_type } => {
                            Some(self.file_target(new, *resource_type)?)
                        }
                        ResourceValue::Element { .. } => None,
                    },
                    None => None,
                };
                if replacement.as_ref() != Some(&target) {
                    self.delete(&target)?;
                }
            }
        }
        Ok(())
    }

    fn end(&mut self) -> MergeResult<()> {
        let dirty = std::mem::take(&mut self.dirty);
        for qualifiers in &dirty {
            let path = self.values_file(qualifiers);
            match self.values.get(qualifiers) {
                Some(items) if !items.is_empty() => {
                    self.fs.write_atomic(&path, render_values(items).as_bytes())?;
                    debug!(target = %path.display(), items = items.len(), "wrote values file");
                    self.stats.copied += 1;
                }
                _ => self.delete(&path)?,
            }
        }
        let written: Vec<PathBuf> = self.values.keys().map(|q| self.values_file(q)).collect();
        self.outputs.extend(written);
        Ok(())
    }

    fn clean_up(&mut self, _live_keys: &BTreeSet<String>) -> MergeResult<()> {
        if !self.root.is_dir() {
            return Ok(());
        }
        let stale: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file() && !self.outputs.contains(entry.path()))
            .map(|entry| entry.into_path())
            .collect();
        for path in stale {
            self.delete(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
