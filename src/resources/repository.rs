//! In-memory resource index fed by a merge
//!
//! The repository is a [`MergeConsumer`]: merging into it keeps one item per
//! key, the same set of items a writer would emit, and answers lookups by
//! type, name, and device configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

use super::value::ResourceValue;
use crate::domain::entities::DataItem;
use crate::domain::ports::{MergeConsumer, MergeEntry};
use crate::domain::services::unescape_resource_string;
use crate::domain::value_objects::{FolderConfiguration, Locale, ResourceType};
use crate::error::MergeResult;

type Item = Arc<DataItem<ResourceValue>>;

#[derive(Debug, Default)]
pub struct ResourceRepository {
    items: BTreeMap<ResourceType, BTreeMap<String, Vec<Item>>>,
}

impl ResourceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, item: &Item) {
        let versions = self
            .items
            .entry(item.value().resource_type())
            .or_default()
            .entry(item.name().to_string())
            .or_default();
        match versions.iter_mut().find(|v| v.key() == item.key()) {
            Some(slot) => *slot = Arc::clone(item),
            None => versions.push(Arc::clone(item)),
        }
    }

    fn remove(&mut self, item: &Item) {
        let resource_type = item.value().resource_type();
        let Some(by_name) = self.items.get_mut(&resource_type) else {
            return;
        };
        if let Some(versions) = by_name.get_mut(item.name()) {
            versions.retain(|v| v.key() != item.key());
            if versions.is_empty() {
                by_name.remove(item.name());
            }
        }
        if by_name.is_empty() {
            self.items.remove(&resource_type);
        }
    }

    /// Every item of `resource_type`, across names and configurations.
    pub fn items_of_type(&self, resource_type: ResourceType) -> Vec<&Item> {
        self.items
            .get(&resource_type)
            .map(|by_name| by_name.values().flatten().collect())
            .unwrap_or_default()
    }

    /// Configurations of one resource.
    pub fn resource_items(&self, resource_type: ResourceType, name: &str) -> &[Item] {
        self.items
            .get(&resource_type)
            .and_then(|by_name| by_name.get(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_resource_item(&self, resource_type: ResourceType, name: &str) -> bool {
        !self.resource_items(resource_type, name).is_empty()
    }

    /// Whether a `@type/name` (or `@+id/name`) reference resolves here.
    /// Framework references (`@android:...`) never do.
    pub fn has_resource_url(&self, url: &str) -> bool {
        let Some(reference) = url.strip_prefix('@') else {
            return false;
        };
        let reference = reference.strip_prefix('+').unwrap_or(reference);
        let Some((type_name, name)) = reference.split_once('/') else {
            return false;
        };
        if type_name.contains(':') {
            return false;
        }
        ResourceType::from_name(type_name)
            .is_some_and(|resource_type| self.has_resource_item(resource_type, name))
    }

    pub fn available_types(&self) -> Vec<ResourceType> {
        self.items.keys().copied().collect()
    }

    fn best_match<'a>(versions: &'a [Item], config: &FolderConfiguration) -> Option<&'a Item> {
        let configs: Vec<FolderConfiguration> = versions
            .iter()
            .map(|item| FolderConfiguration::from_qualifier_str(item.qualifiers()).unwrap_or_default())
            .collect();
        FolderConfiguration::find_best_match(&configs, config).map(|index| &versions[index])
    }

    /// The best-matching item per name of `resource_type` for `config`.
    pub fn configured_resources(
        &self,
        resource_type: ResourceType,
        config: &FolderConfiguration,
    ) -> BTreeMap<String, Item> {
        let Some(by_name) = self.items.get(&resource_type) else {
            return BTreeMap::new();
        };
        by_name
            .iter()
            .filter_map(|(name, versions)| {
                Self::best_match(versions, config).map(|item| (name.clone(), Arc::clone(item)))
            })
            .collect()
    }

    /// Resolved text of a resource for `config`.
    ///
    /// Strings are unescaped; other values give their trimmed text and
    /// file-backed resources their source path.
    pub fn configured_value(
        &self,
        resource_type: ResourceType,
        name: &str,
        config: &FolderConfiguration,
    ) -> Option<String> {
        let item = Self::best_match(self.resource_items(resource_type, name), config)?;
        match item.value() {
            ResourceValue::File { .. } => item.source().map(|path| path.display().to_string()),
            ResourceValue::Element { element, .. } if resource_type == ResourceType::String => {
                Some(unescape_resource_string(&element.text_content(), false, true))
            }
            ResourceValue::Element { element, .. } => Some(element.text_content().trim().to_string()),
        }
    }

    /// Source file of the best-matching file-backed resource.
    pub fn matching_file(
        &self,
        name: &str,
        resource_type: ResourceType,
        config: &FolderConfiguration,
    ) -> Option<PathBuf> {
        let files: Vec<Item> = self
            .resource_items(resource_type, name)
            .iter()
            .filter(|item| item.value().is_file())
            .cloned()
            .collect();
        Self::best_match(&files, config).and_then(|item| item.source().map(PathBuf::from))
    }

    fn locales(&self) -> impl Iterator<Item = Locale> + '_ {
        self.items
            .values()
            .flat_map(|by_name| by_name.values().flatten())
            .filter_map(|item| FolderConfiguration::from_qualifier_str(item.qualifiers()))
            .filter_map(|config| config.locale)
    }

    /// Languages with at least one localized resource.
    pub fn languages(&self) -> BTreeSet<String> {
        self.locales().map(|locale| locale.language).collect()
    }

    /// Regions used together with `language`.
    pub fn regions(&self, language: &str) -> BTreeSet<String> {
        self.locales()
            .filter(|locale| locale.language == language)
            .filter_map(|locale| locale.region)
            .collect()
    }
}

impl MergeConsumer<ResourceValue> for ResourceRepository {
    fn add_item(&mut self, entry: MergeEntry<'_, ResourceValue>) -> MergeResult<()> {
        self.insert(entry.item);
        Ok(())
    }

    fn keep_item(&mut self, entry: MergeEntry<'_, ResourceValue>) -> MergeResult<()> {
        self.insert(entry.item);
        Ok(())
    }

    fn remove_item(
        &mut self,
        removed: MergeEntry<'_, ResourceValue>,
        replaced_by: Option<MergeEntry<'_, ResourceValue>>,
    ) -> MergeResult<()> {
        if replaced_by.is_none() {
            self.remove(removed.item);
        }
        Ok(())
    }

    /// Inline attrs are addressable here even though writers skip them.
    fn ignore_item_in_merge(&self, _item: &DataItem<ResourceValue>) -> bool {
        false
    }
}

#[cfg(test)]
mod tests;
