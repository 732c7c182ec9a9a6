//! One layer of the overlay stack
//!
//! A set scans its source folders into a key → revision history. Updates
//! never delete history: superseded revisions are flagged `removed` and the
//! merger decides what the output needs to hear about.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, debug_span, info_span};
use walkdir::WalkDir;

use crate::domain::entities::{DataItem, FileType, ItemStatus, Revision, SourceFile};
use crate::domain::ports::{DataKind, ParsedFile};
use crate::domain::value_objects::{FileStatus, IgnoreRules};
use crate::error::{MergeError, MergeResult};

#[derive(Debug, Clone)]
pub struct DataSet<K: DataKind> {
    name: String,
    kind: K,
    source_folders: Vec<PathBuf>,
    files: BTreeMap<PathBuf, SourceFile>,
    items: BTreeMap<String, Vec<Revision<K::Value>>>,
    ignore: IgnoreRules,
    validate_enabled: bool,
}

impl<K: DataKind> DataSet<K> {
    pub fn new(name: impl Into<String>, kind: K) -> Self {
        Self {
            name: name.into(),
            kind,
            source_folders: Vec::new(),
            files: BTreeMap::new(),
            items: BTreeMap::new(),
            ignore: IgnoreRules::builtin(),
            validate_enabled: true,
        }
    }

    /// Builder: add source folders
    pub fn with_sources<I, P>(mut self, folders: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.add_sources(folders);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn source_folders(&self) -> &[PathBuf] {
        &self.source_folders
    }

    pub fn add_source(&mut self, folder: impl Into<PathBuf>) {
        let folder = folder.into();
        if !self.source_folders.contains(&folder) {
            self.source_folders.push(folder);
        }
    }

    pub fn add_sources<I, P>(&mut self, folders: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for folder in folders {
            self.add_source(folder);
        }
    }

    /// Toggle name validation during parsing. Enabled by default.
    pub fn set_validate_enabled(&mut self, enabled: bool) {
        self.validate_enabled = enabled;
    }

    pub fn is_validate_enabled(&self) -> bool {
        self.validate_enabled
    }

    pub fn ignore_rules(&self) -> &IgnoreRules {
        &self.ignore
    }

    /// Key → revisions, oldest first.
    pub fn data_map(&self) -> &BTreeMap<String, Vec<Revision<K::Value>>> {
        &self.items
    }

    pub fn revisions(&self, key: &str) -> Option<&[Revision<K::Value>]> {
        self.items.get(key).map(Vec::as_slice)
    }

    /// Last live revision of `key`.
    pub fn authoritative(&self, key: &str) -> Option<&Revision<K::Value>> {
        self.items.get(key)?.iter().rev().find(|rev| rev.is_live())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn source_files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn get_data_file(&self, path: &Path) -> Option<&SourceFile> {
        self.files.get(path)
    }

    /// The source folder that contains `file`, if any.
    pub fn find_matching_source_folder(&self, file: &Path) -> Option<&Path> {
        self.source_folders
            .iter()
            .find(|folder| file.starts_with(folder))
            .map(PathBuf::as_path)
    }

    /// Resolve a physical file back to the source file that produced items.
    pub fn find_matching_source_file(&self, file: &Path) -> Option<&SourceFile> {
        self.find_matching_source_folder(file)?;
        self.files.get(file)
    }

    /// Scan every source folder from scratch.
    ///
    /// Missing folders are skipped. Fails on parse errors and on duplicate
    /// keys.
    pub fn load_from_files(&mut self) -> MergeResult<()> {
        let span = info_span!("load_set", set = %self.name, kind = self.kind.label());
        let _enter = span.enter();

        self.files.clear();
        self.items.clear();
        let ignore = self.ignore.clone();
        for folder in self.source_folders.clone() {
            if !folder.is_dir() {
                debug!(folder = %folder.display(), "source folder missing, skipping");
                continue;
            }
            let walker = WalkDir::new(&folder)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| {
                    entry.depth() == 0 || !ignore.is_ignored_name(&entry.file_name().to_string_lossy())
                });
            for entry in walker {
                let entry = entry.map_err(io::Error::from)?;
                if entry.file_type().is_file() {
                    self.handle_new_file(&folder, entry.path())?;
                }
            }
        }

        debug!(files = self.files.len(), keys = self.items.len(), "set loaded");
        self.check_items()
    }

    /// Apply one file-system event for `file` under `source_folder`.
    ///
    /// Returns `false` when the file is ignored or not an input of this kind.
    /// A failed parse leaves the set unchanged.
    pub fn update_with(
        &mut self,
        source_folder: &Path,
        file: &Path,
        status: FileStatus,
    ) -> MergeResult<bool> {
        let span = debug_span!("update_with", set = %self.name, file = %file.display(), %status);
        let _enter = span.enter();

        if self.ignore.is_ignored_under(source_folder, file) {
            debug!("ignored file");
            return Ok(false);
        }
        match status {
            FileStatus::Removed => Ok(self.handle_removed_file(file)),
            FileStatus::New | FileStatus::Changed if self.files.contains_key(file) => {
                self.handle_changed_file(source_folder, file)
            }
            FileStatus::New | FileStatus::Changed => self.handle_new_file(source_folder, file),
        }
    }

    /// Fail if two live revisions share a key that does not tolerate
    /// repetition.
    pub fn check_items(&self) -> MergeResult<()> {
        for (key, stack) in &self.items {
            let mut live = stack
                .iter()
                .filter(|rev| rev.is_live() && !self.kind.allows_repetition(&rev.item));
            if let (Some(first), Some(second)) = (live.next(), live.next()) {
                return Err(MergeError::duplicate(
                    key.as_str(),
                    first.item.source().unwrap_or(Path::new("")),
                    second.item.source().unwrap_or(Path::new("")),
                ));
            }
        }
        Ok(())
    }

    fn handle_new_file(&mut self, source_folder: &Path, file: &Path) -> MergeResult<bool> {
        if !self.kind.is_valid_source_file(source_folder, file) {
            debug!(file = %file.display(), "not a source file, skipping");
            return Ok(false);
        }
        let Some(parsed) = self
            .kind
            .parse_file(source_folder, file, self.validate_enabled)?
        else {
            debug!(file = %file.display(), "parser skipped file");
            return Ok(false);
        };
        debug!(file = %file.display(), items = parsed.items.len(), "parsed");
        self.insert_parsed(source_folder, file, parsed, ItemStatus::fresh());
        Ok(true)
    }

    fn handle_changed_file(&mut self, source_folder: &Path, file: &Path) -> MergeResult<bool> {
        let parsed = if self.kind.is_valid_source_file(source_folder, file) {
            self.kind
                .parse_file(source_folder, file, self.validate_enabled)?
        } else {
            None
        };
        let Some(parsed) = parsed else {
            return Ok(self.handle_removed_file(file));
        };

        let qualifiers = parsed.qualifiers.clone();
        let file_type = parsed.file_type;
        let mut incoming: BTreeMap<String, Vec<DataItem<K::Value>>> = BTreeMap::new();
        for (key, item) in self.build_items(file, parsed) {
            incoming.entry(key).or_default().push(item);
        }

        let previous_keys = self
            .files
            .get(file)
            .map(|source| source.keys().to_vec())
            .unwrap_or_default();
        let mut source = SourceFile::new(file, source_folder, qualifiers, file_type);

        for key in previous_keys {
            let Some(stack) = self.items.get_mut(&key) else {
                continue;
            };
            let live: Vec<usize> = stack
                .iter()
                .enumerate()
                .filter(|(_, rev)| rev.is_live() && rev.item.is_from(file))
                .map(|(index, _)| index)
                .collect();
            let replacement = incoming.remove(&key);

            if let Some(new_items) = &replacement {
                let unchanged = file_type == FileType::Values
                    && live.len() == new_items.len()
                    && live
                        .iter()
                        .zip(new_items)
                        .all(|(&index, item)| *stack[index].item == *item);
                if unchanged {
                    source.add_key(key);
                    continue;
                }
            }

            for index in live {
                stack[index].status.removed = true;
            }
            if let Some(new_items) = replacement {
                stack.extend(
                    new_items
                        .into_iter()
                        .map(|item| Revision::new(item, ItemStatus::fresh())),
                );
                source.add_key(key);
            }
        }

        for (key, new_items) in incoming {
            self.items.entry(key.clone()).or_default().extend(
                new_items
                    .into_iter()
                    .map(|item| Revision::new(item, ItemStatus::fresh())),
            );
            source.add_key(key);
        }

        self.files.insert(file.to_path_buf(), source);
        Ok(true)
    }

    fn handle_removed_file(&mut self, file: &Path) -> bool {
        let Some(source) = self.files.remove(file) else {
            debug!(file = %file.display(), "removed file was never loaded");
            return false;
        };
        for key in source.keys() {
            if let Some(stack) = self.items.get_mut(key) {
                stack
                    .iter_mut()
                    .filter(|rev| rev.is_live() && rev.item.is_from(file))
                    .for_each(|rev| rev.status.removed = true);
            }
        }
        true
    }

    fn build_items(
        &self,
        file: &Path,
        parsed: ParsedFile<K::Value>,
    ) -> Vec<(String, DataItem<K::Value>)> {
        let qualifiers = parsed.qualifiers;
        parsed
            .items
            .into_iter()
            .map(|parsed_item| {
                let key = self
                    .kind
                    .item_key(&parsed_item.name, &parsed_item.value, &qualifiers);
                let item = DataItem::new(parsed_item.name, key.clone(), parsed_item.value)
                    .with_qualifiers(qualifiers.clone())
                    .with_source(file)
                    .with_ignored_from_merge(parsed_item.ignored_from_merge);
                (key, item)
            })
            .collect()
    }

    fn insert_parsed(
        &mut self,
        source_folder: &Path,
        file: &Path,
        parsed: ParsedFile<K::Value>,
        status: ItemStatus,
    ) {
        let mut source = SourceFile::new(
            file,
            source_folder,
            parsed.qualifiers.clone(),
            parsed.file_type,
        );
        for (key, item) in self.build_items(file, parsed) {
            source.add_key(key.clone());
            self.items
                .entry(key)
                .or_default()
                .push(Revision::new(item, status));
        }
        self.files.insert(file.to_path_buf(), source);
    }

    pub(crate) fn insert_source_file(&mut self, source: SourceFile) {
        self.files.insert(source.path().to_path_buf(), source);
    }

    pub(crate) fn push_revision(&mut self, key: String, revision: Revision<K::Value>) {
        self.items.entry(key).or_default().push(revision);
    }

    pub(crate) fn revision_mut(&mut self, key: &str, index: usize) -> Option<&mut Revision<K::Value>> {
        self.items.get_mut(key)?.get_mut(index)
    }

    /// Drop removed revisions and the keys and files left empty.
    pub(crate) fn prune_removed(&mut self) {
        for stack in self.items.values_mut() {
            stack.retain(Revision::is_live);
        }
        self.items.retain(|_, stack| !stack.is_empty());
        let items = &self.items;
        for source in self.files.values_mut() {
            let stale: Vec<String> = source
                .keys()
                .iter()
                .filter(|key| {
                    !items.get(key.as_str()).is_some_and(|stack| {
                        stack.iter().any(|rev| rev.item.is_from(source.path()))
                    })
                })
                .cloned()
                .collect();
            for key in stale {
                source.remove_key(&key);
            }
        }
    }
}
