//! SourceFile entity - one physical input file of a set

use std::path::{Path, PathBuf};

/// How a file maps onto items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// The file itself is the value of exactly one item
    Single,
    /// A values document holding many sibling items
    Values,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Single => "single",
            FileType::Values => "values",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(FileType::Single),
            "values" => Some(FileType::Values),
            _ => None,
        }
    }
}

/// A parsed input file and the keys it currently contributes.
///
/// The items themselves live in the owning set's revision stacks; a source
/// file only remembers which keys they sit under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    source_folder: PathBuf,
    qualifiers: String,
    file_type: FileType,
    keys: Vec<String>,
}

impl SourceFile {
    pub fn new(
        path: impl Into<PathBuf>,
        source_folder: impl Into<PathBuf>,
        qualifiers: impl Into<String>,
        file_type: FileType,
    ) -> Self {
        Self {
            path: path.into(),
            source_folder: source_folder.into(),
            qualifiers: qualifiers.into(),
            file_type,
            keys: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source_folder(&self) -> &Path {
        &self.source_folder
    }

    pub fn qualifiers(&self) -> &str {
        &self.qualifiers
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn add_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    pub fn remove_key(&mut self, key: &str) {
        self.keys.retain(|k| k != key);
    }

    pub fn has_keys(&self) -> bool {
        !self.keys.is_empty()
    }
}
