//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, MergeResult};

use super::loader::{self, ConfigWarning};

/// Which specialization a build merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeKind {
    #[default]
    Resources,
    Assets,
}

impl MergeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeKind::Resources => "resources",
            MergeKind::Assets => "assets",
        }
    }
}

impl std::fmt::Display for MergeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One layer of the overlay stack, lowest priority first in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetConfig {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<PathBuf>,
}

impl SetConfig {
    pub fn new<I, P>(name: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            name: name.into(),
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }
}

/// `[merge]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub validate_names: bool,
    /// Worker threads for set loading; 0 means available parallelism.
    pub workers: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            validate_names: true,
            workers: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub kind: MergeKind,
    pub output: PathBuf,
    pub blob_dir: PathBuf,
    /// Root written as `$TOP$` in the blob; defaults to the config directory.
    pub project_root: Option<PathBuf>,
    pub sets: Vec<SetConfig>,
    pub merge: MergeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kind: MergeKind::default(),
            output: PathBuf::from("build/merged"),
            blob_dir: PathBuf::from("build/blob"),
            project_root: None,
            sets: Vec::new(),
            merge: MergeConfig::default(),
        }
    }
}

impl Config {
    /// Load a config file, dropping warnings.
    pub fn load(path: &Path) -> MergeResult<Self> {
        loader::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Load a config file and collect unknown-key warnings.
    pub fn load_with_warnings(path: &Path) -> MergeResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Make every relative path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.output);
        resolve(&mut self.blob_dir);
        resolve(self.project_root.get_or_insert_with(|| base.to_path_buf()));
        for set in &mut self.sets {
            set.sources.iter_mut().for_each(resolve);
        }
    }

    /// Structural checks that serde cannot express.
    pub fn validate(&self, file: &Path) -> MergeResult<()> {
        let invalid = |message: String| MergeError::Config {
            file: file.to_path_buf(),
            message,
        };
        if self.sets.is_empty() {
            return Err(invalid("at least one [[sets]] entry is required".to_string()));
        }
        for (index, set) in self.sets.iter().enumerate() {
            if set.name.trim().is_empty() {
                return Err(invalid(format!("set #{} has an empty name", index + 1)));
            }
            if self.sets[..index].iter().any(|other| other.name == set.name) {
                return Err(invalid(format!("set name '{}' is used twice", set.name)));
            }
        }
        Ok(())
    }
}
