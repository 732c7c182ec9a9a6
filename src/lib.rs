//! resmerge - incremental, layered resource and asset merge engine
//!
//! An ordered stack of named source sets (a main set plus overlays) is
//! merged into a single output tree. The merge state is persisted in a
//! blob so later builds only process what changed.
//!
//! - `merge` - the generic engine: sets, the merger, the blob codec
//! - `assets` - opaque files keyed by relative path
//! - `resources` - typed resources with values files and styleable unions
//! - `application` - the build driver and its worker pool
//! - `watcher` - continuous incremental builds from file-system events

pub mod application;
pub mod assets;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod merge;
pub mod presentation;
pub mod resources;
pub mod watcher;
pub mod xml;

// Re-exports for convenience
pub use application::{BuildDriver, BuildMode, BuildOptions, BuildReport, FileChange, WorkerPool};
pub use assets::{AssetKind, AssetMerger, AssetSet, MergedAssetWriter};
pub use config::{Config, MergeKind, SetConfig};
pub use domain::entities::{DataItem, ItemStatus, SourceFile};
pub use domain::ports::{DataKind, MergeConsumer, MergeEntry};
pub use domain::value_objects::{FileStatus, FolderConfiguration, ResourceType};
pub use error::{MergeError, MergeResult};
pub use merge::{DataMerger, DataSet, FileValidity, MergeReport};
pub use resources::{
    MergedResourceWriter, ResourceKind, ResourceMerger, ResourceRepository, ResourceSet,
};
pub use watcher::{watch, WatchEvent};
