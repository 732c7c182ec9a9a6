//! Asset merging
//!
//! Opaque files keyed by their path relative to the source folder. The
//! highest-priority set that has a path wins; nothing is combined.

mod kind;
mod writer;

pub use kind::{relative_key, AssetKind};
pub use writer::{MergedAssetWriter, WriteStats};

use crate::merge::{DataMerger, DataSet};

pub type AssetSet = DataSet<AssetKind>;
pub type AssetMerger = DataMerger<AssetKind>;
