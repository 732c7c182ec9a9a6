//! Generic merge engine
//!
//! - `DataSet` - one layer: source folders scanned into key → revisions
//! - `DataMerger` - the ordered stack of sets and the merge drive
//! - `FileValidity` - routing of changed paths to their set
//! - `blob` - the `merger.xml` snapshot codec

mod blob;
mod data_set;
mod merger;
mod validity;

pub use blob::{blob_path, BLOB_FILE_NAME, BLOB_VERSION};
pub use data_set::DataSet;
pub use merger::{DataMerger, MergeReport};
pub use validity::FileValidity;
