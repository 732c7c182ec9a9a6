//! Application Layer
//!
//! Orchestration around the merge engine. This layer:
//! - Depends on the merge engine and its specializations
//! - Does NOT contain merge rules (those live in `merge`)
//! - Owns process-level resources: the worker pool and the blob lock
//!
//! ## Use Cases
//!
//! - `BuildDriver` - full or incremental build from declared sets
//! - `WorkerPool` - explicitly owned pool used for parallel set loading

pub mod build;
pub mod worker_pool;

pub use build::{BlobState, BuildDriver, BuildMode, BuildOptions, BuildReport, FileChange};
pub use worker_pool::WorkerPool;
