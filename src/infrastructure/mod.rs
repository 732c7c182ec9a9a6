//! Infrastructure Layer
//!
//! Concrete I/O used by the merge engine and its writers.
//!
//! ## Structure
//!
//! - `fs/` - atomic output writes, copies and deletes

pub mod fs;

pub use fs::LocalFs;
