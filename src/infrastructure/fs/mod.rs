//! File System Implementations
//!
//! Concrete output operations used by writers and the blob codec.

mod local;

pub use local::{hash_bytes, LocalFs};
