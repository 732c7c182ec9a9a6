//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Specializations and sinks provide concrete implementations.

pub mod data_kind;
pub mod merge_consumer;

pub use data_kind::{DataKind, ParsedFile, ParsedItem};
pub use merge_consumer::{MergeConsumer, MergeEntry};
