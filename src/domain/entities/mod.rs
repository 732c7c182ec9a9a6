//! Domain Entities
//!
//! - `DataItem` - one named unit of data, immutable once parsed
//! - `Revision` - an item plus its lifecycle flags
//! - `SourceFile` - a physical input and the keys it produced

mod data_item;
mod source_file;

pub use data_item::{DataItem, ItemStatus, Revision};
pub use source_file::{FileType, SourceFile};
