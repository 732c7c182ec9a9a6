//! Resource merging
//!
//! Typed resources from `res` folders: file-backed items in folders such as
//! `drawable-hdpi`, and value-backed items parsed out of `values*`
//! documents. `declare-styleable` declarations are combined across sets;
//! everything else is overridden by the highest-priority set.

mod kind;
mod parser;
mod repository;
mod styleable;
mod value;
mod writer;

pub use kind::{resource_key, typed_folder, ResourceKind};
pub use parser::{parse_values, parse_values_file};
pub use repository::ResourceRepository;
pub use styleable::{is_attr_definition, merge_styleables};
pub use value::ResourceValue;
pub use writer::{render_values, MergedResourceWriter};

use crate::merge::{DataMerger, DataSet};

pub type ResourceSet = DataSet<ResourceKind>;
pub type ResourceMerger = DataMerger<ResourceKind>;
