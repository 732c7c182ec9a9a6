//! Domain Services
//!
//! Stateless rules shared by the merge specializations.

pub mod escaping;
mod name_validator;

pub use escaping::{escape_resource_string, is_escaped, unescape_resource_string};
pub use name_validator::{is_java_keyword, FileResourceNameValidator, ValueResourceNameValidator};
