//! Domain Layer
//!
//! Pure merge vocabulary with no filesystem access:
//! - `entities` - items, revisions, source files
//! - `value_objects` - resource types, qualifiers, ignore rules
//! - `services` - name validation and text escaping
//! - `ports` - the traits the merge engine is generic over

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
