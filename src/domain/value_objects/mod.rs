//! Domain Value Objects
//!
//! Immutable value types shared by the merge engine and its specializations.

mod file_status;
mod folder_config;
mod ignore_rules;
mod resource_type;

pub use file_status::FileStatus;
pub use folder_config::{
    Density, FolderConfiguration, LayoutDirection, Locale, NightMode, Orientation, ScreenSize,
    UiMode,
};
pub use ignore_rules::{IgnoreRules, ALLOWED_HIDDEN_NAMES};
pub use resource_type::{ResourceFolderType, ResourceType};
