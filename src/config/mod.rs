//! Build configuration
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (`RESMERGE_OUTPUT`, `RESMERGE_BLOB_DIR`, `RESMERGE_WORKERS`)
//! 3. Project config (`resmerge.toml`)
//! 4. User config (`<config dir>/resmerge/config.toml`)
//! 5. Built-in defaults (lowest priority)

mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use loader::{
    load_or_default, load_with_warnings, user_config_path, with_env_overrides,
    with_overrides_from, ConfigWarning, PROJECT_CONFIG_FILE,
};
pub use types::{Config, MergeConfig, MergeKind, SetConfig};
