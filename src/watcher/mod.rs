//! File watcher for continuous merging
//!
//! Implements the `watch` command with:
//! - Debouncing (100ms) and per-path coalescing of events
//! - Incremental builds through the `BuildDriver`
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI

mod event;
mod session;

pub use event::{status_for, WatchEvent, WatcherState, DEBOUNCE_MS};
pub use session::watch;
