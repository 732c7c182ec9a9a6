//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Output formatting (text/JSON)

pub mod cli;
pub mod output;

pub use cli::{BuildArgs, Cli, Commands, KindArg};
pub use output::{
    create_renderer, render_blob_state, render_watch_event, BuildReportRenderer, OutputFormat,
};
