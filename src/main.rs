//! resmerge CLI - incremental, layered resource and asset merging
//!
//! Usage: resmerge <COMMAND>
//!
//! Commands:
//!   merge          Merge the declared sets into the output folder
//!   check-blob     Report whether the merge blob is reusable
//!   validate-name  Check a resource name
//!   escape         Escape string resource text
//!   unescape       Unescape string resource text
//!   watch          Merge continuously as sources change

mod commands;

use std::process::ExitCode;

use clap::Parser;
use resmerge::presentation::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match commands::dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `RESMERGE_LOG`, then `RUST_LOG`, then a level raised by `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = ["RESMERGE_LOG", "RUST_LOG"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .find_map(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
