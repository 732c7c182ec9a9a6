use std::process::ExitCode;

use anyhow::Result;
use resmerge::domain::services::{escape_resource_string, unescape_resource_string};

use super::text_or_stdin;

pub fn cmd_escape(text: Option<String>, xml: bool) -> Result<ExitCode> {
    let text = text_or_stdin(text)?;
    println!("{}", escape_resource_string(&text, xml));
    Ok(ExitCode::SUCCESS)
}

pub fn cmd_unescape(text: Option<String>, entities: bool, trim: bool) -> Result<ExitCode> {
    let text = text_or_stdin(text)?;
    println!("{}", unescape_resource_string(&text, entities, trim));
    Ok(ExitCode::SUCCESS)
}
