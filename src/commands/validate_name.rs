use std::process::ExitCode;

use anyhow::{bail, Result};
use resmerge::domain::services::{FileResourceNameValidator, ValueResourceNameValidator};
use resmerge::domain::value_objects::{ResourceFolderType, ResourceType};
use resmerge::presentation::OutputFormat;

/// Folder types check file names; value types check value names.
pub fn cmd_validate_name(
    name: &str,
    resource_type: &str,
    partial: bool,
    format: OutputFormat,
) -> Result<ExitCode> {
    let error = match (
        ResourceFolderType::from_name(resource_type),
        ResourceType::from_name(resource_type),
    ) {
        (Some(folder), _) if partial => FileResourceNameValidator::validate_partial(name, folder),
        (Some(folder), _) => FileResourceNameValidator::error_text(name, folder),
        (None, Some(_)) if partial => ValueResourceNameValidator::validate_partial(name),
        (None, Some(_)) => ValueResourceNameValidator::error_text(name),
        (None, None) => bail!("unknown resource type '{resource_type}'"),
    };

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "command": "validate-name",
                "name": name,
                "type": resource_type,
                "partial": partial,
                "valid": error.is_none(),
                "message": error,
            })
        ),
        OutputFormat::Text => match &error {
            Some(message) => eprintln!("{name}: {message}"),
            None => println!("{name}: valid"),
        },
    }
    Ok(if error.is_none() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
