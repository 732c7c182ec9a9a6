//! Resource name validation
//!
//! File-backed names become identifiers and file names, so they are limited
//! to `[a-z0-9_]` plus an extension accepted by their folder. Value-backed
//! names are identifiers with dots allowed for style inheritance.
//!
//! Each validator also has a partial mode for live name entry: it only
//! rejects input that no amount of appended text could turn valid.

use std::path::Path;

use crate::domain::value_objects::ResourceFolderType;
use crate::error::{MergeError, MergeResult};

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "true", "try", "void", "volatile", "while",
];

const MISSING_NAME: &str = "Resource must have a name";
const MUST_START_WITH_LETTER: &str = "The resource name must start with a letter";

pub fn is_java_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}

fn keyword_error(name: &str) -> String {
    format!("'{name}' is not a valid resource name: Reserved Java keyword")
}

fn invalid_file_char(c: char) -> String {
    format!(
        "'{c}' is not a valid file-based resource name character: \
         File-based resource names must contain only lowercase a-z, 0-9, or underscore"
    )
}

fn extension_error(allowed: &[&str]) -> String {
    match allowed {
        [only] => format!("The file name must end with {only}"),
        [init @ .., last] => format!("The file name must end with {} or {last}", init.join(", ")),
        [] => MISSING_NAME.to_string(),
    }
}

/// Longest allowed extension that `file_name` ends with.
fn matching_extension<'a>(file_name: &str, allowed: &[&'a str]) -> Option<&'a str> {
    allowed
        .iter()
        .copied()
        .filter(|ext| file_name.len() > ext.len() && file_name.ends_with(ext))
        .max_by_key(|ext| ext.len())
}

/// Checks the bare name of a file-backed resource (no extension).
fn file_name_body_error(name: &str, partial: bool) -> Option<String> {
    let Some(first) = name.chars().next() else {
        return (!partial).then(|| MISSING_NAME.to_string());
    };
    if !first.is_alphabetic() {
        return Some(MUST_START_WITH_LETTER.to_string());
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
    {
        return Some(invalid_file_char(bad));
    }
    if !partial && is_java_keyword(name) {
        return Some(keyword_error(name));
    }
    None
}

/// Validator for file-backed resources (`drawable/icon.png`).
pub struct FileResourceNameValidator;

impl FileResourceNameValidator {
    /// Error message for `file_name` in `folder_type`, or `None` if valid.
    pub fn error_text(file_name: &str, folder_type: ResourceFolderType) -> Option<String> {
        if file_name.is_empty() {
            return Some(MISSING_NAME.to_string());
        }
        let body = match folder_type.allowed_extensions() {
            Some(allowed) => match matching_extension(file_name, allowed) {
                Some(ext) => &file_name[..file_name.len() - ext.len()],
                None => return Some(extension_error(allowed)),
            },
            None => file_name.split('.').next().unwrap_or(file_name),
        };
        file_name_body_error(body, false)
    }

    pub fn validate(file: &Path, folder_type: ResourceFolderType) -> MergeResult<()> {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match Self::error_text(&file_name, folder_type) {
            Some(message) => Err(MergeError::InvalidName {
                file: file.to_path_buf(),
                message,
            }),
            None => Ok(()),
        }
    }

    /// Partial validation of a file name being typed.
    pub fn validate_partial(input: &str, folder_type: ResourceFolderType) -> Option<String> {
        let (body, extension) = match input.find('.') {
            Some(dot) => (&input[..dot], Some(&input[dot..])),
            None => (input, None),
        };
        if body.is_empty() && extension.is_some() {
            return Some(MISSING_NAME.to_string());
        }
        if let Some(message) = file_name_body_error(body, true) {
            return Some(message);
        }
        let (Some(extension), Some(allowed)) = (extension, folder_type.allowed_extensions()) else {
            return None;
        };
        let extendable = allowed.iter().any(|ext| ext.starts_with(extension));
        (!extendable).then(|| extension_error(allowed))
    }
}

/// Validator for value-backed resources (`<string name="...">`).
///
/// The same rules apply to every value category; `:` is reserved for
/// namespace prefixes.
pub struct ValueResourceNameValidator;

impl ValueResourceNameValidator {
    /// Error message for `name`, or `None` if valid.
    pub fn error_text(name: &str) -> Option<String> {
        Self::check(name, false)
    }

    pub fn validate(name: &str, file: &Path) -> MergeResult<()> {
        match Self::error_text(name) {
            Some(message) => Err(MergeError::InvalidName {
                file: file.to_path_buf(),
                message,
            }),
            None => Ok(()),
        }
    }

    /// Partial validation of a value name being typed.
    pub fn validate_partial(input: &str) -> Option<String> {
        Self::check(input, true)
    }

    fn check(name: &str, partial: bool) -> Option<String> {
        let Some(first) = name.chars().next() else {
            return (!partial).then(|| MISSING_NAME.to_string());
        };
        if !(first.is_alphabetic() || first == '_') {
            return Some(MUST_START_WITH_LETTER.to_string());
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_alphanumeric() || matches!(c, '_' | '$' | '.')))
        {
            return Some(format!("'{bad}' is not a valid resource name character"));
        }
        if partial {
            return None;
        }
        if name.ends_with('.') {
            return Some("The resource name must not end with a '.'".to_string());
        }
        if let Some(keyword) = name.split('.').find(|segment| is_java_keyword(segment)) {
            return Some(keyword_error(keyword));
        }
        None
    }
}
