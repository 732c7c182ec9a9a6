//! Built-in ignore rules for source scanning
//!
//! Matches VCS metadata, editor backups and OS litter by path component
//! using gitignore semantics from the `ignore` crate. Decisions depend only
//! on the path: a path is ignored when any of its components is.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Component, Path};

/// Patterns applied to every path component, lowercased.
const BUILTIN_PATTERNS: &[&str] = &[
    ".*",
    "cvs",
    "sccs",
    "*.scc",
    "*~",
    "thumbs.db",
    "picasa.ini",
];

/// Hidden names that are still part of the inputs.
pub const ALLOWED_HIDDEN_NAMES: &[&str] = &[".well-known"];

/// Fixed ignore filter used by every set.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    matcher: Gitignore,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IgnoreRules {
    /// The built-in rule set.
    pub fn builtin() -> Self {
        let mut builder = GitignoreBuilder::new("");
        for pattern in BUILTIN_PATTERNS {
            builder
                .add_line(None, pattern)
                .expect("built-in ignore pattern should parse");
        }
        for name in ALLOWED_HIDDEN_NAMES {
            builder
                .add_line(None, &format!("!{name}"))
                .expect("built-in allow pattern should parse");
        }
        let matcher = builder
            .build()
            .expect("built-in ignore rules should always build");
        Self { matcher }
    }

    /// Whether a single file or directory name is ignored.
    pub fn is_ignored_name(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let lowered = name.to_lowercase();
        self.matcher.matched(Path::new(&lowered), false).is_ignore()
    }

    /// Whether `path` or any of its ancestors is ignored.
    ///
    /// `.` components are transparent; `..` is always ignored.
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.components().any(|component| match component {
            Component::ParentDir => true,
            Component::Normal(name) => self.is_ignored_name(&name.to_string_lossy()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => false,
        })
    }

    /// Whether `file`, relative to `root`, is ignored.
    ///
    /// Components of `root` itself are not inspected, so a source folder
    /// living under a hidden directory still works.
    pub fn is_ignored_under(&self, root: &Path, file: &Path) -> bool {
        match file.strip_prefix(root) {
            Ok(relative) => self.is_ignored(relative),
            Err(_) => self.is_ignored(file),
        }
    }
}
