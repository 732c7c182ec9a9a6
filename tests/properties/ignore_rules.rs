//! Property tests for the built-in ignore rules.

use std::path::PathBuf;

use proptest::prelude::*;

use resmerge::domain::value_objects::IgnoreRules;

fn plain_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,10}(\\.[a-z]{1,4})?")
        .unwrap()
        .prop_filter("reserved names", |name| {
            !matches!(name.as_str(), "cvs" | "sccs" | "thumbs.db" | "picasa.ini")
                && !name.ends_with(".scc")
        })
}

fn plain_path() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(plain_name(), 1..=4)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Paths of ordinary names are never ignored.
    #[test]
    fn property_plain_paths_are_kept(parts in plain_path()) {
        let path: PathBuf = parts.iter().collect();
        prop_assert!(!IgnoreRules::builtin().is_ignored(&path));
    }

    /// PROPERTY: A hidden component anywhere ignores the whole path.
    #[test]
    fn property_hidden_component_ignores_path(
        parts in plain_path(),
        hidden in "\\.[a-z]{1,8}",
        at in 0usize..4,
    ) {
        prop_assume!(hidden != ".well-known");
        let mut parts = parts;
        let at = at.min(parts.len());
        parts.insert(at, hidden);
        let path: PathBuf = parts.iter().collect();
        prop_assert!(IgnoreRules::builtin().is_ignored(&path));
    }

    /// PROPERTY: Backup files are ignored regardless of folder.
    #[test]
    fn property_backup_files_are_ignored(parts in plain_path()) {
        let mut path: PathBuf = parts.iter().collect();
        let backup = format!(
            "{}~",
            path.file_name().unwrap().to_string_lossy()
        );
        path.set_file_name(backup);
        prop_assert!(IgnoreRules::builtin().is_ignored(&path));
    }

    /// PROPERTY: The root's own components are not inspected.
    #[test]
    fn property_hidden_root_is_transparent(parts in plain_path()) {
        let root = PathBuf::from("/work/.hidden/res");
        let file = parts.iter().fold(root.clone(), |path, part| path.join(part));
        prop_assert!(!IgnoreRules::builtin().is_ignored_under(&root, &file));
    }
}
