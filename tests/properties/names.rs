//! Property tests for full and partial resource name validation.

use proptest::prelude::*;

use resmerge::domain::services::{FileResourceNameValidator, ValueResourceNameValidator};
use resmerge::domain::value_objects::ResourceFolderType;

fn value_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-zA-Z_][a-zA-Z0-9_$.]{0,20}")
        .unwrap()
        .prop_filter("must be a complete name", |name| {
            ValueResourceNameValidator::error_text(name).is_none()
        })
}

fn drawable_file_name() -> impl Strategy<Value = String> {
    (
        proptest::string::string_regex("[a-z][a-z0-9_]{0,15}").unwrap(),
        prop_oneof![
            Just(".png"),
            Just(".9.png"),
            Just(".xml"),
            Just(".webp"),
            Just(".jpeg"),
        ],
    )
        .prop_map(|(body, ext)| format!("{body}{ext}"))
        .prop_filter("must be a complete name", |name| {
            FileResourceNameValidator::error_text(name, ResourceFolderType::Drawable).is_none()
        })
}

fn prefixes(name: &str) -> impl Iterator<Item = &str> {
    (0..=name.len())
        .filter(|&end| name.is_char_boundary(end))
        .map(move |end| &name[..end])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every prefix of a valid value name is a valid partial name.
    #[test]
    fn property_value_name_prefixes_are_partial_valid(name in value_name()) {
        for prefix in prefixes(&name) {
            prop_assert_eq!(ValueResourceNameValidator::validate_partial(prefix), None, "prefix {:?}", prefix);
        }
    }

    /// PROPERTY: Every prefix of a valid drawable file name is a valid partial name.
    #[test]
    fn property_file_name_prefixes_are_partial_valid(name in drawable_file_name()) {
        for prefix in prefixes(&name) {
            prop_assert_eq!(
                FileResourceNameValidator::validate_partial(prefix, ResourceFolderType::Drawable),
                None,
                "prefix {:?}",
                prefix
            );
        }
    }

    /// PROPERTY: A character that is never allowed fails partial validation.
    #[test]
    fn property_bad_character_fails_partial(
        name in "[a-z][a-z0-9_]{0,8}",
        bad in prop_oneof![Just('-'), Just(' '), Just('/'), Just('#')],
    ) {
        let input = format!("{name}{bad}");
        prop_assert!(ValueResourceNameValidator::validate_partial(&input).is_some());
        prop_assert!(
            FileResourceNameValidator::validate_partial(&input, ResourceFolderType::Raw).is_some()
        );
    }

    /// PROPERTY: Full validation never accepts what partial validation rejects.
    #[test]
    fn property_full_implies_partial(name in "[a-zA-Z0-9_.$-]{0,12}") {
        if ValueResourceNameValidator::error_text(&name).is_none() {
            prop_assert!(ValueResourceNameValidator::validate_partial(&name).is_none());
        }
    }
}
