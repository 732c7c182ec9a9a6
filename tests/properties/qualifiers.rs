//! Property tests for folder qualifier parsing and rendering.

use proptest::prelude::*;

use resmerge::domain::value_objects::FolderConfiguration;

fn optional(values: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::sample::select(values).prop_map(str::to_string))
}

fn optional_number(prefix: &'static str, suffix: &'static str) -> impl Strategy<Value = Option<String>> {
    proptest::option::of((1u32..2000).prop_map(move |n| format!("{prefix}{n}{suffix}")))
}

/// Canonical qualifier strings built facet by facet.
fn canonical_qualifiers() -> impl Strategy<Value = String> {
    (
        (
            optional(&["en", "fr", "de", "en-rUS", "fr-rCA", "b+kok+IN"]),
            optional(&["ldltr", "ldrtl"]),
            optional_number("sw", "dp"),
            optional_number("w", "dp"),
            optional_number("h", "dp"),
            optional(&["small", "normal", "large", "xlarge"]),
        ),
        (
            optional(&["port", "land", "square"]),
            optional(&["car", "desk", "television", "appliance", "watch"]),
            optional(&["night", "notnight"]),
            optional(&["ldpi", "mdpi", "tvdpi", "hdpi", "xhdpi", "xxhdpi", "xxxhdpi", "nodpi", "anydpi"]),
            proptest::option::of((1u32..40).prop_map(|v| format!("v{v}"))),
        ),
    )
        .prop_map(|((a, b, c, d, e, f), (g, h, i, j, k))| {
            [a, b, c, d, e, f, g, h, i, j, k]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join("-")
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing arbitrary qualifier text never panics.
    #[test]
    fn property_parse_never_panics(s in "[a-zA-Z0-9+-]{0,40}") {
        let _ = FolderConfiguration::from_qualifier_str(&s);
    }

    /// PROPERTY: Canonical qualifier strings render back unchanged.
    #[test]
    fn property_canonical_round_trip(qualifiers in canonical_qualifiers()) {
        let config = FolderConfiguration::from_qualifier_str(&qualifiers);
        prop_assert!(config.is_some(), "rejected {:?}", qualifiers);
        prop_assert_eq!(config.unwrap().qualifier_string(), qualifiers);
    }

    /// PROPERTY: Rendering is a fixed point of parsing.
    #[test]
    fn property_render_is_stable(s in "[a-z0-9+-]{0,24}") {
        if let Some(config) = FolderConfiguration::from_qualifier_str(&s) {
            let rendered = config.qualifier_string();
            prop_assert_eq!(FolderConfiguration::from_qualifier_str(&rendered), Some(config));
        }
    }

    /// PROPERTY: Swapping two facets out of canonical order is rejected.
    #[test]
    fn property_out_of_order_is_rejected(
        orientation in proptest::sample::select(&["port", "land"][..]),
        density in proptest::sample::select(&["mdpi", "hdpi", "xhdpi"][..]),
    ) {
        let swapped = format!("{density}-{orientation}");
        prop_assert_eq!(FolderConfiguration::from_qualifier_str(&swapped), None);
    }
}
