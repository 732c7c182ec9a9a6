//! Property tests for string resource escaping.

use proptest::prelude::*;

use resmerge::domain::services::{escape_resource_string, unescape_resource_string};

fn authored_text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-zA-Z0-9 '\"\\\\@?<&\n\t.,%]{1,48}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Unescaping arbitrary text never panics.
    #[test]
    fn property_unescape_never_panics(s in "(?s).{0,128}") {
        let _ = unescape_resource_string(&s, true, true);
        let _ = unescape_resource_string(&s, false, false);
    }

    /// PROPERTY: Escaped text reads back as the original.
    #[test]
    fn property_escape_round_trips(text in authored_text()) {
        let escaped = escape_resource_string(&text, true);
        prop_assert_eq!(unescape_resource_string(&escaped, true, true), text);
    }

    /// PROPERTY: Without XML escaping, the round trip needs no entity decoding.
    #[test]
    fn property_escape_without_xml_round_trips(text in authored_text()) {
        let escaped = escape_resource_string(&text, false);
        prop_assert_eq!(unescape_resource_string(&escaped, false, true), text);
    }

    /// PROPERTY: Untrimmed unescaping of text without escapes is the identity.
    #[test]
    fn property_plain_text_is_unchanged(text in "[a-zA-Z0-9 .,]{0,48}") {
        prop_assert_eq!(unescape_resource_string(&text, false, false), text);
    }
}
