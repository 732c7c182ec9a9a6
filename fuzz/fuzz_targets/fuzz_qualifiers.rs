#![no_main]

use libfuzzer_sys::fuzz_target;
use resmerge::domain::value_objects::FolderConfiguration;

fuzz_target!(|data: &[u8]| {
    if let Ok(qualifiers) = std::str::from_utf8(data) {
        if let Some(config) = FolderConfiguration::from_qualifier_str(qualifiers) {
            let rendered = config.qualifier_string();
            assert_eq!(FolderConfiguration::from_qualifier_str(&rendered), Some(config));
        }
    }
});
