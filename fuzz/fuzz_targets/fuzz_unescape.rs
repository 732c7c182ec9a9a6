#![no_main]

use libfuzzer_sys::fuzz_target;
use resmerge::domain::services::{escape_resource_string, unescape_resource_string};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = unescape_resource_string(text, true, true);
        let _ = unescape_resource_string(text, false, false);
        let _ = escape_resource_string(text, true);
    }
});
