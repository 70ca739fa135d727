//! Fuzz target for NGFF metadata JSON parsing.
//!
//! Feeds arbitrary bytes to the version-tagged document parser and runs the
//! full validator on anything that parses, checking for panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ngffmeta::model::io_json::from_json_slice;
use ngffmeta::validation::{validate_metadata, ValidateOptions};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(metadata) = from_json_slice(data) {
        let _ = validate_metadata(&metadata, &ValidateOptions::default());
    }
});
