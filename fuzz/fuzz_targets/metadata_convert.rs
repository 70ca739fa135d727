//! Fuzz target for the version router.
//!
//! Any document that parses is converted to every version. Conversion may
//! fail but must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ngffmeta::model::io_json::from_json_slice;
use ngffmeta::NgffVersion;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(metadata) = from_json_slice(data) {
        for target in NgffVersion::ALL {
            let _ = metadata.clone().to_version(target);
        }
    }
});
