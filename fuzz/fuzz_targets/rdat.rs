#![no_main]

use libfuzzer_sys::fuzz_target;
use rdatscope::{Diagnostics, RuntimeData};

fuzz_target!(|data: &[u8]| {
    let diagnostics = Diagnostics::new();
    if let Ok(rdat) = RuntimeData::decode(data, &diagnostics) {
        // whatever decodes is round-tripped once more
        let _ = rdat.encode().map(|chunk| RuntimeData::decode(&chunk, &diagnostics));
    }
});
