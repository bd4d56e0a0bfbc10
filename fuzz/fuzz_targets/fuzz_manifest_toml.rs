#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Manifest parsing reports errors, it never panics
        let _ = keel::infrastructure::TomlGraphLoader::new()
            .parse(std::path::Path::new("/fuzz"), content);
    }
});
