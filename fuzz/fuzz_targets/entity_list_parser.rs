#![no_main]

use libfuzzer_sys::fuzz_target;
use savings_predictor::entities::EntityDirectory;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Any input either loads or fails cleanly; the directory stays usable
        let mut directory = EntityDirectory::unfiltered();
        let loaded = directory.load_entities(input);
        assert!(directory.is_initialized());
        if loaded.is_err() {
            assert_eq!(directory.domain_count(), 0);
        }
        let _ = directory.resolve(input);
    }
});
