#![no_main]

use libfuzzer_sys::fuzz_target;
use savings_predictor::entities::{domain_from_origin_or_url, root_domain};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    if let Some(domain) = domain_from_origin_or_url(&input) {
        let root = root_domain(&domain);
        assert!(domain.ends_with(root));
    }
});
