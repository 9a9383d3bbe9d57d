//! Property-based tests for the savings pipeline
//!
//! Core properties tested:
//! 1. Entity resolution is deterministic and never panics
//! 2. Root-domain ambiguity removal keeps exact matches
//! 3. Feature-map tolerance of unknown and missing keys
//! 4. Bucket classification is monotonic and bounded
//! 5. The daily history never exceeds seven entries and stays ordered

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use savings_predictor::clock::{Clock, ManualClock};
use savings_predictor::entities::{
    domain_from_origin_or_url, root_domain, EntityDirectory, EntitySource,
};
use savings_predictor::features::{FeatureMap, FEATURE_NAMES};
use savings_predictor::histogram::RecordingHistogramSink;
use savings_predictor::predictor::predict_map;
use savings_predictor::prefs::MemoryPrefStore;
use savings_predictor::savings::{
    bucket_for_megabytes, bucket_for_total, RollingSavingsAggregator, BUCKET_COUNT,
    MAX_DAILY_ENTRIES,
};
use std::rc::Rc;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_resolve_deterministic(input in "\\PC{0,64}") {
        let directory = EntityDirectory::from_source(&EntitySource::Packaged);
        let first = directory.resolve(&input).map(str::to_string);
        let second = directory.resolve(&input).map(str::to_string);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_domain_extraction_normalized(
        scheme in prop::sample::select(vec!["http", "https", "wss"]),
        host in "[a-zA-Z0-9]{1,10}(\\.[a-zA-Z0-9]{1,10}){1,3}",
        port in prop::option::of(1u16..=65535),
        path in "(/[a-z0-9]{0,8}){0,3}",
    ) {
        let port = port.map(|p| format!(":{p}")).unwrap_or_default();
        let url = format!("{scheme}://{host}{port}{path}?q=1#frag");
        prop_assert_eq!(domain_from_origin_or_url(&url), Some(host.to_ascii_lowercase()));
    }

    #[test]
    fn prop_root_domain_is_suffix(labels in prop::collection::vec("[a-z0-9]{1,8}", 1..6)) {
        let domain = labels.join(".");
        let root = root_domain(&domain);
        prop_assert!(domain.ends_with(root));
        prop_assert!(root.split('.').count() <= 3);
        prop_assert_eq!(root_domain(root), root);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_ambiguous_root_removed(
        root in "[a-z]{3,10}\\.(com|net|org)",
        left in "[a-z]{1,6}",
        right in "[a-z]{1,6}",
    ) {
        prop_assume!(left != right && left != "other" && right != "other");
        let first = format!("{left}.{root}");
        let second = format!("{right}.{root}");
        let json = format!(
            r#"[{{"name": "A", "domains": ["{first}"]}}, {{"name": "B", "domains": ["{second}"]}}]"#
        );

        let mut directory = EntityDirectory::unfiltered();
        directory.load_entities(&json).unwrap();

        prop_assert_eq!(directory.root_entity(&root), None);
        prop_assert_eq!(directory.resolve(&first), Some("A"));
        prop_assert_eq!(directory.resolve(&second), Some("B"));
        prop_assert_eq!(directory.resolve(&format!("other.{root}")), None);
    }

    #[test]
    fn prop_unknown_feature_ignored(
        values in prop::collection::vec(0.0f64..1e6, FEATURE_NAMES.len()),
        unknown in "[A-Z][a-zA-Z]{0,12}",
        junk in -1e9f64..1e9,
    ) {
        let known: FeatureMap = FEATURE_NAMES
            .iter()
            .zip(&values)
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        let mut with_unknown = known.clone();
        with_unknown.insert(unknown, junk);

        prop_assert_eq!(predict_map(&known), predict_map(&with_unknown));
    }

    #[test]
    fn prop_missing_feature_is_zero(
        index in 0..FEATURE_NAMES.len(),
        value in 0.0f64..1e6,
    ) {
        let mut partial = FeatureMap::new();
        partial.insert(FEATURE_NAMES[(index + 1) % FEATURE_NAMES.len()].to_string(), value);
        let mut explicit = partial.clone();
        explicit.insert(FEATURE_NAMES[index].to_string(), 0.0);

        prop_assert_eq!(predict_map(&partial), predict_map(&explicit));
    }

    #[test]
    fn prop_bucket_monotonic(a in 0u64..5000, b in 0u64..5000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(bucket_for_megabytes(low) <= bucket_for_megabytes(high));
        prop_assert!(bucket_for_megabytes(high) < BUCKET_COUNT);
    }

    #[test]
    fn prop_bucket_for_total_never_panics(total in any::<u64>()) {
        prop_assert!(bucket_for_total(total) < BUCKET_COUNT);
    }

    #[test]
    fn prop_history_bounded_and_ordered(
        steps in prop::collection::vec((0i64..72, 0u64..10_000_000), 1..40),
    ) {
        let start = DateTime::from_timestamp(1_772_000_000, 0).unwrap();
        let clock = ManualClock::new(start);
        let mut aggregator = RollingSavingsAggregator::new(
            MemoryPrefStore::new().into_shared(),
            Rc::new(RecordingHistogramSink::new()),
            Rc::new(clock.clone()),
        );

        let mut added = 0u64;
        for (hours, delta) in steps {
            clock.advance(Duration::hours(hours));
            aggregator.add_savings(delta);
            added += delta;

            let daily = aggregator.daily_savings();
            prop_assert!(!daily.is_empty());
            prop_assert!(daily.len() <= MAX_DAILY_ENTRIES);
            prop_assert!(daily.iter().zip(daily.iter().skip(1)).all(|(newer, older)| newer.day > older.day));
            prop_assert!(aggregator.get_savings_total() <= added);
        }
        let last: DateTime<Utc> = aggregator.daily_savings()[0].day;
        prop_assert!(last <= clock.now());
    }
}
