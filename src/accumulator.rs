//! Per-navigation feature accumulation
//!
//! One [`FeatureAccumulator`] lives per tab. It is reset when a main-frame
//! navigation commits and read by the predictor when the next navigation
//! starts or the tab goes away.

use crate::entities::{domain_from_origin_or_url, root_domain, EntityDirectory};
use crate::features::{
    entity_blocked_feature, feature_index, FeatureMap, PageLoadTiming, ResourceLoadInfo,
    ADBLOCK_REQUESTS, FIRST_CONTENTFUL_PAINT, FIRST_MEANINGFUL_PAINT, LOAD_EVENT_START,
    THIRD_PARTY_REQUESTS, THIRD_PARTY_SIZE, TOTAL_REQUESTS, TOTAL_SIZE,
};
use crate::predictor;
use crate::sequence::SequenceChecker;
use std::sync::Arc;

/// Accumulates resource, blocking and timing statistics for one navigation
#[derive(Debug)]
pub struct FeatureAccumulator {
    directory: Arc<EntityDirectory>,
    main_frame_url: Option<String>,
    feature_map: FeatureMap,
    sequence: SequenceChecker,
}

impl FeatureAccumulator {
    pub fn new(directory: Arc<EntityDirectory>) -> Self {
        Self {
            directory,
            main_frame_url: None,
            feature_map: FeatureMap::new(),
            sequence: SequenceChecker::new(),
        }
    }

    /// Start a fresh navigation at `main_frame_url`
    pub fn on_navigation_committed(&mut self, main_frame_url: &str) {
        self.reset();
        self.main_frame_url = Some(main_frame_url.to_string());
    }

    /// Replace the main-frame URL without clearing counters
    ///
    /// Used when the committed URL differs from the one seen at commit time
    /// (server redirects).
    pub fn update_main_frame_url(&mut self, main_frame_url: &str) {
        self.sequence.check();
        self.main_frame_url = Some(main_frame_url.to_string());
    }

    /// Count a completed resource load
    pub fn on_resource_load_complete(&mut self, info: &ResourceLoadInfo) {
        self.sequence.check();
        let bytes = info.transferred_bytes() as f64;
        let bucket = info.resource_type.bucket();

        self.add(TOTAL_REQUESTS, 1.0);
        self.add(TOTAL_SIZE, bytes);
        self.add(bucket.request_count_feature(), 1.0);
        self.add(bucket.size_feature(), bytes);

        if self.is_third_party(&info.url) {
            self.add(THIRD_PARTY_REQUESTS, 1.0);
            self.add(THIRD_PARTY_SIZE, bytes);
        }
    }

    /// Count a subresource blocked before it was requested
    pub fn on_subresource_blocked(&mut self, resource_url: &str) {
        self.sequence.check();
        self.add(ADBLOCK_REQUESTS, 1.0);

        if let Some(entity) = self.directory.resolve(resource_url) {
            let feature = entity_blocked_feature(entity);
            if feature_index(&feature).is_some() {
                *self.feature_map.entry(feature).or_insert(0.0) += 1.0;
            }
        }
    }

    /// Record timing milestones; later values overwrite earlier ones
    pub fn on_timing_updated(&mut self, timing: &PageLoadTiming) {
        self.sequence.check();
        let milestones = [
            (FIRST_CONTENTFUL_PAINT, timing.first_contentful_paint),
            (FIRST_MEANINGFUL_PAINT, timing.first_meaningful_paint),
            (LOAD_EVENT_START, timing.load_event_start),
        ];
        for (feature, value) in milestones {
            if let Some(ms) = value {
                self.feature_map.insert(feature.to_string(), ms);
            }
        }
    }

    /// Savings estimate for the navigation so far, in bytes
    ///
    /// Returns 0.0 when no main frame was captured or it is not an HTTP(S)
    /// page. Does not modify state.
    pub fn predict(&self) -> f64 {
        match &self.main_frame_url {
            Some(url) if is_http_or_https(url) => predictor::predict_map(&self.feature_map),
            _ => 0.0,
        }
    }

    /// Clear all counters and the main-frame URL
    pub fn reset(&mut self) {
        self.sequence.check();
        self.feature_map.clear();
        self.main_frame_url = None;
    }

    pub fn feature_map(&self) -> &FeatureMap {
        &self.feature_map
    }

    pub fn main_frame_url(&self) -> Option<&str> {
        self.main_frame_url.as_deref()
    }

    fn add(&mut self, feature: &str, amount: f64) {
        match self.feature_map.get_mut(feature) {
            Some(value) => *value += amount,
            None => {
                self.feature_map.insert(feature.to_string(), amount);
            }
        }
    }

    /// Whether `resource_url` belongs to a different owner than the page
    ///
    /// Resolved entities are compared when either side resolves; when neither
    /// does, the heuristic root domains are compared instead.
    fn is_third_party(&self, resource_url: &str) -> bool {
        let Some(main_frame_url) = self.main_frame_url.as_deref() else {
            return false;
        };

        match (
            self.directory.resolve(main_frame_url),
            self.directory.resolve(resource_url),
        ) {
            (Some(page), Some(resource)) => page != resource,
            (None, None) => match (
                domain_from_origin_or_url(main_frame_url),
                domain_from_origin_or_url(resource_url),
            ) {
                (Some(page), Some(resource)) => root_domain(&page) != root_domain(&resource),
                _ => false,
            },
            _ => true,
        }
    }
}

fn is_http_or_https(url: &str) -> bool {
    let lowered = url.trim_start().to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}
