//! Feature vocabulary and the page-load events that feed it
//!
//! The predictor and the accumulator agree on [`FEATURE_NAMES`], a closed and
//! ordered list. The accumulator populates a subset of it as a [`FeatureMap`];
//! the predictor reads absent names as 0 and ignores names it does not know.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Named feature values for one navigation
pub type FeatureMap = HashMap<String, f64>;

/// Number of features in the model
pub const FEATURE_COUNT: usize = 40;

/// Feature values in model order
pub type FeatureVector = [f64; FEATURE_COUNT];

pub const ADBLOCK_REQUESTS: &str = "adblockRequests";
pub const FIRST_CONTENTFUL_PAINT: &str = "metrics.firstContentfulPaint";
pub const FIRST_MEANINGFUL_PAINT: &str = "metrics.firstMeaningfulPaint";
pub const LOAD_EVENT_START: &str = "metrics.observedLoad";
pub const THIRD_PARTY_REQUESTS: &str = "resources.third-party.requestCount";
pub const THIRD_PARTY_SIZE: &str = "resources.third-party.size";
pub const TOTAL_REQUESTS: &str = "resources.total.requestCount";
pub const TOTAL_SIZE: &str = "resources.total.size";

/// Canonical feature order shared with the coefficient table
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    ADBLOCK_REQUESTS,
    FIRST_CONTENTFUL_PAINT,
    FIRST_MEANINGFUL_PAINT,
    LOAD_EVENT_START,
    "resources.document.requestCount",
    "resources.document.size",
    "resources.font.requestCount",
    "resources.font.size",
    "resources.image.requestCount",
    "resources.image.size",
    "resources.media.requestCount",
    "resources.media.size",
    "resources.script.requestCount",
    "resources.script.size",
    "resources.stylesheet.requestCount",
    "resources.stylesheet.size",
    "resources.xhr.requestCount",
    "resources.xhr.size",
    "resources.other.requestCount",
    "resources.other.size",
    THIRD_PARTY_REQUESTS,
    THIRD_PARTY_SIZE,
    TOTAL_REQUESTS,
    TOTAL_SIZE,
    "thirdParties.Google Analytics.blocked",
    "thirdParties.Google/Doubleclick Ads.blocked",
    "thirdParties.Google Tag Manager.blocked",
    "thirdParties.Facebook.blocked",
    "thirdParties.Twitter.blocked",
    "thirdParties.Amazon Ads.blocked",
    "thirdParties.Criteo.blocked",
    "thirdParties.AppNexus.blocked",
    "thirdParties.Rubicon Project.blocked",
    "thirdParties.PubMatic.blocked",
    "thirdParties.Taboola.blocked",
    "thirdParties.Outbrain.blocked",
    "thirdParties.Hotjar.blocked",
    "thirdParties.Yandex Metrica.blocked",
    "thirdParties.Scorecard Research.blocked",
    "thirdParties.Quantcast.blocked",
];

static FEATURE_INDEX: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    FEATURE_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, i))
        .collect()
});

/// Position of `name` in the model order
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_INDEX.get(name).copied()
}

/// Feature recording that resources of `entity` were blocked
pub fn entity_blocked_feature(entity: &str) -> String {
    format!("thirdParties.{entity}.blocked")
}

/// Loader-level resource type of a completed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    MainFrame,
    SubFrame,
    Stylesheet,
    Script,
    Image,
    Favicon,
    Font,
    Media,
    Xhr,
    Fetch,
    Ping,
    Worker,
    Prefetch,
    #[serde(other)]
    Other,
}

impl ResourceType {
    /// Feature bucket the resource is counted under
    pub fn bucket(self) -> ResourceBucket {
        match self {
            ResourceType::MainFrame | ResourceType::SubFrame => ResourceBucket::Document,
            ResourceType::Stylesheet => ResourceBucket::Stylesheet,
            ResourceType::Script => ResourceBucket::Script,
            ResourceType::Image | ResourceType::Favicon => ResourceBucket::Image,
            ResourceType::Font => ResourceBucket::Font,
            ResourceType::Media => ResourceBucket::Media,
            ResourceType::Xhr | ResourceType::Fetch => ResourceBucket::Xhr,
            ResourceType::Ping
            | ResourceType::Worker
            | ResourceType::Prefetch
            | ResourceType::Other => ResourceBucket::Other,
        }
    }
}

/// Resource type buckets with their own count and size features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceBucket {
    Document,
    Font,
    Image,
    Media,
    Script,
    Stylesheet,
    Xhr,
    Other,
}

impl ResourceBucket {
    pub fn request_count_feature(self) -> &'static str {
        match self {
            ResourceBucket::Document => "resources.document.requestCount",
            ResourceBucket::Font => "resources.font.requestCount",
            ResourceBucket::Image => "resources.image.requestCount",
            ResourceBucket::Media => "resources.media.requestCount",
            ResourceBucket::Script => "resources.script.requestCount",
            ResourceBucket::Stylesheet => "resources.stylesheet.requestCount",
            ResourceBucket::Xhr => "resources.xhr.requestCount",
            ResourceBucket::Other => "resources.other.requestCount",
        }
    }

    pub fn size_feature(self) -> &'static str {
        match self {
            ResourceBucket::Document => "resources.document.size",
            ResourceBucket::Font => "resources.font.size",
            ResourceBucket::Image => "resources.image.size",
            ResourceBucket::Media => "resources.media.size",
            ResourceBucket::Script => "resources.script.size",
            ResourceBucket::Stylesheet => "resources.stylesheet.size",
            ResourceBucket::Xhr => "resources.xhr.size",
            ResourceBucket::Other => "resources.other.size",
        }
    }
}

/// Completion record for one subresource or frame load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLoadInfo {
    pub url: String,
    pub resource_type: ResourceType,
    /// Bytes received over the network, headers included
    #[serde(default)]
    pub total_received_bytes: u64,
    /// Body bytes before content decoding
    #[serde(default)]
    pub raw_body_bytes: u64,
    #[serde(default)]
    pub was_cached: bool,
}

impl ResourceLoadInfo {
    pub fn new(url: impl Into<String>, resource_type: ResourceType, bytes: u64) -> Self {
        Self {
            url: url.into(),
            resource_type,
            total_received_bytes: bytes,
            raw_body_bytes: bytes,
            was_cached: false,
        }
    }

    /// Bytes counted toward size features; cached loads transfer nothing
    pub fn transferred_bytes(&self) -> u64 {
        if self.was_cached {
            0
        } else {
            self.total_received_bytes
        }
    }
}

/// Page timing snapshot, milliseconds from navigation start
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLoadTiming {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_contentful_paint: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_meaningful_paint: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_event_start: Option<f64>,
}
