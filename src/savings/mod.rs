// Rolling bandwidth savings telemetry
//
// Positive per-navigation predictions are added to a cumulative counter and
// folded into a day-bucketed history of at most seven entries. Every update
// recomputes the trailing seven-day total and reports it as one of eight
// megabyte buckets.
//
// Days are sparse: a gap of several days adds a single new entry rather than
// back-filling empty days. The bucket stays 0 until seven entries exist.

mod aggregator;
mod buckets;
mod daily;
mod tracker;

pub use aggregator::RollingSavingsAggregator;
pub use buckets::{bucket_for_megabytes, bucket_for_total, BANDWIDTH_SAVINGS_BUCKETS, BUCKET_COUNT};
pub use daily::{load_daily_savings, serialize_daily_savings, DailySaving, MAX_DAILY_ENTRIES};
pub use tracker::BandwidthSavingsTracker;

/// Histogram receiving the rolling-total bucket
pub const SAVINGS_HISTOGRAM_NAME: &str = "Savings.BandwidthSavingsMB";
