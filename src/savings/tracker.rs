use crate::clock::Clock;
use crate::histogram::HistogramSink;
use crate::prefs::{SharedPrefStore, BANDWIDTH_SAVED_BYTES};
use crate::savings::aggregator::RollingSavingsAggregator;
use std::rc::Rc;

/// Per-profile sink for predicted savings
///
/// Keeps the all-time byte counter and feeds the rolling aggregator. One
/// tracker is shared by every tab of a profile.
pub struct BandwidthSavingsTracker {
    prefs: SharedPrefStore,
    aggregator: RollingSavingsAggregator,
}

impl BandwidthSavingsTracker {
    pub fn new(
        prefs: SharedPrefStore,
        histograms: Rc<dyn HistogramSink>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let aggregator = RollingSavingsAggregator::new(Rc::clone(&prefs), histograms, clock);
        Self { prefs, aggregator }
    }

    /// Record one navigation's predicted saving; zero is ignored
    pub fn record_saving(&mut self, bytes: u64) {
        if bytes == 0 {
            return;
        }
        {
            let mut prefs = self.prefs.borrow_mut();
            let total = prefs.get_u64(BANDWIDTH_SAVED_BYTES).saturating_add(bytes);
            prefs.set_u64(BANDWIDTH_SAVED_BYTES, total);
        }
        self.aggregator.add_savings(bytes);
    }

    /// All-time predicted bytes saved
    pub fn total_saved_bytes(&self) -> u64 {
        self.prefs.borrow().get_u64(BANDWIDTH_SAVED_BYTES)
    }

    pub fn aggregator(&self) -> &RollingSavingsAggregator {
        &self.aggregator
    }
}

impl std::fmt::Debug for BandwidthSavingsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandwidthSavingsTracker")
            .field("total_saved_bytes", &self.total_saved_bytes())
            .field("aggregator", &self.aggregator)
            .finish_non_exhaustive()
    }
}
