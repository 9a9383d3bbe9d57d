use crate::clock::Clock;
use crate::histogram::HistogramSink;
use crate::prefs::{SharedPrefStore, BANDWIDTH_SAVED_DAILY_BYTES};
use crate::savings::buckets::{bucket_for_total, BUCKET_COUNT};
use crate::savings::daily::{
    load_daily_savings, serialize_daily_savings, DailySaving, MAX_DAILY_ENTRIES,
};
use crate::savings::SAVINGS_HISTOGRAM_NAME;
use crate::sequence::SequenceChecker;
use chrono::Duration;
use std::collections::VecDeque;
use std::rc::Rc;

/// Seven-day savings history backed by a preference
///
/// # Example
/// ```
/// use savings_predictor::clock::ManualClock;
/// use savings_predictor::histogram::RecordingHistogramSink;
/// use savings_predictor::prefs::MemoryPrefStore;
/// use savings_predictor::savings::RollingSavingsAggregator;
/// use std::rc::Rc;
///
/// let clock = ManualClock::new(chrono::Utc::now());
/// let mut aggregator = RollingSavingsAggregator::new(
///     MemoryPrefStore::new().into_shared(),
///     Rc::new(RecordingHistogramSink::new()),
///     Rc::new(clock),
/// );
/// aggregator.add_savings(1024);
/// aggregator.add_savings(2048);
/// assert_eq!(aggregator.daily_savings().len(), 1);
/// assert_eq!(aggregator.get_savings_total(), 3072);
/// ```
pub struct RollingSavingsAggregator {
    daily: VecDeque<DailySaving>,
    prefs: SharedPrefStore,
    histograms: Rc<dyn HistogramSink>,
    clock: Rc<dyn Clock>,
    sequence: SequenceChecker,
}

impl RollingSavingsAggregator {
    /// Aggregator seeded from the persisted history in `prefs`
    pub fn new(
        prefs: SharedPrefStore,
        histograms: Rc<dyn HistogramSink>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let daily = load_daily_savings(prefs.borrow().get(BANDWIDTH_SAVED_DAILY_BYTES).as_ref());
        tracing::debug!("Loaded {} daily savings entries", daily.len());
        Self {
            daily,
            prefs,
            histograms,
            clock,
            sequence: SequenceChecker::new(),
        }
    }

    /// Add `delta` bytes to today's entry, report the bucket and persist
    ///
    /// A day later than the newest entry, by any amount, starts a new entry;
    /// skipped days are not filled in. The oldest entry is dropped past seven.
    pub fn add_savings(&mut self, delta: u64) {
        self.sequence.check();
        let now_midnight = self.clock.today_midnight();

        match self.daily.front_mut() {
            Some(today) if today.day >= now_midnight => {
                today.saving = today.saving.saturating_add(delta);
            }
            _ => {
                self.daily.push_front(DailySaving::new(now_midnight, delta));
                if self.daily.len() > MAX_DAILY_ENTRIES {
                    self.daily.pop_back();
                }
            }
        }

        self.record_savings_total();
        self.save();
    }

    /// Sum of entries whose day falls within the last seven days
    pub fn get_savings_total(&self) -> u64 {
        let window_start = self.clock.now() - Duration::days(MAX_DAILY_ENTRIES as i64);
        self.daily
            .iter()
            .filter(|entry| entry.day > window_start)
            .fold(0u64, |total, entry| total.saturating_add(entry.saving))
    }

    /// Histogram bucket for the current history
    ///
    /// Always 0 until the history holds seven entries.
    pub fn current_bucket(&self) -> usize {
        if self.daily.len() == MAX_DAILY_ENTRIES {
            bucket_for_total(self.get_savings_total())
        } else {
            0
        }
    }

    /// History, newest first
    pub fn daily_savings(&self) -> &VecDeque<DailySaving> {
        &self.daily
    }

    fn record_savings_total(&self) {
        let bucket = self.current_bucket();
        tracing::debug!(
            "Savings total {} bytes over {} days, bucket {}",
            self.get_savings_total(),
            self.daily.len(),
            bucket
        );
        self.histograms
            .record_exact_linear(SAVINGS_HISTOGRAM_NAME, bucket, BUCKET_COUNT);
    }

    fn save(&self) {
        debug_assert!(!self.daily.is_empty());
        debug_assert!(self.daily.len() <= MAX_DAILY_ENTRIES);
        self.prefs.borrow_mut().set(
            BANDWIDTH_SAVED_DAILY_BYTES,
            serialize_daily_savings(&self.daily),
        );
    }
}

impl std::fmt::Debug for RollingSavingsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollingSavingsAggregator")
            .field("daily", &self.daily)
            .finish_non_exhaustive()
    }
}
