//! Histogram emission
//!
//! Savings buckets are reported as exact linear samples. The production sink
//! forwards to the `metrics` facade, so whichever recorder the host installs
//! receives them; without a recorder the call is a no-op.

use std::cell::RefCell;
use std::rc::Rc;

/// Metrics-reporting collaborator
pub trait HistogramSink {
    /// Record `sample` in a linear histogram with buckets `0..exclusive_max`
    fn record_exact_linear(&self, name: &'static str, sample: usize, exclusive_max: usize);
}

/// Sink backed by the global `metrics` recorder
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsHistogramSink;

impl HistogramSink for MetricsHistogramSink {
    fn record_exact_linear(&self, name: &'static str, sample: usize, exclusive_max: usize) {
        let clamped = sample.min(exclusive_max.saturating_sub(1));
        metrics::histogram!(name).record(clamped as f64);
    }
}

/// Forwards every sample to each inner sink in order
#[derive(Default)]
pub struct TeeHistogramSink {
    sinks: Vec<Rc<dyn HistogramSink>>,
}

impl TeeHistogramSink {
    pub fn new(sinks: Vec<Rc<dyn HistogramSink>>) -> Self {
        Self { sinks }
    }
}

impl HistogramSink for TeeHistogramSink {
    fn record_exact_linear(&self, name: &'static str, sample: usize, exclusive_max: usize) {
        for sink in &self.sinks {
            sink.record_exact_linear(name, sample, exclusive_max);
        }
    }
}

impl std::fmt::Debug for TeeHistogramSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeeHistogramSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

/// One recorded sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramSample {
    pub name: &'static str,
    pub sample: usize,
}

/// Sink that keeps samples in memory
#[derive(Debug, Default)]
pub struct RecordingHistogramSink {
    samples: RefCell<Vec<HistogramSample>>,
}

impl RecordingHistogramSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> Vec<HistogramSample> {
        self.samples.borrow().clone()
    }

    pub fn last_sample(&self, name: &str) -> Option<usize> {
        self.samples
            .borrow()
            .iter()
            .rev()
            .find(|s| s.name == name)
            .map(|s| s.sample)
    }
}

impl HistogramSink for RecordingHistogramSink {
    fn record_exact_linear(&self, name: &'static str, sample: usize, exclusive_max: usize) {
        debug_assert!(sample < exclusive_max, "{name} sample {sample} out of range");
        self.samples.borrow_mut().push(HistogramSample { name, sample });
    }
}
