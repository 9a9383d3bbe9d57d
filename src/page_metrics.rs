//! Page-timing observer
//!
//! Observes one page load and forwards its paint and load milestones to the
//! tab's [`NavigationBinding`]. Observation stops at commit for off-the-record
//! tabs and for tabs without a binding.

use crate::features::PageLoadTiming;
use crate::navigation::{NavigationBinding, NavigationHandle};
use crate::sequence::SequenceChecker;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Whether the observer wants further callbacks for this page load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservePolicy {
    ContinueObserving,
    StopObserving,
}

/// Forwards timing milestones of one committed page load
#[derive(Debug, Default)]
pub struct PageMetricsObserver {
    navigation_id: Option<u64>,
    binding: Option<Weak<RefCell<NavigationBinding>>>,
    sequence: SequenceChecker,
}

impl PageMetricsObserver {
    pub fn new() -> Self {
        Self {
            sequence: SequenceChecker::new(),
            ..Self::default()
        }
    }

    pub fn on_commit(
        &mut self,
        handle: &NavigationHandle,
        off_the_record: bool,
        binding: Option<&Rc<RefCell<NavigationBinding>>>,
    ) -> ObservePolicy {
        self.sequence.check();
        if off_the_record {
            return ObservePolicy::StopObserving;
        }

        self.navigation_id = Some(handle.navigation_id);
        let Some(binding) = binding else {
            return ObservePolicy::StopObserving;
        };
        self.binding = Some(Rc::downgrade(binding));
        ObservePolicy::ContinueObserving
    }

    /// All MIME types are observed; only transferred bytes feed the model
    pub fn should_observe_mime_type(&self, _mime_type: &str) -> ObservePolicy {
        ObservePolicy::ContinueObserving
    }

    pub fn on_first_contentful_paint(&mut self, timing: &PageLoadTiming) {
        self.forward(timing);
        tracing::debug!(
            "{:?} paint timing NavigationToFirstContentfulPaint {:?}",
            self.navigation_id,
            timing.first_contentful_paint
        );
    }

    pub fn on_first_meaningful_paint(&mut self, timing: &PageLoadTiming) {
        self.forward(timing);
        tracing::debug!(
            "{:?} paint timing NavigationToFirstMeaningfulPaint {:?}",
            self.navigation_id,
            timing.first_meaningful_paint
        );
    }

    pub fn on_load_event_start(&mut self, timing: &PageLoadTiming) {
        self.forward(timing);
        tracing::debug!(
            "{:?} document timing NavigationToLoadEventFired {:?}",
            self.navigation_id,
            timing.load_event_start
        );
    }

    /// Dispatch each milestone present in `timing` to its callback
    pub fn on_timing(&mut self, timing: &PageLoadTiming) {
        if timing.first_contentful_paint.is_some() {
            self.on_first_contentful_paint(timing);
        }
        if timing.first_meaningful_paint.is_some() {
            self.on_first_meaningful_paint(timing);
        }
        if timing.load_event_start.is_some() {
            self.on_load_event_start(timing);
        }
    }

    pub fn is_observing(&self) -> bool {
        self.binding
            .as_ref()
            .is_some_and(|binding| binding.strong_count() > 0)
    }

    fn forward(&mut self, timing: &PageLoadTiming) {
        self.sequence.check();
        // The tab may already be gone
        if let Some(binding) = self.binding.as_ref().and_then(Weak::upgrade) {
            binding.borrow_mut().on_page_load_timing_updated(timing);
        }
    }
}
