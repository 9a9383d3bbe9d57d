//! Per-tab binding between navigation signals and the savings pipeline
//!
//! A [`NavigationBinding`] owns the tab's [`FeatureAccumulator`]. The
//! accumulator is reset when a main-frame navigation is ready to commit and
//! its prediction is flushed to the profile's tracker when the *next*
//! navigation starts or the tab is destroyed. Off-the-record tabs get no
//! accumulator and every signal is a no-op.

use crate::accumulator::FeatureAccumulator;
use crate::entities::EntityDirectory;
use crate::features::{PageLoadTiming, ResourceLoadInfo};
use crate::savings::BandwidthSavingsTracker;
use crate::sequence::SequenceChecker;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Savings tracker shared by every tab of one profile
pub type SharedSavingsTracker = Rc<RefCell<BandwidthSavingsTracker>>;

/// Snapshot of one navigation as seen by a lifecycle signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationHandle {
    pub navigation_id: u64,
    pub url: String,
    #[serde(default = "default_true")]
    pub is_main_frame: bool,
    #[serde(default)]
    pub is_download: bool,
    #[serde(default = "default_true")]
    pub has_committed: bool,
}

fn default_true() -> bool {
    true
}

impl NavigationHandle {
    /// Committed main-frame navigation
    pub fn main_frame(navigation_id: u64, url: impl Into<String>) -> Self {
        Self {
            navigation_id,
            url: url.into(),
            is_main_frame: true,
            is_download: false,
            has_committed: true,
        }
    }

    pub fn sub_frame(mut self) -> Self {
        self.is_main_frame = false;
        self
    }

    pub fn download(mut self) -> Self {
        self.is_download = true;
        self
    }

    pub fn not_committed(mut self) -> Self {
        self.has_committed = false;
        self
    }

    fn is_tracked(&self) -> bool {
        self.is_main_frame && !self.is_download
    }
}

/// Wires one tab's navigation lifecycle to a feature accumulator
#[derive(Debug)]
pub struct NavigationBinding {
    tab_id: u64,
    accumulator: Option<FeatureAccumulator>,
    navigation_id: Option<u64>,
    tracker: SharedSavingsTracker,
    sequence: SequenceChecker,
}

impl NavigationBinding {
    pub fn new(
        tab_id: u64,
        off_the_record: bool,
        directory: Arc<EntityDirectory>,
        tracker: SharedSavingsTracker,
    ) -> Self {
        let accumulator = if off_the_record {
            tracing::debug!("Tab {} is off the record, savings disabled", tab_id);
            None
        } else {
            Some(FeatureAccumulator::new(directory))
        };
        Self {
            tab_id,
            accumulator,
            navigation_id: None,
            tracker,
            sequence: SequenceChecker::new(),
        }
    }

    pub fn tab_id(&self) -> u64 {
        self.tab_id
    }

    /// Whether this tab feeds the savings pipeline at all
    pub fn is_active(&self) -> bool {
        self.accumulator.is_some()
    }

    /// Navigation the accumulator currently belongs to
    pub fn navigation_id(&self) -> Option<u64> {
        self.navigation_id
    }

    pub fn accumulator(&self) -> Option<&FeatureAccumulator> {
        self.accumulator.as_ref()
    }

    /// Flush the previous navigation's prediction
    ///
    /// Returns the bytes recorded, 0 when nothing was.
    pub fn did_start_navigation(&mut self, handle: &NavigationHandle) -> u64 {
        self.sequence.check();
        if !handle.is_tracked() || self.navigation_id.is_none() {
            return 0;
        }
        self.flush()
    }

    /// Reset the accumulator for the navigation about to commit
    pub fn ready_to_commit_navigation(&mut self, handle: &NavigationHandle) {
        self.sequence.check();
        if !handle.is_tracked() {
            return;
        }
        let Some(accumulator) = self.accumulator.as_mut() else {
            return;
        };
        accumulator.on_navigation_committed(&handle.url);
        self.navigation_id = Some(handle.navigation_id);
        tracing::debug!(
            "{} committed navigation ID {} to {}",
            self.tab_id,
            handle.navigation_id,
            handle.url
        );
    }

    /// Capture the final main-frame URL once the navigation commits
    pub fn did_finish_navigation(&mut self, handle: &NavigationHandle) {
        self.sequence.check();
        if !handle.is_tracked() || !handle.has_committed {
            return;
        }
        if let Some(accumulator) = self.accumulator.as_mut() {
            accumulator.update_main_frame_url(&handle.url);
        }
    }

    pub fn resource_load_complete(&mut self, info: &ResourceLoadInfo) {
        if let Some(accumulator) = self.accumulator.as_mut() {
            accumulator.on_resource_load_complete(info);
        }
    }

    pub fn on_blocked_subresource(&mut self, subresource: &str) {
        if let Some(accumulator) = self.accumulator.as_mut() {
            accumulator.on_subresource_blocked(subresource);
        }
    }

    pub fn on_page_load_timing_updated(&mut self, timing: &PageLoadTiming) {
        if let Some(accumulator) = self.accumulator.as_mut() {
            accumulator.on_timing_updated(timing);
        }
    }

    /// Drop the current navigation's state without recording it
    pub fn did_attach_interstitial(&mut self) {
        if let Some(accumulator) = self.accumulator.as_mut() {
            accumulator.reset();
        }
    }

    /// Record the last navigation as the tab goes away
    ///
    /// The accumulator is cleared afterwards, so a repeated call records
    /// nothing.
    pub fn web_contents_destroyed(&mut self) -> u64 {
        self.sequence.check();
        self.flush()
    }

    /// Current estimate for the live navigation, 0.0 when inactive
    pub fn current_prediction(&self) -> f64 {
        self.accumulator
            .as_ref()
            .map_or(0.0, FeatureAccumulator::predict)
    }

    /// Record the tracked navigation, then discard its state
    fn flush(&mut self) -> u64 {
        let recorded = self.record_saving();
        if let Some(accumulator) = self.accumulator.as_mut() {
            accumulator.reset();
        }
        self.navigation_id = None;
        recorded
    }

    fn record_saving(&mut self) -> u64 {
        let Some(accumulator) = self.accumulator.as_ref() else {
            return 0;
        };
        let prediction = accumulator.predict();
        // Truncate toward zero; negative and NaN predictions record nothing
        let saving = if prediction > 0.0 { prediction as u64 } else { 0 };
        if saving > 0 {
            tracing::debug!("Store bandwidth saving of {} Bytes to prefs", saving);
            self.tracker.borrow_mut().record_saving(saving);
        }
        saving
    }
}
