//! Navigation event log replay
//!
//! Drives one tab from a JSON-lines log. Each line is an object tagged by
//! `event`; an optional RFC 3339 `at` field moves the manual clock before the
//! event is applied, so day boundaries in the log are honored.
//!
//! ```text
//! {"event":"navigation_started","navigation_id":1,"url":"https://news.example/","at":"2026-03-02T09:00:00Z"}
//! {"event":"ready_to_commit","navigation_id":1,"url":"https://news.example/"}
//! {"event":"resource_loaded","url":"https://cdn.example/app.js","resource_type":"script","total_received_bytes":52000}
//! {"event":"subresource_blocked","url":"https://www.google-analytics.com/analytics.js"}
//! {"event":"timing","first_contentful_paint":420.0}
//! {"event":"tab_closed"}
//! ```

use crate::clock::{Clock, ManualClock};
use crate::features::{PageLoadTiming, ResourceLoadInfo};
use crate::navigation::{NavigationBinding, NavigationHandle};
use crate::page_metrics::PageMetricsObserver;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::BufRead;
use std::rc::Rc;

/// One navigation or page-load signal
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayEvent {
    NavigationStarted(NavigationHandle),
    ReadyToCommit(NavigationHandle),
    NavigationFinished(NavigationHandle),
    ResourceLoaded(ResourceLoadInfo),
    SubresourceBlocked { url: String },
    Timing(PageLoadTiming),
    InterstitialAttached,
    TabClosed,
}

/// A log line: the event plus its optional timestamp
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplayRecord {
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub event: ReplayEvent,
}

/// A positive saving flushed to the tracker during replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordedSaving {
    pub navigation_id: Option<u64>,
    pub bytes: u64,
    pub at: DateTime<Utc>,
}

/// Outcome of a replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    pub recorded: Vec<RecordedSaving>,
}

impl ReplaySummary {
    pub fn total_recorded(&self) -> u64 {
        self.recorded.iter().map(|r| r.bytes).sum()
    }
}

/// Applies log records to one tab
pub struct Replayer {
    binding: Rc<RefCell<NavigationBinding>>,
    observer: PageMetricsObserver,
    off_the_record: bool,
    clock: ManualClock,
    summary: ReplaySummary,
}

impl Replayer {
    /// `clock` must be the clock the binding's tracker reads
    pub fn new(binding: NavigationBinding, off_the_record: bool, clock: ManualClock) -> Self {
        Self {
            binding: Rc::new(RefCell::new(binding)),
            observer: PageMetricsObserver::new(),
            off_the_record,
            clock,
            summary: ReplaySummary::default(),
        }
    }

    pub fn apply(&mut self, record: ReplayRecord) {
        if let Some(at) = record.at {
            self.clock.set(at);
        }
        self.summary.events += 1;

        match record.event {
            ReplayEvent::NavigationStarted(handle) => {
                let previous = self.binding.borrow().navigation_id();
                let bytes = self.binding.borrow_mut().did_start_navigation(&handle);
                self.push_recorded(previous, bytes);
            }
            ReplayEvent::ReadyToCommit(handle) => {
                self.binding.borrow_mut().ready_to_commit_navigation(&handle);
            }
            ReplayEvent::NavigationFinished(handle) => {
                self.binding.borrow_mut().did_finish_navigation(&handle);
                if handle.is_main_frame && handle.has_committed && !handle.is_download {
                    self.observer.on_commit(&handle, self.off_the_record, Some(&self.binding));
                }
            }
            ReplayEvent::ResourceLoaded(info) => {
                self.binding.borrow_mut().resource_load_complete(&info);
            }
            ReplayEvent::SubresourceBlocked { url } => {
                self.binding.borrow_mut().on_blocked_subresource(&url);
            }
            ReplayEvent::Timing(timing) => self.observer.on_timing(&timing),
            ReplayEvent::InterstitialAttached => {
                self.binding.borrow_mut().did_attach_interstitial();
            }
            ReplayEvent::TabClosed => self.close_tab(),
        }
    }

    /// Flush the live navigation, as when the log ends with the tab open
    pub fn close_tab(&mut self) {
        let previous = self.binding.borrow().navigation_id();
        let bytes = self.binding.borrow_mut().web_contents_destroyed();
        self.push_recorded(previous, bytes);
    }

    pub fn summary(&self) -> &ReplaySummary {
        &self.summary
    }

    pub fn into_summary(self) -> ReplaySummary {
        self.summary
    }

    fn push_recorded(&mut self, navigation_id: Option<u64>, bytes: u64) {
        if bytes > 0 {
            self.summary.recorded.push(RecordedSaving {
                navigation_id,
                bytes,
                at: self.clock.now(),
            });
        }
    }
}

/// Parse one log line; blank lines and `#` comments yield `None`
pub fn parse_line(line: &str) -> Result<Option<ReplayRecord>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let record = serde_json::from_str(line)?;
    Ok(Some(record))
}

/// Replay a whole log, closing the tab at the end
pub fn replay_log<R: BufRead>(reader: R, mut replayer: Replayer) -> Result<ReplaySummary> {
    let mut closed = false;
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read event log line {}", index + 1))?;
        let Some(record) = parse_line(&line)
            .with_context(|| format!("Invalid event on line {}", index + 1))?
        else {
            continue;
        };
        closed = matches!(record.event, ReplayEvent::TabClosed);
        replayer.apply(record);
    }
    if !closed {
        replayer.close_tab();
    }
    Ok(replayer.into_summary())
}
