//! Wall clock and local-midnight computation
//!
//! Day buckets are keyed by the instant of local midnight. The system clock
//! uses the process time zone; [`ManualClock`] pins both the instant and the
//! offset so day boundaries can be simulated.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveTime, Offset, TimeZone, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Source of the current time and of day boundaries
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Instant of local midnight on the calendar day containing `at`
    fn local_midnight(&self, at: DateTime<Utc>) -> DateTime<Utc>;

    /// Local midnight of today
    fn today_midnight(&self) -> DateTime<Utc> {
        self.local_midnight(self.now())
    }
}

/// Process clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_midnight(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        let local_day = at.with_timezone(&Local).date_naive();
        let midnight = local_day.and_time(NaiveTime::MIN);
        match Local.from_local_datetime(&midnight).earliest() {
            Some(local) => local.with_timezone(&Utc),
            // Midnight skipped by a DST transition
            None => Utc.from_utc_datetime(&midnight),
        }
    }
}

/// Settable clock with a fixed UTC offset
///
/// Clones share the same instant, so a clock handed to a tracker can still be
/// advanced by the caller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
    offset: FixedOffset,
}

impl ManualClock {
    /// Clock at `now`, with midnight computed in UTC
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_offset(now, Utc.fix())
    }

    pub fn with_offset(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
            offset,
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn local_midnight(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        let local_day = at.with_timezone(&self.offset).date_naive();
        let midnight = local_day.and_time(NaiveTime::MIN);
        match self.offset.from_local_datetime(&midnight).single() {
            Some(local) => local.with_timezone(&Utc),
            None => Utc.from_utc_datetime(&midnight),
        }
    }
}
