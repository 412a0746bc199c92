//! 时间工具函数 - 时钟抽象与 HH:mm 格式

use chrono::{Local, NaiveDateTime, NaiveTime, Timelike};
use parking_lot::Mutex;

/// Source of "now" for the coordinator and the expiry sweeper
pub trait Clock: Send + Sync {
    /// Local wall-clock time at the venue
    fn now(&self) -> NaiveDateTime;

    /// [`Clock::now`] read as UTC millis
    ///
    /// Visit dates are stored the same way (event date at midnight, read as
    /// UTC), so both sides of a `date <= now` comparison share one timeline.
    fn now_millis(&self) -> i64 {
        self.now().and_utc().timestamp_millis()
    }
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Settable clock (demo seeding, tests)
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

/// Format a time as HH:mm
pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}
