use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// Separates monotonic time (intervals, timeouts) from wall-clock time
/// (season boundaries, decay anchors). Components must never use wall-clock
/// for durations, nor monotonic time for schedule anchors.
pub trait Clock: Send + Sync {
    /// Monotonic instant, unaffected by clock adjustments.
    fn now_monotonic(&self) -> Instant;
    /// Wall-clock time, used only for schedule anchors.
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_monotonic(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock whose monotonic and wall-clock readings can be advanced
/// independently, for deterministic component tests.
pub struct FakeClock {
    origin: Instant,
    monotonic_offset_ms: AtomicU64,
    wall_offset_secs: AtomicI64,
    wall_origin: DateTime<Utc>,
}

impl FakeClock {
    pub fn new(wall_origin: DateTime<Utc>) -> Self {
        Self {
            origin: Instant::now(),
            monotonic_offset_ms: AtomicU64::new(0),
            wall_offset_secs: AtomicI64::new(0),
            wall_origin,
        }
    }

    pub fn advance(&self, d: Duration) {
        self.monotonic_offset_ms
            .fetch_add(d.as_millis() as u64, Ordering::SeqCst);
        self.wall_offset_secs
            .fetch_add(d.as_secs() as i64, Ordering::SeqCst);
    }

    pub fn advance_wall_only(&self, d: Duration) {
        self.wall_offset_secs
            .fetch_add(d.as_secs() as i64, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now_monotonic(&self) -> Instant {
        self.origin + Duration::from_millis(self.monotonic_offset_ms.load(Ordering::SeqCst))
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.wall_origin + chrono::Duration::seconds(self.wall_offset_secs.load(Ordering::SeqCst))
    }
}

pub fn unix_seconds(dt: DateTime<Utc>) -> u64 {
    dt.timestamp().max(0) as u64
}

pub fn system_time_to_utc(t: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(t)
}

pub fn epoch() -> SystemTime {
    UNIX_EPOCH
}
