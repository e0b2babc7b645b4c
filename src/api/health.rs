//! Shared health state for the /health endpoint.
//! Updated by the pollers and the fixtures scheduler.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

/// Fetch-cycle counters. Timestamps are unix millis, 0 = never.
#[derive(Default)]
pub struct HealthState {
    cycles_ok: AtomicU64,
    cycles_failed: AtomicU64,
    last_success_ms: AtomicU64,
    last_failure_ms: AtomicU64,
    /// Next wall-clock fixtures refresh.
    next_fixtures_refresh_ms: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle(&self, ok: bool, at: DateTime<Utc>) {
        let ms = at.timestamp_millis().max(0) as u64;
        if ok {
            self.cycles_ok.fetch_add(1, Ordering::Relaxed);
            self.last_success_ms.store(ms, Ordering::Relaxed);
        } else {
            self.cycles_failed.fetch_add(1, Ordering::Relaxed);
            self.last_failure_ms.store(ms, Ordering::Relaxed);
        }
    }

    pub fn set_next_fixtures_refresh(&self, at: DateTime<Utc>) {
        self.next_fixtures_refresh_ms
            .store(at.timestamp_millis().max(0) as u64, Ordering::Relaxed);
    }

    pub fn cycles_ok(&self) -> u64 {
        self.cycles_ok.load(Ordering::Relaxed)
    }

    pub fn cycles_failed(&self) -> u64 {
        self.cycles_failed.load(Ordering::Relaxed)
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        from_ms(self.last_success_ms.load(Ordering::Relaxed))
    }

    pub fn last_failure(&self) -> Option<DateTime<Utc>> {
        from_ms(self.last_failure_ms.load(Ordering::Relaxed))
    }

    pub fn next_fixtures_refresh(&self) -> Option<DateTime<Utc>> {
        from_ms(self.next_fixtures_refresh_ms.load(Ordering::Relaxed))
    }
}

fn from_ms(ms: u64) -> Option<DateTime<Utc>> {
    if ms == 0 {
        return None;
    }
    Utc.timestamp_millis_opt(ms as i64).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_timestamps() {
        let h = HealthState::new();
        assert_eq!(h.last_success(), None);

        let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        h.record_cycle(true, t);
        h.record_cycle(false, t);
        h.record_cycle(true, t);

        assert_eq!(h.cycles_ok(), 2);
        assert_eq!(h.cycles_failed(), 1);
        assert_eq!(h.last_success(), Some(t));
        assert_eq!(h.last_failure(), Some(t));
        assert_eq!(h.next_fixtures_refresh(), None);
    }
}
