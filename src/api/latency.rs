//! In-memory latency histograms for fetch-cycle instrumentation.
//! Records time from cycle start to settle, per page.

use std::sync::Mutex;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;

/// One histogram. Values stored in microseconds.
pub struct LatencyStats {
    inner: Mutex<hdrhistogram::Histogram<u64>>,
}

impl LatencyStats {
    /// Tracks 1us to 100s, 3 significant figures. Fetch timeouts top out at 15s.
    pub fn new() -> Self {
        let histogram = hdrhistogram::Histogram::new_with_bounds(1, 100_000_000, 3)
            .expect("valid histogram bounds");
        Self {
            inner: Mutex::new(histogram),
        }
    }

    pub fn record(&self, d: Duration) {
        let us = d.as_micros().clamp(1, 100_000_000) as u64;
        if let Ok(mut h) = self.inner.lock() {
            let _ = h.record(us);
        }
    }

    /// (p50_us, p95_us, p99_us, max_us). None if no samples.
    pub fn percentiles(&self) -> Option<(u64, u64, u64, u64)> {
        let h = self.inner.lock().ok()?;
        if h.len() == 0 {
            return None;
        }
        Some((
            h.value_at_quantile(0.5),
            h.value_at_quantile(0.95),
            h.value_at_quantile(0.99),
            h.max(),
        ))
    }

    pub fn len(&self) -> u64 {
        self.inner.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for LatencyStats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LatencySummary {
    pub page: String,
    pub samples: u64,
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub max_ms: Option<f64>,
}

/// Fetch-cycle latency, one histogram per page. Pollers record, API reads.
#[derive(Default)]
pub struct LatencyBook {
    pages: DashMap<String, LatencyStats>,
}

impl LatencyBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, page: &str, d: Duration) {
        if let Some(stats) = self.pages.get(page) {
            stats.record(d);
            return;
        }
        self.pages.entry(page.to_string()).or_default().record(d);
    }

    /// Sample count for one page (0 if never recorded).
    pub fn samples(&self, page: &str) -> u64 {
        self.pages.get(page).map(|s| s.len()).unwrap_or(0)
    }

    /// Per-page summaries, sorted by page name.
    pub fn summary(&self) -> Vec<LatencySummary> {
        let to_ms = |us: u64| us as f64 / 1000.0;
        let mut out: Vec<LatencySummary> = self
            .pages
            .iter()
            .map(|e| {
                let p = e.value().percentiles();
                LatencySummary {
                    page: e.key().clone(),
                    samples: e.value().len(),
                    p50_ms: p.map(|p| to_ms(p.0)),
                    p95_ms: p.map(|p| to_ms(p.1)),
                    p99_ms: p.map(|p| to_ms(p.2)),
                    max_ms: p.map(|p| to_ms(p.3)),
                }
            })
            .collect();
        out.sort_by(|a, b| a.page.cmp(&b.page));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_histogram_has_no_percentiles() {
        let stats = LatencyStats::new();
        assert_eq!(stats.percentiles(), None);
        assert_eq!(stats.len(), 0);
    }

    #[test]
    fn book_keeps_pages_apart() {
        let book = LatencyBook::new();
        book.record("predictions", Duration::from_millis(120));
        book.record("predictions", Duration::from_millis(80));
        book.record("sport:rugby", Duration::from_millis(10));

        assert_eq!(book.samples("predictions"), 2);
        assert_eq!(book.samples("sport:rugby"), 1);
        assert_eq!(book.samples("fixtures"), 0);

        let summary = book.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].page, "predictions");
        let max = summary[0].max_ms.unwrap();
        assert!((119.0..=121.0).contains(&max), "max {max}");
    }
}
