//! Lookup metrics.
//!
//! Each `I18n` instance owns its own counters, so independent instances (and
//! tests) never share state. Counters are atomics and safe to bump from any
//! number of concurrent readers.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lookup counters for one `I18n` instance.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Number of translate/localize calls
    lookups: AtomicUsize,

    /// Number of lookups that degraded to the message key
    misses: AtomicUsize,

    /// Number of lookups for an unsupported language that used the default
    language_fallbacks: AtomicUsize,
}

impl LookupMetrics {
    /// Create a metrics instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a translate or localize call.
    pub fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup that returned the message key instead of text.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup for an unsupported language served by the default.
    pub fn record_language_fallback(&self) {
        self.language_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total lookup count.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Get miss count.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get language fallback count.
    pub fn language_fallbacks(&self) -> usize {
        self.language_fallbacks.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let lookups = self.lookups();
        let misses = self.misses();
        let language_fallbacks = self.language_fallbacks();

        let rate = |count: usize| {
            if lookups > 0 {
                (count as f64 / lookups as f64) * 100.0
            } else {
                0.0
            }
        };

        MetricsReport {
            lookups,
            misses,
            miss_rate: rate(misses),
            language_fallbacks,
            language_fallback_rate: rate(language_fallbacks),
        }
    }
}

/// Metrics report containing current lookup statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Total lookups
    pub lookups: usize,

    /// Lookups that returned the key
    pub misses: usize,

    /// Miss rate as a percentage (0-100)
    pub miss_rate: f64,

    /// Lookups for unsupported languages
    pub language_fallbacks: usize,

    /// Language fallback rate as a percentage (0-100)
    pub language_fallback_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Counter Tests ====================

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = LookupMetrics::new();
        assert_eq!(metrics.lookups(), 0);
        assert_eq!(metrics.misses(), 0);
        assert_eq!(metrics.language_fallbacks(), 0);
    }

    #[test]
    fn test_record_counters() {
        let metrics = LookupMetrics::new();
        metrics.record_lookup();
        metrics.record_lookup();
        metrics.record_miss();
        metrics.record_language_fallback();

        assert_eq!(metrics.lookups(), 2);
        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.language_fallbacks(), 1);
    }

    #[test]
    fn test_instances_are_independent() {
        let a = LookupMetrics::new();
        let b = LookupMetrics::new();
        a.record_lookup();

        assert_eq!(a.lookups(), 1);
        assert_eq!(b.lookups(), 0);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = LookupMetrics::new().report();
        assert_eq!(report.lookups, 0);
        assert_eq!(report.miss_rate, 0.0);
        assert_eq!(report.language_fallback_rate, 0.0);
    }

    #[test]
    fn test_report_rates() {
        let metrics = LookupMetrics::new();
        for _ in 0..4 {
            metrics.record_lookup();
        }
        metrics.record_miss();
        metrics.record_language_fallback();
        metrics.record_language_fallback();

        let report = metrics.report();
        assert_eq!(report.miss_rate, 25.0);
        assert_eq!(report.language_fallback_rate, 50.0);
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(LookupMetrics::new().report()).unwrap();
        assert_eq!(json["lookups"], 0);
        assert!(json.get("miss_rate").is_some());
    }
}
