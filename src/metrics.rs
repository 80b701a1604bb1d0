//! Performance metrics and statistics tracking for the diagnosis pipeline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for diagnosis throughput and confidence behavior
pub struct DiagnosisMetrics {
    /// Total diagnoses processed
    pub diagnoses_processed: AtomicU64,
    /// Diagnoses below the confidence gate
    pub low_confidence_count: AtomicU64,
    /// Risk assessments by level
    risk_by_level: RwLock<HashMap<String, u64>>,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Confidence distribution buckets
    confidence_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl DiagnosisMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            diagnoses_processed: AtomicU64::new(0),
            low_confidence_count: AtomicU64::new(0),
            risk_by_level: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            confidence_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a completed diagnosis
    pub fn record_diagnosis(&self, processing_time: Duration, confidence: f32, is_confident: bool) {
        self.diagnoses_processed.fetch_add(1, Ordering::Relaxed);
        if !is_confident {
            self.low_confidence_count.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the recent window for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = (confidence * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.confidence_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a risk assessment
    pub fn record_risk(&self, level: &str) {
        if let Ok(mut by_level) = self.risk_by_level.write() {
            *by_level.entry(level.to_string()).or_insert(0) += 1;
        }
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = self.processing_times.read().unwrap();
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (diagnoses per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.diagnoses_processed.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get confidence distribution
    pub fn get_confidence_distribution(&self) -> [u64; 10] {
        *self.confidence_buckets.read().unwrap()
    }

    /// Get risk assessments by level
    pub fn get_risk_by_level(&self) -> HashMap<String, u64> {
        self.risk_by_level.read().unwrap().clone()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let processed = self.diagnoses_processed.load(Ordering::Relaxed);
        let low_confidence = self.low_confidence_count.load(Ordering::Relaxed);
        let low_rate = if processed > 0 {
            (low_confidence as f64 / processed as f64) * 100.0
        } else {
            0.0
        };

        let processing = self.get_processing_stats();
        let risk_by_level = self.get_risk_by_level();

        info!(
            diagnoses = processed,
            low_confidence = low_confidence,
            low_confidence_rate = %format!("{:.1}%", low_rate),
            "Diagnosis summary"
        );
        info!(
            mean_us = processing.mean_us,
            p50_us = processing.p50_us,
            p95_us = processing.p95_us,
            p99_us = processing.p99_us,
            "Processing time (μs)"
        );
        for (level, count) in &risk_by_level {
            info!(level = %level, count = *count, "Risk assessments");
        }
    }
}

impl Default for DiagnosisMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = DiagnosisMetrics::new();

        metrics.record_diagnosis(Duration::from_micros(100), 0.9, true);
        metrics.record_diagnosis(Duration::from_micros(200), 0.3, false);
        metrics.record_risk("CRITICAL");
        metrics.record_risk("LOW");
        metrics.record_risk("CRITICAL");

        assert_eq!(metrics.diagnoses_processed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.low_confidence_count.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.get_risk_by_level().get("CRITICAL"), Some(&2));
    }

    #[test]
    fn test_confidence_buckets() {
        let metrics = DiagnosisMetrics::new();

        metrics.record_diagnosis(Duration::from_micros(50), 0.05, false);
        metrics.record_diagnosis(Duration::from_micros(50), 0.95, true);
        metrics.record_diagnosis(Duration::from_micros(50), 1.0, true);

        let buckets = metrics.get_confidence_distribution();
        assert_eq!(buckets[0], 1);
        assert_eq!(buckets[9], 2);
    }

    #[test]
    fn test_processing_stats() {
        let metrics = DiagnosisMetrics::new();

        for i in 1..=100 {
            metrics.record_diagnosis(Duration::from_micros(i * 10), 0.8, true);
        }

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 100);
        assert!(stats.p50_us <= stats.p95_us);
        assert!(stats.p95_us <= stats.p99_us);
        assert_eq!(stats.max_us, 1000);
    }
}
