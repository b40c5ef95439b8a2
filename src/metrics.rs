//! Scoring statistics for the dashboard.

use crate::error::AdaptError;
use crate::types::PredictionResult;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Keep at most this many latency samples
const MAX_SAMPLES: usize = 10_000;

/// Counters and latency samples for scoring activity
pub struct ScoringMetrics {
    /// Feature vectors scored (single and batch rows)
    pub vectors_scored: AtomicU64,
    /// Vectors predicted as fraud
    pub fraud_flagged: AtomicU64,
    /// Batch uploads scored
    pub batches_scored: AtomicU64,
    /// Rejected submissions by error kind
    rejections: RwLock<BTreeMap<&'static str, u64>>,
    /// Scoring times (in microseconds), one per scoring call
    processing_times: RwLock<Vec<u64>>,
    /// Fraud probability distribution buckets
    score_buckets: RwLock<[u64; 10]>,
    start_time: Instant,
}

impl ScoringMetrics {
    pub fn new() -> Self {
        Self {
            vectors_scored: AtomicU64::new(0),
            fraud_flagged: AtomicU64::new(0),
            batches_scored: AtomicU64::new(0),
            rejections: RwLock::new(BTreeMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record one scoring call covering `results`
    pub fn record_scoring(&self, processing_time: Duration, results: &[PredictionResult]) {
        self.vectors_scored
            .fetch_add(results.len() as u64, Ordering::Relaxed);
        let flagged = results.iter().filter(|r| r.label.is_fraud()).count() as u64;
        self.fraud_flagged.fetch_add(flagged, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            if times.len() > MAX_SAMPLES {
                times.drain(0..MAX_SAMPLES / 2);
            }
        }

        if let Ok(mut buckets) = self.score_buckets.write() {
            for result in results {
                let bucket = (result.fraud_probability * 10.0).clamp(0.0, 9.0) as usize;
                buckets[bucket] += 1;
            }
        }
    }

    /// Record a scored batch upload
    pub fn record_batch(&self, processing_time: Duration, results: &[PredictionResult]) {
        self.batches_scored.fetch_add(1, Ordering::Relaxed);
        self.record_scoring(processing_time, results);
    }

    /// Record a rejected submission
    pub fn record_rejection(&self, error: &AdaptError) {
        if let Ok(mut rejections) = self.rejections.write() {
            *rejections.entry(error.kind()).or_insert(0) += 1;
        }
    }

    pub fn get_rejections(&self) -> BTreeMap<&'static str, u64> {
        self.rejections
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn get_processing_stats(&self) -> ProcessingStats {
        let Ok(times) = self.processing_times.read() else {
            return ProcessingStats::default();
        };
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted = times.clone();
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p99_us: sorted[((count as f64 * 0.99) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    pub fn get_score_distribution(&self) -> [u64; 10] {
        self.score_buckets
            .read()
            .map(|b| *b)
            .unwrap_or_default()
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Render counters in the Prometheus text exposition format
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# HELP fraud_dashboard_vectors_scored_total Feature vectors scored");
        let _ = writeln!(out, "# TYPE fraud_dashboard_vectors_scored_total counter");
        let _ = writeln!(
            out,
            "fraud_dashboard_vectors_scored_total {}",
            self.vectors_scored.load(Ordering::Relaxed)
        );

        let _ = writeln!(out, "# HELP fraud_dashboard_fraud_flagged_total Vectors predicted as fraud");
        let _ = writeln!(out, "# TYPE fraud_dashboard_fraud_flagged_total counter");
        let _ = writeln!(
            out,
            "fraud_dashboard_fraud_flagged_total {}",
            self.fraud_flagged.load(Ordering::Relaxed)
        );

        let _ = writeln!(out, "# HELP fraud_dashboard_batches_scored_total Batch uploads scored");
        let _ = writeln!(out, "# TYPE fraud_dashboard_batches_scored_total counter");
        let _ = writeln!(
            out,
            "fraud_dashboard_batches_scored_total {}",
            self.batches_scored.load(Ordering::Relaxed)
        );

        let _ = writeln!(out, "# HELP fraud_dashboard_rejections_total Rejected submissions");
        let _ = writeln!(out, "# TYPE fraud_dashboard_rejections_total counter");
        for (kind, count) in self.get_rejections() {
            let _ = writeln!(out, "fraud_dashboard_rejections_total{{kind=\"{}\"}} {}", kind, count);
        }

        let stats = self.get_processing_stats();
        let _ = writeln!(out, "# HELP fraud_dashboard_scoring_latency_us Scoring latency");
        let _ = writeln!(out, "# TYPE fraud_dashboard_scoring_latency_us gauge");
        let _ = writeln!(out, "fraud_dashboard_scoring_latency_us{{stat=\"mean\"}} {}", stats.mean_us);
        let _ = writeln!(out, "fraud_dashboard_scoring_latency_us{{stat=\"p50\"}} {}", stats.p50_us);
        let _ = writeln!(out, "fraud_dashboard_scoring_latency_us{{stat=\"p99\"}} {}", stats.p99_us);

        out
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let scored = self.vectors_scored.load(Ordering::Relaxed);
        let flagged = self.fraud_flagged.load(Ordering::Relaxed);
        let fraud_rate = if scored > 0 {
            (flagged as f64 / scored as f64) * 100.0
        } else {
            0.0
        };
        let processing = self.get_processing_stats();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║             FRAUD SCORING DASHBOARD - SESSION SUMMARY        ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Vectors Scored: {:>8}  │  Batches: {:>6}  │  Uptime: {:>6}s ║",
            scored,
            self.batches_scored.load(Ordering::Relaxed),
            self.uptime().as_secs()
        );
        info!(
            "║ Fraud Flagged:  {:>8}  │  Fraud Rate: {:>6.1}%               ║",
            flagged, fraud_rate
        );
        info!(
            "║ Scoring Time (μs): mean={:>6} p50={:>6} p99={:>6}            ║",
            processing.mean_us, processing.p50_us, processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Rejected Inputs:                                             ║");
        for (kind, count) in self.get_rejections() {
            info!("║   {:18}: {:>6}                                   ║", kind, count);
        }
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Fraud Probability Distribution:                              ║");
        let distribution = self.get_score_distribution();
        let total: u64 = distribution.iter().sum();
        for (i, &count) in distribution.iter().enumerate() {
            let pct = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for ScoringMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoring time statistics
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Label;

    #[test]
    fn test_metrics_recording() {
        let metrics = ScoringMetrics::new();

        metrics.record_scoring(
            Duration::from_micros(100),
            &[PredictionResult::new(Label::Fraudulent, 0.9)],
        );
        metrics.record_batch(
            Duration::from_micros(300),
            &[
                PredictionResult::new(Label::Legitimate, 0.1),
                PredictionResult::new(Label::Legitimate, 0.0),
                PredictionResult::new(Label::Fraudulent, 1.0),
            ],
        );

        assert_eq!(metrics.vectors_scored.load(Ordering::Relaxed), 4);
        assert_eq!(metrics.fraud_flagged.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.batches_scored.load(Ordering::Relaxed), 1);

        let distribution = metrics.get_score_distribution();
        assert_eq!(distribution[0], 1);
        assert_eq!(distribution[1], 1);
        assert_eq!(distribution[9], 2);

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_us, 200);
        assert_eq!(stats.max_us, 300);
    }

    #[test]
    fn test_rejections_by_kind() {
        let metrics = ScoringMetrics::new();
        metrics.record_rejection(&AdaptError::SchemaMismatch {
            expected: 106,
            found: 104,
        });
        metrics.record_rejection(&AdaptError::SchemaMismatch {
            expected: 106,
            found: 107,
        });
        metrics.record_rejection(&AdaptError::ParseError("x".to_string()));

        let rejections = metrics.get_rejections();
        assert_eq!(rejections.get("schema_mismatch"), Some(&2));
        assert_eq!(rejections.get("parse_error"), Some(&1));

        let text = metrics.render_prometheus();
        assert!(text.contains("fraud_dashboard_rejections_total{kind=\"schema_mismatch\"} 2"));
        assert!(text.contains("fraud_dashboard_vectors_scored_total 0"));
    }
}
