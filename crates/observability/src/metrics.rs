//! Analysis metrics collection
//!
//! Publishes per-session results through the `metrics` facade and
//! aggregates them in memory for an end-of-run summary.

use std::collections::BTreeMap;

use contracts::{AnalysisReport, MetricKind};
use metrics::{counter, gauge, histogram};

/// Record one finished session.
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_analysis_metrics;
///
/// let report = pipeline::analyze(&blueprint)?;
/// record_analysis_metrics(&report);
/// ```
pub fn record_analysis_metrics(report: &AnalysisReport) {
    counter!("entrainment_sessions_total", "status" => "ok").increment(1);

    histogram!("entrainment_window_seconds").record(report.window.1 - report.window.0);
    gauge!("entrainment_session_boundary_queries").set(report.boundary_queries as f64);

    for speaker in &report.speakers {
        gauge!(
            "entrainment_speaker_retained_observations",
            "speaker" => speaker.speaker.to_string()
        )
        .set(speaker.retained as f64);

        if speaker.outliers > 0 {
            counter!(
                "entrainment_speaker_outliers_total",
                "speaker" => speaker.speaker.to_string()
            )
            .increment(speaker.outliers as u64);
        }
    }

    for (kind, value) in &report.metrics {
        if value.is_finite() {
            gauge!("entrainment_session_metric", "metric" => kind.as_str()).set(*value);
        } else {
            counter!("entrainment_metric_undefined_total", "metric" => kind.as_str()).increment(1);
        }
    }

    if let Some(delta) = report.synchrony_delta {
        histogram!("entrainment_synchrony_delta_seconds").record(delta);
    }
}

/// Record a session that failed, labelled with its error class
pub fn record_session_failure(class: &str) {
    counter!(
        "entrainment_sessions_total",
        "status" => "failed",
        "class" => class.to_string()
    )
    .increment(1);
}

/// Aggregates reports across sessions
#[derive(Debug, Clone, Default)]
pub struct AnalysisAggregator {
    /// Sessions analysed successfully
    pub total_sessions: u64,

    /// Sessions that failed
    pub failed_sessions: u64,

    /// Outliers removed, all speakers
    pub total_outliers: u64,

    /// Absent-valued observations discarded, all speakers
    pub total_discarded: u64,

    /// Extrapolated sample points
    pub total_boundary_queries: u64,

    /// Finite values per metric
    pub metric_stats: BTreeMap<MetricKind, RunningStats>,

    /// NaN results per metric
    pub undefined_counts: BTreeMap<MetricKind, u64>,

    /// Selected synchrony lags
    pub delta_stats: RunningStats,

    /// Evaluation window lengths (seconds)
    pub window_stats: RunningStats,
}

impl AnalysisAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one report into the totals
    pub fn update(&mut self, report: &AnalysisReport) {
        self.total_sessions += 1;
        self.total_boundary_queries += report.boundary_queries as u64;

        for speaker in &report.speakers {
            self.total_outliers += speaker.outliers as u64;
            self.total_discarded += speaker.discarded_absent as u64;
        }

        for (kind, value) in &report.metrics {
            if value.is_finite() {
                self.metric_stats.entry(*kind).or_default().push(*value);
            } else {
                *self.undefined_counts.entry(*kind).or_insert(0) += 1;
            }
        }

        if let Some(delta) = report.synchrony_delta {
            self.delta_stats.push(delta);
        }
        self.window_stats.push(report.window.1 - report.window.0);
    }

    pub fn record_failure(&mut self) {
        self.failed_sessions += 1;
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_sessions: self.total_sessions,
            failed_sessions: self.failed_sessions,
            total_outliers: self.total_outliers,
            total_discarded: self.total_discarded,
            total_boundary_queries: self.total_boundary_queries,
            metrics: self
                .metric_stats
                .iter()
                .map(|(kind, stats)| (*kind, StatsSummary::from(stats)))
                .collect(),
            undefined_counts: self.undefined_counts.clone(),
            synchrony_delta: StatsSummary::from(&self.delta_stats),
            window_seconds: StatsSummary::from(&self.window_stats),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Aggregated summary of a run
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_sessions: u64,
    pub failed_sessions: u64,
    pub total_outliers: u64,
    pub total_discarded: u64,
    pub total_boundary_queries: u64,
    pub metrics: BTreeMap<MetricKind, StatsSummary>,
    pub undefined_counts: BTreeMap<MetricKind, u64>,
    pub synchrony_delta: StatsSummary,
    pub window_seconds: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Entrainment Summary ===")?;
        writeln!(
            f,
            "Sessions: {} ok, {} failed",
            self.total_sessions, self.failed_sessions
        )?;
        writeln!(f, "Outliers removed: {}", self.total_outliers)?;
        writeln!(f, "Absent values discarded: {}", self.total_discarded)?;
        writeln!(f, "Extrapolated samples: {}", self.total_boundary_queries)?;
        writeln!(f, "Window (s): {}", self.window_seconds)?;

        for (kind, stats) in &self.metrics {
            writeln!(f, "{kind}: {stats}")?;
        }
        for (kind, count) in &self.undefined_counts {
            writeln!(f, "{kind} undefined (NaN): {count}")?;
        }
        if self.synchrony_delta.count > 0 {
            writeln!(f, "Synchrony delta (s): {}", self.synchrony_delta)?;
        }

        Ok(())
    }
}

/// Descriptive statistics snapshot
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.4}, max={:.4}, mean={:.4}, std={:.4} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
