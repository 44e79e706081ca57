//! Run statistics.

use std::time::Duration;

use contracts::AnalysisReport;
use observability::AnalysisAggregator;

/// Statistics from one `compute` run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Session files given on the command line
    pub sessions_requested: usize,

    /// Total duration of the run
    pub duration: Duration,

    /// Per-session results folded together
    pub aggregator: AnalysisAggregator,
}

impl RunStats {
    pub fn new(sessions_requested: usize) -> Self {
        Self {
            sessions_requested,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, report: &AnalysisReport) {
        self.aggregator.update(report);
    }

    pub fn record_failure(&mut self) {
        self.aggregator.record_failure();
    }

    pub fn succeeded(&self) -> u64 {
        self.aggregator.total_sessions
    }

    pub fn failed(&self) -> u64 {
        self.aggregator.failed_sessions
    }

    /// Sessions analysed per second
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (self.succeeded() + self.failed()) as f64 / secs
        } else {
            0.0
        }
    }

    /// Print detailed summary to stderr
    pub fn print_summary(&self) {
        eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
        eprintln!("║                      Run Statistics                          ║");
        eprintln!("╚══════════════════════════════════════════════════════════════╝\n");

        eprintln!("Overview");
        eprintln!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        eprintln!("   ├─ Sessions requested: {}", self.sessions_requested);
        eprintln!("   ├─ Succeeded: {}", self.succeeded());
        eprintln!("   ├─ Failed: {}", self.failed());
        eprintln!("   └─ Sessions/s: {:.2}", self.throughput());

        if self.succeeded() > 0 {
            eprintln!();
            eprint!("{}", self.aggregator.summary());
        }

        eprintln!();
    }
}
