//! `compute` command implementation.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use contracts::{
    AnalysisReport, EntrainmentError, IntegrationMethod, MetricKind, NeighborBackend,
    SessionBlueprint,
};
use tracing::{error, info, warn};

use crate::cli::ComputeArgs;
use crate::error::CliError;
use crate::pipeline::{analyze, RunStats};

/// Session settings overridden from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub compute: Option<Vec<MetricKind>>,
    pub k: Option<usize>,
    pub granularity: Option<f64>,
    pub integration_method: Option<IntegrationMethod>,
    pub backend: Option<NeighborBackend>,
}

impl Overrides {
    /// Parse metric and integration names up front so a typo fails the run
    /// before any session is read.
    pub fn from_args(args: &ComputeArgs) -> Result<Self, CliError> {
        let compute = if args.metrics.is_empty() {
            None
        } else {
            let kinds = args
                .metrics
                .iter()
                .map(|name| name.parse::<MetricKind>())
                .collect::<Result<Vec<_>, EntrainmentError>>()
                .map_err(CliError::Override)?;
            Some(kinds)
        };

        let integration_method = args
            .integration_method
            .as_deref()
            .map(str::parse::<IntegrationMethod>)
            .transpose()
            .map_err(CliError::Override)?;

        Ok(Self {
            compute,
            k: args.k,
            granularity: args.granularity,
            integration_method,
            backend: args.backend.map(Into::into),
        })
    }

    /// Apply to a loaded session and re-check the result.
    pub fn apply(&self, blueprint: &mut SessionBlueprint) -> Result<(), CliError> {
        let analysis = &mut blueprint.analysis;
        if let Some(compute) = &self.compute {
            analysis.compute = compute.clone();
        }
        if let Some(k) = self.k {
            analysis.estimator.k = k;
        }
        if let Some(backend) = self.backend {
            analysis.estimator.backend = backend;
        }
        if let Some(granularity) = self.granularity {
            analysis.metrics.granularity = granularity;
        }
        if let Some(method) = self.integration_method {
            analysis.metrics.integration_method = method;
        }
        config_loader::validate(blueprint).map_err(CliError::Override)
    }
}

/// Execute the `compute` command
pub fn run_compute(args: &ComputeArgs) -> Result<()> {
    let overrides = Overrides::from_args(args)?;
    let mut stats = RunStats::new(args.configs.len());
    let mut reports = Vec::with_capacity(args.configs.len());
    let started = Instant::now();

    info!(sessions = args.configs.len(), "Computing entrainment metrics");

    for path in &args.configs {
        match compute_session(path, &overrides) {
            Ok(report) => {
                observability::record_analysis_metrics(&report);
                stats.record_success(&report);
                if !args.json {
                    print_report(&report);
                }
                reports.push(report);
            }
            Err(e) => {
                let class = e.class();
                observability::record_session_failure(class.as_str());
                stats.record_failure();
                error!(path = %path.display(), class = class.as_str(), error = %e, "Session failed");

                if args.fail_fast {
                    return Err(e.into());
                }
            }
        }
    }

    stats.duration = started.elapsed();

    if args.json {
        let json = if let [report] = reports.as_slice() {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string_pretty(&reports)?
        };
        println!("{json}");
    }

    if args.summary {
        stats.print_summary();
    }

    if stats.failed() > 0 {
        warn!(failed = stats.failed(), "Some sessions failed");
        return Err(CliError::SessionsFailed {
            failed: stats.failed(),
            total: args.configs.len(),
        }
        .into());
    }

    Ok(())
}

/// Load, override and analyse one session file
pub fn compute_session(path: &Path, overrides: &Overrides) -> Result<AnalysisReport, CliError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(CliError::session_not_found(display));
    }

    let mut blueprint = config_loader::SessionLoader::load_from_path(path)
        .map_err(|e| CliError::session_load(&display, e))?;
    overrides.apply(&mut blueprint)?;

    analyze(&blueprint).map_err(|e| CliError::analysis(&blueprint.session, e))
}

fn print_report(report: &AnalysisReport) {
    println!(
        "Session {} [{}] window {:.2}s - {:.2}s",
        report.session, report.feature, report.window.0, report.window.1
    );

    for speaker in &report.speakers {
        println!(
            "   ├─ {}: {} IPUs, {} retained, {} absent, {} outliers",
            speaker.speaker,
            speaker.ipus,
            speaker.retained,
            speaker.discarded_absent,
            speaker.outliers
        );
    }

    for (kind, value) in &report.metrics {
        match (kind, report.synchrony_delta) {
            (MetricKind::Synchrony, Some(delta)) => {
                println!("   ├─ {kind}: {value:.6} (delta {delta}s)")
            }
            _ => println!("   ├─ {kind}: {value:.6}"),
        }
    }
    println!("   └─ Extrapolated samples: {}", report.boundary_queries);
}
