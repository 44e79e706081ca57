//! `validate` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::SessionBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SessionSummary>,
}

#[derive(Serialize)]
struct SessionSummary {
    session: String,
    feature: String,
    k: usize,
    metrics: Vec<String>,
    speakers: Vec<String>,
    ipu_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(sessions = args.configs.len(), "Validating session files");

    let results: Vec<ValidationResult> = args
        .configs
        .iter()
        .map(|path| validate_session(path))
        .collect();

    if args.json {
        let json = if let [result] = results.as_slice() {
            serde_json::to_string_pretty(result)
        } else {
            serde_json::to_string_pretty(&results)
        }
        .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        for result in &results {
            print_validation_result(result);
        }
    }

    let invalid = results.iter().filter(|r| !r.valid).count();
    if invalid == 0 {
        Ok(())
    } else {
        anyhow::bail!("{invalid} of {} session files are invalid", results.len())
    }
}

fn validate_session(path: &Path) -> ValidationResult {
    let config_path = path.display().to_string();

    if !path.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", path.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::SessionLoader::load_from_path(path) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(SessionSummary {
                    session: blueprint.session.clone(),
                    feature: blueprint.analysis.feature.clone(),
                    k: blueprint.analysis.estimator.k,
                    metrics: blueprint
                        .analysis
                        .compute
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                    speakers: blueprint.speakers.iter().map(|s| s.id.to_string()).collect(),
                    ipu_count: blueprint.speakers.iter().map(|s| s.ipus.len()).sum(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect non-fatal issues: requests that will fail or degrade at compute time
fn collect_warnings(blueprint: &SessionBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();
    let analysis = &blueprint.analysis;
    let k = analysis.estimator.k;

    for track in &blueprint.speakers {
        let present = track
            .ipus
            .iter()
            .filter(|ipu| {
                matches!(ipu.features.get(&analysis.feature), Some(Some(v)) if !v.is_nan())
            })
            .count();
        let missing = track
            .ipus
            .iter()
            .filter(|ipu| !ipu.features.contains_key(&analysis.feature))
            .count();

        if missing > 0 {
            warnings.push(format!(
                "Speaker '{}': {missing} IPUs have no '{}' value annotated",
                track.id, analysis.feature
            ));
        }
        if present < k {
            warnings.push(format!(
                "Speaker '{}': only {present} present values for k = {k}",
                track.id
            ));
        }
    }

    let synchrony = analysis
        .compute
        .contains(&contracts::MetricKind::Synchrony);
    if synchrony && analysis.metrics.deltas.iter().all(|d| *d != 0.0) {
        warnings.push("Synchrony deltas do not include 0".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Session is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Session: {}", summary.session);
            println!("  Feature: {}", summary.feature);
            println!("  k: {}", summary.k);
            println!("  Metrics: {}", summary.metrics.join(", "));
            println!("  Speakers: {}", summary.speakers.join(", "));
            println!("  IPUs: {}", summary.ipu_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Session is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
