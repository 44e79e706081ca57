//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{SessionBlueprint, SpeakerTrack};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Session info for JSON output
#[derive(Serialize)]
struct SessionInfo {
    version: String,
    session: String,
    analysis: AnalysisInfo,
    speakers: Vec<SpeakerInfo>,
}

#[derive(Serialize)]
struct AnalysisInfo {
    feature: String,
    metrics: Vec<String>,
    k: usize,
    max_deviations: f64,
    backend: String,
    granularity: f64,
    integration_method: String,
    deltas: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<f64>,
}

#[derive(Serialize)]
struct SpeakerInfo {
    id: String,
    ipu_count: usize,
    absent_values: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ipus: Vec<IpuInfo>,
}

#[derive(Serialize)]
struct IpuInfo {
    start: f64,
    end: f64,
    value: Option<f64>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading session info");

    if !args.config.exists() {
        anyhow::bail!("Session file not found: {}", args.config.display());
    }

    let blueprint = config_loader::SessionLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load session from {}", args.config.display()))?;

    if args.json {
        let info = build_session_info(&blueprint, args.ipus);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize session info")?;
        println!("{}", json);
    } else {
        print_session_info(&blueprint, args.ipus);
    }

    Ok(())
}

fn absent_values(track: &SpeakerTrack, feature: &str) -> usize {
    track
        .ipus
        .iter()
        .filter(|ipu| !matches!(ipu.features.get(feature), Some(Some(v)) if !v.is_nan()))
        .count()
}

/// Earliest start and latest end
fn span(track: &SpeakerTrack) -> Option<(f64, f64)> {
    let start = track.ipus.iter().map(|ipu| ipu.start).reduce(f64::min)?;
    let end = track.ipus.iter().map(|ipu| ipu.end).reduce(f64::max)?;
    Some((start, end))
}

fn build_session_info(blueprint: &SessionBlueprint, with_ipus: bool) -> SessionInfo {
    let analysis = &blueprint.analysis;
    let feature = analysis.feature.as_str();

    let speakers = blueprint
        .speakers
        .iter()
        .map(|track| SpeakerInfo {
            id: track.id.to_string(),
            ipu_count: track.ipus.len(),
            absent_values: absent_values(track, feature),
            span: span(track),
            ipus: if with_ipus {
                contracts::order_by_start(track.ipus.clone())
                    .iter()
                    .map(|ipu| IpuInfo {
                        start: ipu.start,
                        end: ipu.end,
                        value: ipu.features.get(feature).copied().flatten(),
                    })
                    .collect()
            } else {
                Vec::new()
            },
        })
        .collect();

    SessionInfo {
        version: format!("{:?}", blueprint.version),
        session: blueprint.session.clone(),
        analysis: AnalysisInfo {
            feature: analysis.feature.clone(),
            metrics: analysis.compute.iter().map(ToString::to_string).collect(),
            k: analysis.estimator.k,
            max_deviations: analysis.estimator.max_deviations,
            backend: format!("{:?}", analysis.estimator.backend),
            granularity: analysis.metrics.granularity,
            integration_method: analysis.metrics.integration_method.to_string(),
            deltas: analysis.metrics.deltas.clone(),
            start: analysis.metrics.start,
            end: analysis.metrics.end,
        },
        speakers,
    }
}

fn print_session_info(blueprint: &SessionBlueprint, with_ipus: bool) {
    let info = build_session_info(blueprint, with_ipus);
    let analysis = &info.analysis;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                   Entrainment Session                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Session");
    println!("   ├─ Version: {}", info.version);
    println!("   └─ Name: {}", info.session);

    println!("\nAnalysis");
    println!("   ├─ Feature: {}", analysis.feature);
    println!("   ├─ Metrics: {}", analysis.metrics.join(", "));
    println!(
        "   ├─ Estimator: k = {}, outliers beyond {} sd, {} search",
        analysis.k, analysis.max_deviations, analysis.backend
    );
    println!("   ├─ Granularity: {}s", analysis.granularity);
    println!("   ├─ Integration: {}", analysis.integration_method);
    match (analysis.start, analysis.end) {
        (None, None) => println!("   ├─ Window: common support"),
        (start, end) => println!("   ├─ Window: {start:?} - {end:?}"),
    }
    println!("   └─ Deltas: {:?}", analysis.deltas);

    println!("\nSpeakers ({})", info.speakers.len());
    for (i, speaker) in info.speakers.iter().enumerate() {
        let is_last = i == info.speakers.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        let span = speaker
            .span
            .map(|(start, end)| format!("{start:.2}s - {end:.2}s"))
            .unwrap_or_else(|| "empty".to_string());
        println!(
            "   {} {} ({} IPUs, {} absent, {})",
            prefix, speaker.id, speaker.ipu_count, speaker.absent_values, span
        );

        for (j, ipu) in speaker.ipus.iter().enumerate() {
            let ipu_prefix = if j == speaker.ipus.len() - 1 { "└─" } else { "├─" };
            let value = ipu
                .value
                .map(|v| v.to_string())
                .unwrap_or_else(|| "absent".to_string());
            println!(
                "   {}  {} [{:.2}, {:.2}] {}",
                child_prefix, ipu_prefix, ipu.start, ipu.end, value
            );
        }
    }

    println!();
}
