//! Session validation
//!
//! Rules:
//! - exactly two speakers, distinct ids
//! - non-empty feature name and metric list
//! - k >= 1, max_deviations > 0, granularity > 0
//! - finite synchrony deltas
//! - explicit window has start < end
//! - every IPU has finite start < end; one speaker's IPUs do not overlap

use std::collections::HashSet;

use contracts::{EntrainmentError, InterPausalUnit, SessionBlueprint, SpeakerTrack};

/// Validate a parsed session.
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &SessionBlueprint) -> Result<(), EntrainmentError> {
    validate_speakers(blueprint)?;
    validate_analysis(blueprint)?;
    for track in &blueprint.speakers {
        validate_ipus(track)?;
    }
    Ok(())
}

fn validate_speakers(blueprint: &SessionBlueprint) -> Result<(), EntrainmentError> {
    if blueprint.speakers.len() != 2 {
        return Err(EntrainmentError::config_validation(
            "speakers",
            format!(
                "exactly two speakers required, got {}",
                blueprint.speakers.len()
            ),
        ));
    }

    let mut seen = HashSet::new();
    for track in &blueprint.speakers {
        if track.id.is_empty() {
            return Err(EntrainmentError::config_validation(
                "speakers[].id",
                "speaker id cannot be empty",
            ));
        }
        if !seen.insert(&track.id) {
            return Err(EntrainmentError::config_validation(
                format!("speakers[id={}]", track.id),
                "duplicate speaker id",
            ));
        }
    }
    Ok(())
}

fn validate_analysis(blueprint: &SessionBlueprint) -> Result<(), EntrainmentError> {
    let analysis = &blueprint.analysis;

    if analysis.feature.trim().is_empty() {
        return Err(EntrainmentError::config_validation(
            "analysis.feature",
            "feature name cannot be empty",
        ));
    }
    if analysis.compute.is_empty() {
        return Err(EntrainmentError::config_validation(
            "analysis.compute",
            "at least one metric is required",
        ));
    }

    let estimator = &analysis.estimator;
    if estimator.k == 0 {
        return Err(EntrainmentError::config_validation(
            "analysis.estimator.k",
            "k must be >= 1",
        ));
    }
    if !estimator.max_deviations.is_finite() || estimator.max_deviations <= 0.0 {
        return Err(EntrainmentError::config_validation(
            "analysis.estimator.max_deviations",
            format!(
                "max_deviations must be > 0, got {}",
                estimator.max_deviations
            ),
        ));
    }

    let metrics = &analysis.metrics;
    if !metrics.granularity.is_finite() || metrics.granularity <= 0.0 {
        return Err(EntrainmentError::config_validation(
            "analysis.metrics.granularity",
            format!("granularity must be > 0, got {}", metrics.granularity),
        ));
    }
    if let Some(idx) = metrics.deltas.iter().position(|d| !d.is_finite()) {
        return Err(EntrainmentError::config_validation(
            format!("analysis.metrics.deltas[{idx}]"),
            "synchrony delta must be finite",
        ));
    }
    for (field, bound) in [("start", metrics.start), ("end", metrics.end)] {
        if bound.is_some_and(|v| !v.is_finite()) {
            return Err(EntrainmentError::config_validation(
                format!("analysis.metrics.{field}"),
                "window bound must be finite",
            ));
        }
    }
    if let (Some(start), Some(end)) = (metrics.start, metrics.end) {
        if start >= end {
            return Err(EntrainmentError::config_validation(
                "analysis.metrics.start / analysis.metrics.end",
                format!("start ({start}) must be < end ({end})"),
            ));
        }
    }

    Ok(())
}

fn validate_ipus(track: &SpeakerTrack) -> Result<(), EntrainmentError> {
    for (idx, ipu) in track.ipus.iter().enumerate() {
        if !ipu.start.is_finite() || !ipu.end.is_finite() || ipu.start >= ipu.end {
            return Err(EntrainmentError::config_validation(
                format!("speakers[{}].ipus[{idx}]", track.id),
                format!(
                    "IPU must have finite start < end, got [{}, {}]",
                    ipu.start, ipu.end
                ),
            ));
        }
    }

    let mut ordered: Vec<&InterPausalUnit> = track.ipus.iter().collect();
    ordered.sort_by(|a, b| a.start.total_cmp(&b.start));
    for pair in ordered.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(EntrainmentError::config_validation(
                format!("speakers[{}].ipus", track.id),
                format!(
                    "IPUs [{}, {}] and [{}, {}] overlap",
                    pair[0].start, pair[0].end, pair[1].start, pair[1].end
                ),
            ));
        }
    }
    Ok(())
}
