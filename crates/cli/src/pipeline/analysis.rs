//! Session analysis
//!
//! Turns one validated session into an `AnalysisReport`:
//! observations -> estimators -> evaluation window -> metrics.

use contracts::{
    AnalysisReport, AnnotatedFeatures, EntrainmentError, ObservationSet, Result,
    SessionBlueprint, SpeakerSummary, SpeakerTrack,
};
use std::collections::BTreeMap;
use time_series::{build_estimator, Estimator};
use tracing::instrument;

/// Analyse one session.
///
/// # Errors
/// Any estimator or metric error, unchanged. `InvalidInput` if the session
/// does not hold exactly two speakers.
#[instrument(
    name = "pipeline_analyze",
    skip(blueprint),
    fields(session = %blueprint.session, feature = %blueprint.analysis.feature)
)]
pub fn analyze(blueprint: &SessionBlueprint) -> Result<AnalysisReport> {
    let (track_a, track_b) = blueprint.speaker_pair().ok_or_else(|| {
        EntrainmentError::invalid_input(format!(
            "session needs exactly two speakers, found {}",
            blueprint.speakers.len()
        ))
    })?;
    let analysis = &blueprint.analysis;

    let a = fit(track_a, blueprint)?;
    let b = fit(track_b, blueprint)?;

    let window = entrainment::evaluation_window(&a, &b, &analysis.metrics)?;
    let outcomes = entrainment::evaluate_all(&analysis.compute, &a, &b, &analysis.metrics)?;

    let mut metrics = BTreeMap::new();
    let mut synchrony_delta = None;
    let mut boundary_queries = 0;
    for outcome in outcomes {
        if outcome.delta.is_some() {
            synchrony_delta = outcome.delta;
        }
        boundary_queries = outcome.boundary_queries;
        metrics.insert(outcome.kind, outcome.value);
    }

    tracing::info!(
        metrics = metrics.len(),
        start = window.start,
        end = window.end,
        "session analysed"
    );

    Ok(AnalysisReport {
        session: blueprint.session.clone(),
        feature: analysis.feature.clone(),
        window: (window.start, window.end),
        speakers: vec![summarize(track_a, &a), summarize(track_b, &b)],
        metrics,
        synchrony_delta,
        boundary_queries,
    })
}

fn fit(track: &SpeakerTrack, blueprint: &SessionBlueprint) -> Result<Estimator> {
    let feature = &blueprint.analysis.feature;
    let observations = ObservationSet::from_units(&track.ipus, feature, &AnnotatedFeatures)?;
    let estimator = build_estimator(&observations, feature, &blueprint.analysis.estimator)?;

    tracing::debug!(
        speaker = %track.id,
        retained = estimator.observations().len(),
        outliers = estimator.outlier_count(),
        "speaker estimator ready"
    );
    Ok(estimator)
}

fn summarize(track: &SpeakerTrack, estimator: &Estimator) -> SpeakerSummary {
    SpeakerSummary {
        speaker: track.id.clone(),
        ipus: track.ipus.len(),
        retained: estimator.observations().len(),
        discarded_absent: estimator.discarded_count(),
        outliers: estimator.outlier_count(),
        domain: (estimator.start(), estimator.end()),
    }
}
