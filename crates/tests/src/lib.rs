//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Contract serialization snapshots
//! - Session file -> estimators -> metrics, without the CLI
//! - Run aggregation over several sessions

#[cfg(test)]
mod contract_tests {
    use contracts::{ConfigVersion, ErrorClass, IntegrationMethod, MetricKind, SessionBlueprint};

    #[test]
    fn test_minimal_session_defaults() {
        let blueprint: SessionBlueprint = serde_json::from_str(
            r#"{ "session": "minimal", "analysis": { "feature": "F0_MAX" }, "speakers": [] }"#,
        )
        .unwrap();
        assert_eq!(blueprint.version, ConfigVersion::V1);
        assert_eq!(blueprint.session, "minimal");
        assert_eq!(blueprint.analysis.compute.len(), 3);
        assert!((blueprint.analysis.metrics.granularity - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_metric_names_round_trip() {
        let kinds: Vec<MetricKind> =
            serde_json::from_str(r#"["proximity", "pearson", "synchrony"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![
                MetricKind::Proximity,
                MetricKind::Convergence,
                MetricKind::Synchrony
            ]
        );
        assert_eq!(
            serde_json::to_string(&kinds).unwrap(),
            r#"["proximity","convergence","synchrony"]"#
        );

        let method: IntegrationMethod = serde_json::from_str(r#""trapz""#).unwrap();
        assert_eq!(method, IntegrationMethod::Trapezoidal);
    }

    #[test]
    fn test_error_class_labels() {
        assert_eq!(ErrorClass::DataShape.as_str(), "data_shape");
        assert_eq!(ErrorClass::Configuration.as_str(), "configuration");
    }
}

#[cfg(test)]
mod e2e_tests {
    use config_loader::{ConfigFormat, SessionLoader};
    use contracts::{
        AnnotatedFeatures, ErrorClass, InterPausalUnit, MetricKind, NeighborBackend,
        ObservationSet, SessionBlueprint,
    };
    use entrainment::{evaluate_all, evaluation_window, MetricOutcome};
    use time_series::{build_estimator, Estimator};

    /// Two speakers in opposite phase: A rises 100 -> 200 -> 300 while B falls.
    const OPPOSITE_PHASE: &str = r#"
session = "opposite-phase"

[analysis]
feature = "F0_MAX"
compute = ["proximity", "convergence", "synchrony"]

[analysis.estimator]
k = 4

[[speakers]]
id = "A"
ipus = [
    { start = 0.0, end = 4.0, features = { F0_MAX = 100.003 } },
    { start = 8.0, end = 12.0, features = { F0_MAX = 200.002 } },
    { start = 16.0, end = 24.0, features = { F0_MAX = 300.002 } },
    { start = 28.0, end = 32.0, features = { F0_MAX = 100.003 } },
    { start = 36.0, end = 40.0, features = { F0_MAX = 200.002 } },
    { start = 44.0, end = 52.0, features = { F0_MAX = 300.002 } },
]

[[speakers]]
id = "B"
ipus = [
    { start = 0.0, end = 8.0, features = { F0_MAX = 300.002 } },
    { start = 12.0, end = 16.0, features = { F0_MAX = 200.002 } },
    { start = 20.0, end = 24.0, features = { F0_MAX = 100.003 } },
    { start = 28.0, end = 36.0, features = { F0_MAX = 300.002 } },
    { start = 40.0, end = 44.0, features = { F0_MAX = 200.002 } },
    { start = 48.0, end = 52.0, features = { F0_MAX = 100.003 } },
]
"#;

    fn load(toml: &str) -> SessionBlueprint {
        SessionLoader::load_from_str(toml, ConfigFormat::Toml).unwrap()
    }

    fn estimators(blueprint: &SessionBlueprint) -> (Estimator, Estimator) {
        let (a, b) = blueprint.speaker_pair().unwrap();
        let analysis = &blueprint.analysis;
        let fit = |ipus: &[InterPausalUnit]| {
            let set = ObservationSet::from_units(ipus, &analysis.feature, &AnnotatedFeatures)
                .unwrap();
            build_estimator(&set, &analysis.feature, &analysis.estimator).unwrap()
        };
        (fit(&a.ipus), fit(&b.ipus))
    }

    fn run(blueprint: &SessionBlueprint) -> Vec<MetricOutcome> {
        let (a, b) = estimators(blueprint);
        let analysis = &blueprint.analysis;
        evaluate_all(&analysis.compute, &a, &b, &analysis.metrics).unwrap()
    }

    #[test]
    fn test_e2e_opposite_phase_session() {
        let blueprint = load(OPPOSITE_PHASE);
        let (a, b) = estimators(&blueprint);

        let window = evaluation_window(&a, &b, &blueprint.analysis.metrics).unwrap();
        assert_eq!((window.start, window.end), (4.0, 48.0));

        let outcomes = run(&blueprint);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].kind, MetricKind::Proximity);
        assert!((outcomes[0].value + 0.011361).abs() < 1e-5);
        assert!((outcomes[1].value - 0.000224).abs() < 1e-5);
        assert!((outcomes[2].value + 0.92556).abs() < 1e-4);
        assert_eq!(outcomes[2].delta, Some(0.0));
        assert!(outcomes.iter().all(|o| o.boundary_queries == 0));
    }

    #[test]
    fn test_e2e_json_session_with_trapezoidal_integration() {
        let mut blueprint = load(OPPOSITE_PHASE);
        blueprint.analysis.compute = vec![MetricKind::Synchrony];
        let json = SessionLoader::to_json(&blueprint)
            .unwrap()
            .replace("\"montecarlo\"", "\"trapz\"");

        let reloaded = SessionLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        let outcomes = run(&reloaded);
        assert_eq!(outcomes.len(), 1);
        assert!((outcomes[0].value + 0.92554).abs() < 1e-4);
    }

    #[test]
    fn test_e2e_backends_agree() {
        let incremental = load(OPPOSITE_PHASE);
        let mut brute_force = incremental.clone();
        brute_force.analysis.estimator.backend = NeighborBackend::BruteForce;

        for (x, y) in run(&incremental).iter().zip(run(&brute_force).iter()) {
            assert_eq!(x.kind, y.kind);
            assert!((x.value - y.value).abs() < 1e-9, "{}: {} vs {}", x.kind, x.value, y.value);
            assert_eq!(x.delta, y.delta);
        }
    }

    #[test]
    fn test_e2e_absent_values_are_dropped() {
        let json = r#"{
            "session": "absent",
            "analysis": { "feature": "F0_MAX", "compute": ["proximity"], "estimator": { "k": 1 } },
            "speakers": [
                { "id": "A", "ipus": [
                    { "start": 0.0, "end": 1.0, "features": { "F0_MAX": 100.0 } },
                    { "start": 2.0, "end": 3.0, "features": { "F0_MAX": null } },
                    { "start": 4.0, "end": 5.0, "features": { "F0_MAX": 100.0 } }
                ] },
                { "id": "B", "ipus": [
                    { "start": 0.0, "end": 1.0, "features": { "F0_MAX": 90.0 } },
                    { "start": 4.0, "end": 5.0, "features": { "F0_MAX": 90.0 } }
                ] }
            ]
        }"#;
        let blueprint = SessionLoader::load_from_str(json, ConfigFormat::Json).unwrap();
        let (a, b) = estimators(&blueprint);

        assert_eq!(a.discarded_count(), 1);
        assert_eq!(a.observations().len(), 2);
        assert_eq!(b.discarded_count(), 0);

        let outcomes = run(&blueprint);
        assert!((outcomes[0].value + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_e2e_k_larger_than_track() {
        let mut blueprint = load(OPPOSITE_PHASE);
        blueprint.analysis.estimator.k = 7;

        let (a, _) = blueprint.speaker_pair().unwrap();
        let set =
            ObservationSet::from_units(&a.ipus, "F0_MAX", &AnnotatedFeatures).unwrap();
        let err = build_estimator(&set, "F0_MAX", &blueprint.analysis.estimator).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Configuration);
    }

    #[test]
    fn test_e2e_delta_beyond_window() {
        let mut blueprint = load(OPPOSITE_PHASE);
        blueprint.analysis.metrics.deltas = vec![0.0, 45.0];
        let (a, b) = estimators(&blueprint);

        let err = evaluate_all(&[MetricKind::Synchrony], &a, &b, &blueprint.analysis.metrics)
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::DataShape);
    }
}

#[cfg(test)]
mod aggregation_tests {
    use contracts::{AnalysisReport, MetricKind, SpeakerSummary};
    use observability::AnalysisAggregator;

    fn report(proximity: f64, synchrony: f64, delta: Option<f64>) -> AnalysisReport {
        let mut report = AnalysisReport {
            session: "s".to_string(),
            feature: "F0_MAX".to_string(),
            window: (4.0, 48.0),
            speakers: vec![SpeakerSummary {
                outliers: 1,
                discarded_absent: 2,
                ..Default::default()
            }],
            synchrony_delta: delta,
            boundary_queries: 3,
            ..Default::default()
        };
        report.metrics.insert(MetricKind::Proximity, proximity);
        report.metrics.insert(MetricKind::Synchrony, synchrony);
        report
    }

    #[test]
    fn test_aggregate_run() {
        let mut aggregator = AnalysisAggregator::new();
        aggregator.update(&report(-1.0, 0.5, Some(0.0)));
        aggregator.update(&report(-3.0, f64::NAN, None));
        aggregator.record_failure();

        let summary = aggregator.summary();
        assert_eq!(summary.total_sessions, 2);
        assert_eq!(summary.failed_sessions, 1);
        assert_eq!(summary.total_outliers, 2);
        assert_eq!(summary.total_discarded, 4);
        assert_eq!(summary.total_boundary_queries, 6);
        assert!((summary.metrics[&MetricKind::Proximity].mean + 2.0).abs() < 1e-12);
        assert_eq!(summary.undefined_counts[&MetricKind::Synchrony], 1);
        assert_eq!(summary.synchrony_delta.count, 1);

        let text = summary.to_string();
        assert!(text.contains("Sessions: 2 ok, 1 failed"));
    }
}
