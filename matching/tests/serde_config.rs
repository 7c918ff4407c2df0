#![cfg(feature = "serde")]

use distance_matching::{
    DistanceCurve, DistanceMatchingError, DistanceMatchingSettings, MarkerKind, MotionStateMachine,
    PlaybackSettings,
};

#[test]
fn settings_load_with_defaults_for_missing_fields() {
    let settings: DistanceMatchingSettings =
        serde_json::from_str(r#"{ "max_simulation_time": 1.5, "min_pivot_angle": 2.0 }"#)
            .expect("valid settings json");

    assert_eq!(settings.max_simulation_time, 1.5);
    assert_eq!(settings.min_pivot_angle, 2.0);
    assert_eq!(
        settings.max_match_value,
        DistanceMatchingSettings::default().max_match_value
    );
    assert_eq!(settings.validate(), Ok(()));
}

#[test]
fn playback_settings_accept_an_optional_limit() {
    let settings: PlaybackSettings =
        serde_json::from_str(r#"{ "distance_limit": 0.75 }"#).expect("valid playback json");
    assert!(settings.enabled);
    assert_eq!(settings.distance_limit, Some(0.75));
}

#[test]
fn curves_are_validated_on_load() {
    let curve: DistanceCurve = serde_json::from_str(
        r#"{ "samples": [ { "time": 0.0, "value": -1.0 }, { "time": 0.5, "value": 0.0 } ] }"#,
    )
    .expect("monotone curve");
    assert_eq!(curve.sample_time(-0.5), 0.25);

    let err = serde_json::from_str::<DistanceCurve>(
        r#"{ "samples": [ { "time": 0.0, "value": 1.0 }, { "time": 0.5, "value": 0.0 } ] }"#,
    )
    .expect_err("decreasing curve is rejected");
    let expected = DistanceMatchingError::DecreasingDistance {
        index: 1,
        previous: 1.0,
        value: 0.0,
    };
    assert!(err.to_string().contains(&expected.to_string()));
}

#[test]
fn markers_serialize() {
    let machine = MotionStateMachine::default();
    let json = serde_json::to_value(machine.markers()).expect("markers serialize");
    let slots = json["slots"].as_array().expect("slot array");
    assert_eq!(slots.len(), MarkerKind::ALL.len());
}
