//! Tests for sensor-model types.

use std::fs;

use sensor_model::{
    MeasureValue, Metric, ResourceHandle, Settings, SettingsError, TestStatus, UnitTestIndex,
    UnitTestResult,
};

#[test]
fn measure_values_serialize_untagged() {
    let number = serde_json::to_value(MeasureValue::Number(2.0)).expect("serialize number");
    assert_eq!(number, serde_json::json!(2.0));

    let text = serde_json::to_value(MeasureValue::from("<tests-details/>".to_string()))
        .expect("serialize text");
    assert_eq!(text, serde_json::json!("<tests-details/>"));
}

#[test]
fn handles_serialize_with_kind() {
    let handle = ResourceHandle::file("Classes/Foo.m").into_unit_test();
    let json = serde_json::to_value(&handle).expect("serialize handle");
    assert_eq!(
        json,
        serde_json::json!({ "key": "Classes/Foo.m", "kind": "unit_test_file" })
    );
    assert_eq!(
        serde_json::to_value(Metric::TestSuccessDensity).unwrap(),
        serde_json::json!("test_success_density")
    );
}

#[test]
fn results_for_one_class_accumulate_across_reports() {
    let mut first = UnitTestIndex::new();
    first
        .record_for("Bar")
        .add(UnitTestResult::new("testA", TestStatus::Success, 10))
        .add(UnitTestResult::new("testB", TestStatus::Failure, 20));
    let mut second = UnitTestIndex::new();
    second
        .record_for("Bar")
        .add(UnitTestResult::new("testC", TestStatus::Error, 5));

    first.absorb(second);

    let bar = first.get("Bar").expect("Bar indexed");
    assert_eq!(bar.tests(), 3);
    assert_eq!(bar.failures(), 1);
    assert_eq!(bar.errors(), 1);
    assert_eq!(bar.duration_milliseconds(), 35);
}

#[test]
fn settings_load_from_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("sensor.toml");
    fs::write(&path, "[sonar.junit]\nreportsPath = \"out/tests\"\n").expect("write settings");

    let settings = Settings::load(&path).expect("load settings");
    assert_eq!(settings.get_string("sonar.junit.reportsPath"), Some("out/tests"));
}

#[test]
fn settings_report_parse_errors_with_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[sonar.junit\n").expect("write settings");

    let error = Settings::load(&path).unwrap_err();
    assert!(matches!(error, SettingsError::Toml { .. }));
    assert!(error.to_string().contains("broken.toml"));
}
