//! End-to-end runs over report directories.

use std::fs;
use std::path::{Path, PathBuf};

use sensor_model::{
    InputFileSystem, MeasureValue, MeasurementSink, Metric, PersistError, ProjectContext,
    ResourceHandle, ResourceKind, Settings,
};
use sensor_surefire::{
    CollectOutcome, DEFAULT_REPORT_PATH, REPORT_PATH_KEY, SurefireError, SurefireParser,
    SurefireSensor, from_xml,
};

#[derive(Default)]
struct RecordingSink {
    measures: Vec<(ResourceHandle, Metric, MeasureValue)>,
    reject_resource: Option<String>,
}

impl RecordingSink {
    fn value(&self, key: &str, metric: Metric) -> Option<&MeasureValue> {
        self.measures
            .iter()
            .find(|(resource, m, _)| resource.key() == key && *m == metric)
            .map(|(_, _, value)| value)
    }

    fn number(&self, key: &str, metric: Metric) -> Option<f64> {
        self.value(key, metric).and_then(MeasureValue::as_number)
    }
}

impl MeasurementSink for RecordingSink {
    fn persist(
        &mut self,
        resource: &ResourceHandle,
        metric: Metric,
        value: MeasureValue,
    ) -> Result<(), PersistError> {
        if self.reject_resource.as_deref() == Some(resource.key()) {
            return Err(PersistError::UnknownResource {
                resource: resource.key().to_string(),
            });
        }
        self.measures.push((resource.clone(), metric, value));
        Ok(())
    }
}

/// Project tree with a fixed list of files.
struct FakeTree {
    base_dir: PathBuf,
    files: Vec<&'static str>,
}

impl InputFileSystem for FakeTree {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn has_language(&self, language: &str) -> bool {
        language == "objc" && !self.files.is_empty()
    }

    fn input_file(&self, relative_path: &Path) -> Option<ResourceHandle> {
        self.files
            .iter()
            .find(|file| Path::new(file) == relative_path)
            .map(|file| ResourceHandle::file(*file))
    }

    fn input_file_matching(&self, patterns: &[String]) -> Option<ResourceHandle> {
        patterns.iter().find_map(|pattern| {
            let suffix = pattern.trim_start_matches("**/");
            self.files
                .iter()
                .find(|file| *file == &suffix || file.ends_with(&format!("/{suffix}")))
                .map(|file| ResourceHandle::file(*file))
        })
    }
}

fn write_report(dir: &Path, name: &str, xml: &str) {
    fs::create_dir_all(dir).expect("create reports dir");
    fs::write(dir.join(name), xml).expect("write report");
}

fn by_name(class_name: &str) -> Option<ResourceHandle> {
    Some(ResourceHandle::file(format!("{class_name}.m")).into_unit_test())
}

fn collect(project_dir: &Path, sink: &mut RecordingSink) -> CollectOutcome {
    let project = ProjectContext::root("app", project_dir);
    SurefireParser::new(&by_name).collect(&project, &project_dir.join("sonar-reports"), sink)
}

#[test]
fn passed_and_skipped_tests_become_measures() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_report(
        &dir.path().join("sonar-reports"),
        "TEST-Foo.xml",
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <testsuite name="Foo" tests="4">
          <testcase classname="Foo" name="testA" time="0.010"/>
          <testcase classname="Foo" name="testB" time="0.020"/>
          <testcase classname="Foo" name="testC" time="0.030"/>
          <testcase classname="Foo" name="testD" time="0.500"><skipped/></testcase>
        </testsuite>"#,
    );
    let mut sink = RecordingSink::default();

    let outcome = collect(dir.path(), &mut sink);

    assert_eq!(outcome.parsed_files, 1);
    assert_eq!(outcome.saved.saved_classes, 1);
    assert_eq!(sink.number("Foo.m", Metric::SkippedTests), Some(1.0));
    assert_eq!(sink.number("Foo.m", Metric::Tests), Some(3.0));
    assert_eq!(sink.number("Foo.m", Metric::TestErrors), Some(0.0));
    assert_eq!(sink.number("Foo.m", Metric::TestFailures), Some(0.0));
    assert_eq!(sink.number("Foo.m", Metric::TestExecutionTime), Some(60.0));
    assert_eq!(sink.number("Foo.m", Metric::TestSuccessDensity), Some(100.0));
    let (resource, _, _) = &sink.measures[0];
    assert_eq!(resource.kind(), ResourceKind::UnitTestFile);
}

#[test]
fn two_passed_one_skipped_counts_executed_tests() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_report(
        &dir.path().join("sonar-reports"),
        "TEST-Foo.xml",
        r#"<testsuite name="Foo">
          <testcase classname="Foo" name="a"/>
          <testcase classname="Foo" name="b"/>
          <testcase classname="Foo" name="c"><skipped/></testcase>
        </testsuite>"#,
    );
    let mut sink = RecordingSink::default();

    collect(dir.path(), &mut sink);

    assert_eq!(sink.number("Foo.m", Metric::SkippedTests), Some(1.0));
    assert_eq!(sink.number("Foo.m", Metric::Tests), Some(2.0));
    assert_eq!(sink.number("Foo.m", Metric::TestSuccessDensity), Some(100.0));
}

#[test]
fn results_for_one_class_across_files_are_combined() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let reports = dir.path().join("sonar-reports");
    write_report(
        &reports,
        "TEST-Bar1.xml",
        r#"<testsuite name="Bar"><testcase classname="Bar" name="a" time="1"/></testsuite>"#,
    );
    write_report(
        &reports,
        "TEST-Bar2.xml",
        r#"<testsuite name="Bar">
          <testcase classname="Bar" name="b" time="2"><failure message="no">trace</failure></testcase>
          <testcase classname="Bar" name="c" time="3"><error/></testcase>
        </testsuite>"#,
    );
    let mut sink = RecordingSink::default();

    collect(dir.path(), &mut sink);

    assert_eq!(sink.number("Bar.m", Metric::Tests), Some(3.0));
    assert_eq!(sink.number("Bar.m", Metric::TestFailures), Some(1.0));
    assert_eq!(sink.number("Bar.m", Metric::TestErrors), Some(1.0));
    assert_eq!(sink.number("Bar.m", Metric::TestExecutionTime), Some(6000.0));
    assert_eq!(sink.number("Bar.m", Metric::TestSuccessDensity), Some(33.3));
    let dump = sink
        .value("Bar.m", Metric::TestData)
        .and_then(MeasureValue::as_text)
        .expect("test data saved");
    assert_eq!(from_xml(dump).expect("dump is readable").tests(), 3);
}

#[test]
fn nested_classes_are_saved_on_their_enclosing_class() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_report(
        &dir.path().join("sonar-reports"),
        "TEST-Foo.xml",
        r#"<testsuite name="Foo">
          <testcase classname="Foo" name="outer"/>
          <testcase classname="Foo$Inner" name="inner"/>
        </testsuite>"#,
    );
    let mut sink = RecordingSink::default();

    collect(dir.path(), &mut sink);

    assert_eq!(sink.number("Foo.m", Metric::Tests), Some(2.0));
    assert!(sink.measures.iter().all(|(resource, _, _)| resource.key() == "Foo.m"));
    let dump = sink
        .value("Foo.m", Metric::TestData)
        .and_then(MeasureValue::as_text)
        .expect("test data saved");
    assert!(dump.contains(r#"name="Inner/inner""#));
}

#[test]
fn missing_reports_directory_saves_zero_tests_on_project() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut sink = RecordingSink::default();

    let outcome = collect(dir.path(), &mut sink);

    assert!(outcome.recorded_zero_tests);
    assert_eq!(outcome.report_files, 0);
    assert_eq!(sink.measures.len(), 1);
    let (resource, metric, value) = &sink.measures[0];
    assert_eq!(resource.kind(), ResourceKind::Project);
    assert_eq!(*metric, Metric::Tests);
    assert_eq!(value.as_number(), Some(0.0));
}

#[test]
fn projects_with_modules_save_nothing_without_reports() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut project = ProjectContext::root("app", dir.path());
    project.modules.push("core".into());
    let mut sink = RecordingSink::default();

    let outcome =
        SurefireParser::new(&by_name).collect(&project, &dir.path().join("sonar-reports"), &mut sink);

    assert!(!outcome.recorded_zero_tests);
    assert!(sink.measures.is_empty());
}

#[test]
fn a_malformed_report_does_not_stop_the_others() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let reports = dir.path().join("sonar-reports");
    write_report(
        &reports,
        "TEST-Bad.xml",
        r#"<testsuite name="Bad"><testcase classname="Bad" name="a"/><testcase classname="Bad" name="b" time="soon"/></testsuite>"#,
    );
    write_report(
        &reports,
        "TEST-Good.xml",
        r#"<testsuite name="Good"><testcase classname="Good" name="a"/></testsuite>"#,
    );
    let mut sink = RecordingSink::default();

    let outcome = collect(dir.path(), &mut sink);

    assert_eq!(outcome.report_files, 2);
    assert_eq!(outcome.parsed_files, 1);
    assert_eq!(outcome.failures.len(), 1);
    let SurefireError::Parse { path, .. } = &outcome.failures[0];
    assert!(path.ends_with("TEST-Bad.xml"));
    assert!(sink.value("Bad.m", Metric::Tests).is_none());
    assert_eq!(sink.number("Good.m", Metric::Tests), Some(1.0));
}

#[test]
fn infinite_test_times_fail_only_their_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let reports = dir.path().join("sonar-reports");
    write_report(
        &reports,
        "TEST-Foo.xml",
        r#"<testsuite name="Foo"><testcase classname="Foo" name="a" time="inf"/><testcase classname="Foo" name="b" time="1e300"/></testsuite>"#,
    );
    write_report(
        &reports,
        "TEST-Good.xml",
        r#"<testsuite name="Good"><testcase classname="Good" name="a" time="0.25"/></testsuite>"#,
    );
    let mut sink = RecordingSink::default();

    let outcome = collect(dir.path(), &mut sink);

    assert_eq!(outcome.parsed_files, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert!(sink.value("Foo.m", Metric::Tests).is_none());
    assert_eq!(sink.number("Good.m", Metric::TestExecutionTime), Some(250.0));
}

#[test]
fn trailing_garbage_fails_the_report() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let reports = dir.path().join("sonar-reports");
    write_report(
        &reports,
        "TEST-Foo.xml",
        r#"<testsuite name="Foo"><testcase classname="Foo" name="a"/></testsuite></bogus><<<"#,
    );
    let mut sink = RecordingSink::default();

    let outcome = collect(dir.path(), &mut sink);

    assert_eq!(outcome.parsed_files, 0);
    assert_eq!(outcome.failures.len(), 1);
    assert!(sink.value("Foo.m", Metric::Tests).is_none());
}

#[test]
fn a_rejected_class_does_not_stop_the_others() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_report(
        &dir.path().join("sonar-reports"),
        "TESTS-All.xml",
        r#"<testsuites>
          <testsuite name="A"><testcase classname="A" name="a"/></testsuite>
          <testsuite name="B"><testcase classname="B" name="b"/></testsuite>
        </testsuites>"#,
    );
    let mut sink = RecordingSink {
        reject_resource: Some("A.m".into()),
        ..RecordingSink::default()
    };

    let outcome = collect(dir.path(), &mut sink);

    assert_eq!(outcome.saved.saved_classes, 2);
    assert_eq!(outcome.saved.rejected_measures, 7);
    assert_eq!(sink.number("B.m", Metric::Tests), Some(1.0));
}

#[test]
fn sensor_resolves_classes_to_project_files() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_report(
        &dir.path().join("build/test-reports"),
        "TEST-suite.xml",
        r#"<testsuite name="AppTests">
          <testcase classname="AppTests" name="a"/>
          <testcase classname="NSString_ExtrasTests" name="b"/>
          <testcase classname="Ghost" name="c"/>
        </testsuite>"#,
    );
    let tree = FakeTree {
        base_dir: dir.path().to_path_buf(),
        files: vec!["Tests/AppTests.m", "Tests/NSString+ExtrasTests.m", "App/main.m"],
    };
    let settings = Settings::new().with(REPORT_PATH_KEY, "build/test-reports");
    let sensor = SurefireSensor::new(&tree, &settings);
    let project = ProjectContext::root("app", dir.path());
    let mut sink = RecordingSink::default();

    assert!(sensor.should_execute_on_project(&project));
    let outcome = sensor.analyse(&project, &mut sink);

    assert_eq!(outcome.saved.saved_classes, 2);
    assert_eq!(outcome.saved.unresolved_classes, 1);
    assert_eq!(sink.number("Tests/AppTests.m", Metric::Tests), Some(1.0));
    assert_eq!(sink.number("Tests/NSString+ExtrasTests.m", Metric::Tests), Some(1.0));
}

#[test]
fn sensor_defaults_and_activation() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let tree = FakeTree {
        base_dir: dir.path().to_path_buf(),
        files: Vec::new(),
    };
    let settings = Settings::new();
    let sensor = SurefireSensor::new(&tree, &settings);
    let mut module = ProjectContext::root("app", dir.path());

    assert_eq!(sensor.reports_dir(), dir.path().join(DEFAULT_REPORT_PATH));
    assert!(!sensor.should_execute_on_project(&module));
    module.is_root = false;
    assert!(!sensor.should_execute_on_project(&module));
    assert_eq!(sensor.to_string(), "Objective-C SurefireSensor");
}
