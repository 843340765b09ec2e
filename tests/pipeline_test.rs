//! Integration tests for the full bag-generation pipeline.

use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use smokesense::pipeline::{self, PipelineError, PipelineOptions};
use smokesense::report::RunReport;
use smokesense::store;

const SENSOR_HEADER: &str = ",datetime,activity_zscore,cadence_zscore,\
    minute_ventilation_adjusted_zscore,tidal_volume_adjusted_zscore,\
    heart_rate_zscore,RR_interval_zscore,hrv_zscore";

fn ts(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 3, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

/// Write one participant directory with a continuous minute-to-minute trace
/// and the given event timestamps.
fn write_participant(
    base: &Path,
    name: &str,
    start: NaiveDateTime,
    minutes: i64,
    events: &[NaiveDateTime],
) {
    let dir = base.join(name);
    std::fs::create_dir_all(dir.join("ema")).unwrap();

    let mut sensor_csv = String::from(SENSOR_HEADER);
    sensor_csv.push('\n');
    for i in 0..minutes {
        let t = start + Duration::minutes(i);
        let v = 0.1 * (i % 7) as f64;
        sensor_csv.push_str(&format!(
            "{i},{},{v},{v},{v},{v},{v},{v},{v}\n",
            t.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    std::fs::write(dir.join("all_features_min-to-min.csv"), sensor_csv).unwrap();

    let mut events_csv = String::from(",datetime\n");
    for (i, t) in events.iter().enumerate() {
        events_csv.push_str(&format!("{i},{}\n", t.format("%Y-%m-%d %H:%M:%S")));
    }
    std::fs::write(dir.join("ema").join("smoking_reports.csv"), events_csv).unwrap();
}

fn options(base_dir: &Path, output_dir: &Path) -> PipelineOptions {
    PipelineOptions {
        base_dir: base_dir.to_path_buf(),
        bag_interval_minutes: 5,
        pct_test: 0.15,
        output_dir: output_dir.to_path_buf(),
        skip_failures: false,
    }
}

#[test]
fn test_two_participant_run_with_rebalance() {
    let base = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    // Participant 3001: 121 minutes across midnight. 117 windows; the 55
    // ending on day 7 form the smaller day with a positive, so day 7 is
    // held out.
    write_participant(
        base.path(),
        "participant_3001",
        ts(7, 23, 0),
        121,
        &[ts(7, 23, 10), ts(8, 0, 30)],
    );

    // Participant 3002: 91 minutes across the same midnight. 87 windows;
    // day 8 holds 32 of them and is held out.
    write_participant(
        base.path(),
        "participant_3002",
        ts(7, 23, 0),
        91,
        &[ts(7, 23, 10), ts(8, 0, 10)],
    );

    let report = RunReport::new();
    let outcome = pipeline::run(&options(base.path(), out.path()), &report).unwrap();

    // Pool: train 62 + 55, test 55 + 32. Participant 3001 owns the largest
    // test day, and its 55 bags sit under the 0.85 * 87 cap, so all of
    // them move to train.
    assert_eq!(outcome.train_count, 172);
    assert_eq!(outcome.test_count, 32);

    let train = store::load_bags(&outcome.train_path).unwrap();
    let test = store::load_bags(&outcome.test_path).unwrap();
    assert_eq!(train.len(), 172);
    assert_eq!(test.len(), 32);
    assert!(test.iter().all(|b| b.participant_id == "3002"));
    assert!(test.iter().all(|b| b.end_day() == 8));

    // Every bag keeps the exact window width and the full feature schema.
    assert!(train.iter().all(|b| b.interval_minutes() == 5));
    assert!(train.iter().all(|b| b.feature_names.len() == 8));

    let stats = report.stats();
    assert_eq!(stats.participants_processed, 2);
    assert_eq!(stats.train_bags, 172);
    assert_eq!(stats.test_bags, 32);
}

#[test]
fn test_failing_participant_aborts_by_default() {
    let base = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_participant(
        base.path(),
        "participant_3001",
        ts(7, 23, 0),
        121,
        &[ts(7, 23, 10), ts(8, 0, 30)],
    );
    // No event reports at all: bag generation fails for this participant.
    write_participant(base.path(), "participant_3002", ts(7, 23, 0), 91, &[]);

    let report = RunReport::new();
    let result = pipeline::run(&options(base.path(), out.path()), &report);

    match result {
        Err(PipelineError::Participant { participant, .. }) => {
            assert_eq!(participant, "3002");
        }
        other => panic!("expected participant failure, got {other:?}"),
    }
}

#[test]
fn test_failing_participant_skipped_on_request() {
    let base = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_participant(
        base.path(),
        "participant_3001",
        ts(7, 23, 0),
        121,
        &[ts(7, 23, 10), ts(8, 0, 30)],
    );
    write_participant(base.path(), "participant_3002", ts(7, 23, 0), 91, &[]);

    let mut opts = options(base.path(), out.path());
    opts.skip_failures = true;

    let report = RunReport::new();
    let outcome = pipeline::run(&opts, &report).unwrap();

    // Only participant 3001 contributes; its 55-bag test day stays put
    // because moving it is capped at 0.85 * 55 = 46.75 bags.
    assert_eq!(outcome.train_count + outcome.test_count, 117);
    assert_eq!(report.stats().participants_skipped, 1);
}

#[test]
fn test_exported_split_feeds_training() {
    let base = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_participant(
        base.path(),
        "participant_3001",
        ts(7, 23, 0),
        121,
        &[ts(7, 23, 10), ts(8, 0, 30)],
    );

    let report = RunReport::new();
    let outcome = pipeline::run(&options(base.path(), out.path()), &report).unwrap();

    let bags = store::load_bags(&outcome.train_path).unwrap();
    let experiment = smokesense::model::Experiment::new("majority", 1);
    let result = experiment.run(&bags).unwrap();
    assert_eq!(result.model, "majority");
    assert_eq!(result.evaluated, 1);
}

#[test]
fn test_empty_base_dir_is_error() {
    let base = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let report = RunReport::new();
    assert!(matches!(
        pipeline::run(&options(base.path(), out.path()), &report),
        Err(PipelineError::NoParticipants(_))
    ));
}
