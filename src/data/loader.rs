//! CSV ingestion for participant data directories.
//!
//! The expected layout mirrors the export produced by the study collection
//! tooling: one directory per participant containing a minute-to-minute
//! sensor feature table and an `ema/` subdirectory with self-reported
//! smoking episodes.
//!
//! ```text
//! <base_dir>/
//!   participant_3017/
//!     all_features_min-to-min.csv
//!     ema/smoking_reports.csv
//!   participant_3022/
//!     ...
//! ```
//!
//! Both tables carry a leading unnamed index column, which is ignored.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::data::types::{EventSeries, SensorRecord, SensorTrace};

/// File name of the per-participant sensor feature table.
pub const SENSOR_FILE: &str = "all_features_min-to-min.csv";

/// Relative path of the per-participant event report table.
pub const EVENTS_FILE: &str = "ema/smoking_reports.csv";

/// Raw sensor row as it appears in the CSV, before timestamp parsing.
#[derive(Debug, Deserialize)]
struct SensorRow {
    datetime: String,
    activity_zscore: Option<f64>,
    cadence_zscore: Option<f64>,
    minute_ventilation_adjusted_zscore: Option<f64>,
    tidal_volume_adjusted_zscore: Option<f64>,
    heart_rate_zscore: Option<f64>,
    #[serde(rename = "RR_interval_zscore")]
    rr_interval_zscore: Option<f64>,
    hrv_zscore: Option<f64>,
}

/// Raw event row as it appears in the CSV.
#[derive(Debug, Deserialize)]
struct EventRow {
    datetime: String,
}

/// Errors raised while loading participant data.
#[derive(Debug)]
pub enum LoadError {
    Io(String),
    Csv(String),
    Timestamp(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {e}"),
            LoadError::Csv(e) => write!(f, "CSV error: {e}"),
            LoadError::Timestamp(e) => write!(f, "Timestamp error: {e}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Parse a timestamp as written by the upstream export.
///
/// Accepts `2019-03-07 14:22:00` and the ISO `T`-separated variant, with or
/// without fractional seconds.
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, LoadError> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw.trim(), format) {
            return Ok(parsed);
        }
    }

    Err(LoadError::Timestamp(format!(
        "unrecognized timestamp: {raw:?}"
    )))
}

/// Load a sensor feature table from a CSV file.
pub fn load_sensor_table(path: impl AsRef<Path>) -> Result<SensorTrace, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path.as_ref())
        .map_err(|e| LoadError::Io(e.to_string()))?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: SensorRow = row.map_err(|e| LoadError::Csv(e.to_string()))?;
        records.push(SensorRecord {
            datetime: parse_timestamp(&row.datetime)?,
            activity_zscore: row.activity_zscore,
            cadence_zscore: row.cadence_zscore,
            minute_ventilation_adjusted_zscore: row.minute_ventilation_adjusted_zscore,
            tidal_volume_adjusted_zscore: row.tidal_volume_adjusted_zscore,
            heart_rate_zscore: row.heart_rate_zscore,
            rr_interval_zscore: row.rr_interval_zscore,
            hrv_zscore: row.hrv_zscore,
        });
    }

    Ok(SensorTrace::new(records))
}

/// Load an event report table from a CSV file.
pub fn load_event_table(path: impl AsRef<Path>) -> Result<EventSeries, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path.as_ref())
        .map_err(|e| LoadError::Io(e.to_string()))?;

    let mut timestamps = Vec::new();
    for row in reader.deserialize() {
        let row: EventRow = row.map_err(|e| LoadError::Csv(e.to_string()))?;
        timestamps.push(parse_timestamp(&row.datetime)?);
    }

    Ok(EventSeries::new(timestamps))
}

/// Load both tables for one participant directory.
pub fn load_participant(dir: impl AsRef<Path>) -> Result<(SensorTrace, EventSeries), LoadError> {
    let dir = dir.as_ref();
    let trace = load_sensor_table(dir.join(SENSOR_FILE))?;
    let events = load_event_table(dir.join(EVENTS_FILE))?;
    Ok((trace, events))
}

/// Find participant directories under a base directory, in name order.
pub fn discover_participants(base_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, LoadError> {
    let entries = std::fs::read_dir(base_dir.as_ref()).map_err(|e| LoadError::Io(e.to_string()))?;

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with("participant"))
                    .unwrap_or(false)
        })
        .collect();

    dirs.sort();
    Ok(dirs)
}

/// Extract the participant identifier from a directory name.
///
/// `participant_3017` yields `3017`; names without an underscore are used
/// verbatim.
pub fn participant_id(dir_name: &str) -> String {
    dir_name
        .split_once('_')
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| dir_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SENSOR_HEADER: &str = ",datetime,activity_zscore,cadence_zscore,\
        minute_ventilation_adjusted_zscore,tidal_volume_adjusted_zscore,\
        heart_rate_zscore,RR_interval_zscore,hrv_zscore";

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2019-03-07 14:22:00").is_ok());
        assert!(parse_timestamp("2019-03-07T14:22:00").is_ok());
        assert!(parse_timestamp("2019-03-07 14:22:00.500").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_load_sensor_table_with_gaps() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "{SENSOR_HEADER}").unwrap();
        writeln!(
            file,
            "0,2019-03-07 14:22:00,0.1,0.2,0.3,0.4,0.5,0.6,0.7"
        )
        .unwrap();
        writeln!(file, "1,2019-03-07 14:23:00,0.1,,0.3,0.4,0.5,0.6,0.7").unwrap();

        let trace = load_sensor_table(file.path()).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.records[0].cadence_zscore, Some(0.2));
        assert_eq!(trace.records[1].cadence_zscore, None);
    }

    #[test]
    fn test_load_event_table() {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, ",datetime").unwrap();
        writeln!(file, "0,2019-03-07 15:02:00").unwrap();
        writeln!(file, "1,2019-03-08 09:41:00").unwrap();

        let events = load_event_table(file.path()).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_discover_participants_sorted() {
        let base = tempfile::tempdir().unwrap();
        std::fs::create_dir(base.path().join("participant_3022")).unwrap();
        std::fs::create_dir(base.path().join("participant_3017")).unwrap();
        std::fs::create_dir(base.path().join("notes")).unwrap();

        let dirs = discover_participants(base.path()).unwrap();
        let names: Vec<_> = dirs
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["participant_3017", "participant_3022"]);
    }

    #[test]
    fn test_participant_id_extraction() {
        assert_eq!(participant_id("participant_3017"), "3017");
        assert_eq!(participant_id("participant3"), "participant3");
    }
}
