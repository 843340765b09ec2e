//! Feature columns for bag construction.
//!
//! The seven z-score features arrive pre-normalized from the upstream
//! export. This module appends the derived `time_of_day` column and
//! assembles the per-row feature matrix the window builder slices from.

use chrono::{NaiveDateTime, Timelike};
use statrs::statistics::Statistics;

use crate::data::types::SensorTrace;

/// Upstream z-score feature columns, in canonical order.
pub const SENSOR_FEATURES: [&str; 7] = [
    "activity_zscore",
    "cadence_zscore",
    "minute_ventilation_adjusted_zscore",
    "tidal_volume_adjusted_zscore",
    "heart_rate_zscore",
    "RR_interval_zscore",
    "hrv_zscore",
];

/// Name of the derived time-of-day column.
pub const TIME_OF_DAY: &str = "time_of_day";

/// Ordered names of the full feature set, derived column included.
pub fn feature_names() -> Vec<String> {
    SENSOR_FEATURES
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(TIME_OF_DAY.to_string()))
        .collect()
}

/// Hour-of-day values min-max rescaled to [0,1].
///
/// The scaler is fit on this participant's full trace, so values are not
/// numerically comparable across participants. A trace confined to a single
/// hour rescales to all zeros.
pub fn derive_time_of_day(timestamps: &[NaiveDateTime]) -> Vec<f64> {
    if timestamps.is_empty() {
        return Vec::new();
    }

    let hours: Vec<f64> = timestamps.iter().map(|t| t.hour() as f64).collect();
    let min = Statistics::min(hours.iter());
    let max = Statistics::max(hours.iter());
    let range = max - min;

    hours
        .iter()
        .map(|&h| if range == 0.0 { 0.0 } else { (h - min) / range })
        .collect()
}

/// A participant's feature matrix: one row per sensor reading, one column
/// per feature, with gaps preserved as `None`.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub rows: Vec<Vec<Option<f64>>>,
    pub feature_names: Vec<String>,
}

impl FeatureTable {
    /// Assemble the feature matrix from a sensor trace, appending the
    /// derived time-of-day column.
    pub fn from_trace(trace: &SensorTrace) -> Self {
        let timestamps: Vec<NaiveDateTime> = trace.records.iter().map(|r| r.datetime).collect();
        let time_of_day = derive_time_of_day(&timestamps);

        let rows = trace
            .records
            .iter()
            .zip(time_of_day.iter())
            .map(|(record, &tod)| {
                let mut row: Vec<Option<f64>> = record.zscores().to_vec();
                row.push(Some(tod));
                row
            })
            .collect();

        Self {
            timestamps,
            rows,
            feature_names: feature_names(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether timestamps are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.timestamps.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Row indices with timestamps in `[start, end)`.
    pub fn rows_in_window(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<usize> {
        self.timestamps
            .iter()
            .enumerate()
            .filter(|(_, &t)| t >= start && t < end)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::SensorRecord;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn record(h: u32, m: u32, value: Option<f64>) -> SensorRecord {
        SensorRecord {
            datetime: ts(h, m),
            activity_zscore: value,
            cadence_zscore: value,
            minute_ventilation_adjusted_zscore: value,
            tidal_volume_adjusted_zscore: value,
            heart_rate_zscore: value,
            rr_interval_zscore: value,
            hrv_zscore: value,
        }
    }

    #[test]
    fn test_feature_names_order() {
        let names = feature_names();
        assert_eq!(names.len(), 8);
        assert_eq!(names[0], "activity_zscore");
        assert_eq!(names[7], "time_of_day");
    }

    #[test]
    fn test_time_of_day_scaling() {
        let timestamps = vec![ts(8, 0), ts(14, 0), ts(20, 0)];
        let scaled = derive_time_of_day(&timestamps);
        assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_time_of_day_single_hour() {
        // Zero range rescales to zero, matching the upstream scaler.
        let timestamps = vec![ts(9, 0), ts(9, 30), ts(9, 59)];
        assert_eq!(derive_time_of_day(&timestamps), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_from_trace_appends_time_of_day() {
        let trace = SensorTrace::new(vec![record(0, 0, Some(1.0)), record(23, 0, None)]);
        let table = FeatureTable::from_trace(&trace);

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].len(), 8);
        assert_eq!(table.rows[0][7], Some(0.0));
        assert_eq!(table.rows[1][7], Some(1.0));
        // Sensor gap survives into the matrix.
        assert_eq!(table.rows[1][0], None);
    }

    #[test]
    fn test_rows_in_window_bounds() {
        let trace = SensorTrace::new((0..5).map(|m| record(10, m, Some(0.0))).collect());
        let table = FeatureTable::from_trace(&trace);

        let rows = table.rows_in_window(ts(10, 1), ts(10, 4));
        assert_eq!(rows, vec![1, 2, 3]);
    }
}
