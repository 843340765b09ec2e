//! Row types for the per-participant sensor and event tables.
//!
//! All z-score features are normalized upstream of this crate (zero mean,
//! unit variance per participant). Cells may be missing; a window is only
//! usable when every cell inside it is present.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One minute-resolution sensor reading.
///
/// Feature cells are `Option<f64>` because the upstream export leaves gaps
/// where a sensor dropped out; `None` maps to an empty CSV cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Timestamp of the reading (naive local time, one-minute nominal spacing)
    pub datetime: NaiveDateTime,
    pub activity_zscore: Option<f64>,
    pub cadence_zscore: Option<f64>,
    pub minute_ventilation_adjusted_zscore: Option<f64>,
    pub tidal_volume_adjusted_zscore: Option<f64>,
    pub heart_rate_zscore: Option<f64>,
    #[serde(rename = "RR_interval_zscore")]
    pub rr_interval_zscore: Option<f64>,
    pub hrv_zscore: Option<f64>,
}

impl SensorRecord {
    /// The seven upstream z-score features in canonical column order.
    pub fn zscores(&self) -> [Option<f64>; 7] {
        [
            self.activity_zscore,
            self.cadence_zscore,
            self.minute_ventilation_adjusted_zscore,
            self.tidal_volume_adjusted_zscore,
            self.heart_rate_zscore,
            self.rr_interval_zscore,
            self.hrv_zscore,
        ]
    }
}

/// A participant's full sensor trace, in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorTrace {
    pub records: Vec<SensorRecord>,
}

impl SensorTrace {
    pub fn new(records: Vec<SensorRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// First timestamp in the trace, if any.
    pub fn first_time(&self) -> Option<NaiveDateTime> {
        self.records.first().map(|r| r.datetime)
    }

    /// Last timestamp in the trace, if any.
    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.records.last().map(|r| r.datetime)
    }

    /// Whether timestamps are non-decreasing in file order.
    pub fn is_sorted(&self) -> bool {
        self.records
            .windows(2)
            .all(|pair| pair[0].datetime <= pair[1].datetime)
    }
}

/// Self-reported event timestamps (e.g. smoking episodes), in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventSeries {
    pub timestamps: Vec<NaiveDateTime>,
}

impl EventSeries {
    pub fn new(timestamps: Vec<NaiveDateTime>) -> Self {
        Self { timestamps }
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether any event falls within `[start, end)`.
    pub fn any_in_window(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.timestamps.iter().any(|&t| t >= start && t < end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn record(h: u32, m: u32) -> SensorRecord {
        SensorRecord {
            datetime: ts(h, m),
            activity_zscore: Some(0.1),
            cadence_zscore: Some(0.2),
            minute_ventilation_adjusted_zscore: Some(0.3),
            tidal_volume_adjusted_zscore: Some(0.4),
            heart_rate_zscore: Some(0.5),
            rr_interval_zscore: Some(0.6),
            hrv_zscore: Some(0.7),
        }
    }

    #[test]
    fn test_zscores_column_order() {
        let r = record(10, 0);
        let cols = r.zscores();
        assert_eq!(cols[0], Some(0.1));
        assert_eq!(cols[4], Some(0.5));
        assert_eq!(cols[6], Some(0.7));
    }

    #[test]
    fn test_trace_sorted_detection() {
        let sorted = SensorTrace::new(vec![record(10, 0), record(10, 1), record(10, 1)]);
        assert!(sorted.is_sorted());

        let unsorted = SensorTrace::new(vec![record(10, 5), record(10, 1)]);
        assert!(!unsorted.is_sorted());
    }

    #[test]
    fn test_events_window_membership() {
        let events = EventSeries::new(vec![ts(10, 3)]);

        // End bound is exclusive.
        assert!(events.any_in_window(ts(10, 0), ts(10, 5)));
        assert!(events.any_in_window(ts(10, 3), ts(10, 8)));
        assert!(!events.any_in_window(ts(9, 58), ts(10, 3)));
        assert!(!events.any_in_window(ts(10, 4), ts(10, 9)));
    }
}
