//! Sliding-window bag generation.
//!
//! Windows are `interval_minutes` wide and advance one minute at a time, so
//! consecutive windows overlap heavily. A window becomes a bag only when its
//! feature matrix is fully defined (no missing cells); a window that selects
//! zero rows is vacuously fully defined and is kept.

use chrono::{Duration, NaiveDateTime};

use crate::core::bag::{Bag, EVENT_LABEL, NO_EVENT_LABEL};
use crate::core::features::FeatureTable;
use crate::data::types::EventSeries;

/// Errors raised during bag generation.
#[derive(Debug)]
pub enum BagError {
    /// Sensor or event series is empty or carries no usable timestamps.
    EmptyTrace(String),
    /// Sensor timestamps are not in non-decreasing order.
    UnsortedTrace(String),
}

impl std::fmt::Display for BagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BagError::EmptyTrace(e) => write!(f, "empty trace: {e}"),
            BagError::UnsortedTrace(e) => write!(f, "unsorted trace: {e}"),
        }
    }
}

impl std::error::Error for BagError {}

/// Label a window: `1` if any event timestamp falls in `[start, end)`,
/// else `-1`. Event multiplicity inside the window is discarded.
pub fn label_window(start: NaiveDateTime, end: NaiveDateTime, events: &EventSeries) -> i8 {
    if events.any_in_window(start, end) {
        EVENT_LABEL
    } else {
        NO_EVENT_LABEL
    }
}

/// Builds labeled bags from one participant's feature table.
pub struct BagBuilder {
    interval: Duration,
}

impl BagBuilder {
    /// Create a builder with the given window width in minutes.
    pub fn new(interval_minutes: i64) -> Self {
        Self {
            interval: Duration::minutes(interval_minutes),
        }
    }

    /// Window width in whole minutes.
    pub fn interval_minutes(&self) -> i64 {
        self.interval.num_minutes()
    }

    /// Generate the chronological bag sequence for one participant.
    ///
    /// The first window starts at the first sensor timestamp; both bounds
    /// advance by exactly one minute per step for as long as the window
    /// still fits inside the trace (a trace of `n` uniform one-minute rows
    /// yields `n - interval + 1` candidate windows). Rows with any missing
    /// feature cell poison their window; such windows are skipped entirely.
    ///
    /// An interval longer than the trace span yields no windows at all;
    /// callers treat an empty result as a degenerate-window condition, not
    /// an error.
    pub fn generate_bags(
        &self,
        table: &FeatureTable,
        events: &EventSeries,
        participant_id: &str,
    ) -> Result<Vec<Bag>, BagError> {
        if table.is_empty() {
            return Err(BagError::EmptyTrace(format!(
                "participant {participant_id} has no sensor rows"
            )));
        }
        if events.is_empty() {
            return Err(BagError::EmptyTrace(format!(
                "participant {participant_id} has no event reports"
            )));
        }
        if !table.is_sorted() {
            return Err(BagError::UnsortedTrace(format!(
                "participant {participant_id} sensor timestamps are out of order"
            )));
        }

        // A window [start, end) fits while it does not reach past the final
        // reading's one-minute slot.
        let limit = table.timestamps[table.len() - 1] + Duration::minutes(1);
        let mut start = table.timestamps[0];
        let mut end = start + self.interval;

        let mut bags = Vec::new();
        while end <= limit {
            let row_indices = table.rows_in_window(start, end);

            // Keep the window only when every selected cell is present.
            let fully_defined = row_indices
                .iter()
                .all(|&i| table.rows[i].iter().all(|cell| cell.is_some()));

            if fully_defined {
                let instances: Vec<Vec<f64>> = row_indices
                    .iter()
                    .map(|&i| table.rows[i].iter().map(|cell| cell.unwrap()).collect())
                    .collect();

                bags.push(Bag::new(
                    participant_id,
                    start,
                    end,
                    instances,
                    label_window(start, end, events),
                    table.feature_names.clone(),
                ));
            }

            start += Duration::minutes(1);
            end += Duration::minutes(1);
        }

        Ok(bags)
    }
}
