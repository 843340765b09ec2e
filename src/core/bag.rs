//! The labeled bag: the unit of training data.
//!
//! A bag groups every sensor reading inside one sliding time window and
//! carries a single label for the whole group (multi-instance learning).
//! Bags are created once by the builder and never mutated; single-instance
//! consumers derive a mean-pooled copy instead.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Label for a window that covers at least one reported event.
pub const EVENT_LABEL: i8 = 1;

/// Label for a window with no reported event.
///
/// This is a sentinel for "no event", not negative evidence; consumers must
/// not read it as a probability.
pub const NO_EVENT_LABEL: i8 = -1;

/// A labeled group of feature-vector instances from one time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bag {
    /// Participant the window was drawn from
    pub participant_id: String,
    /// Window start (inclusive)
    pub start_time: NaiveDateTime,
    /// Window end (exclusive); `end_time - start_time` is the bag interval
    pub end_time: NaiveDateTime,
    /// One row per sensor reading inside the window
    pub instances: Vec<Vec<f64>>,
    /// `1` if any event timestamp falls inside the window, else `-1`
    pub label: i8,
    /// Column names matching the instance matrix
    pub feature_names: Vec<String>,
}

impl Bag {
    pub fn new(
        participant_id: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        instances: Vec<Vec<f64>>,
        label: i8,
        feature_names: Vec<String>,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            start_time,
            end_time,
            instances,
            label,
            feature_names,
        }
    }

    /// Whether the bag covers a reported event.
    pub fn is_positive(&self) -> bool {
        self.label == EVENT_LABEL
    }

    /// Number of instance rows in the bag.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Window width in whole minutes.
    pub fn interval_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Calendar day-of-month of the window end, used by the day-out split.
    pub fn end_day(&self) -> u32 {
        self.end_time.day()
    }

    /// Column-wise mean of the instance matrix, or `None` for a bag with no
    /// rows.
    pub fn mean_instance(&self) -> Option<Vec<f64>> {
        if self.instances.is_empty() {
            return None;
        }

        let columns = self.instances[0].len();
        let mean = (0..columns)
            .map(|c| self.instances.iter().map(|row| row[c]).mean())
            .collect();
        Some(mean)
    }

    /// A copy of this bag collapsed to its single mean instance.
    ///
    /// Returns `None` for a bag with no rows; callers drop such bags before
    /// single-instance training.
    pub fn mean_pooled(&self) -> Option<Bag> {
        let mean = self.mean_instance()?;
        Some(Bag {
            participant_id: self.participant_id.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            instances: vec![mean],
            label: self.label,
            feature_names: self.feature_names.clone(),
        })
    }
}
