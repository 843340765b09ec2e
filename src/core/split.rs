//! Train/test partitioning.
//!
//! Per participant, one calendar day is held out as the test set: the day
//! with the fewest bags among the days that carry at least one positive
//! label. After all participants are pooled, a single rebalancing pass
//! moves bags of the participant with the largest test day back into
//! training to push the overall test fraction toward the configured target.

use std::collections::BTreeMap;

use crate::core::bag::Bag;

/// Errors raised while partitioning bags.
#[derive(Debug)]
pub enum SplitError {
    /// No calendar day carries a positively labeled bag, so no day is
    /// eligible to be held out.
    NoPositiveDay(String),
}

impl std::fmt::Display for SplitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitError::NoPositiveDay(e) => write!(f, "no positive day: {e}"),
        }
    }
}

impl std::error::Error for SplitError {}

/// A train/test partition of a bag collection.
#[derive(Debug, Clone, Default)]
pub struct TrainTestSplit {
    pub train: Vec<Bag>,
    pub test: Vec<Bag>,
}

impl TrainTestSplit {
    /// Fraction of all bags that sit in the test set.
    pub fn test_fraction(&self) -> f64 {
        let total = self.train.len() + self.test.len();
        if total == 0 {
            return 0.0;
        }
        self.test.len() as f64 / total as f64
    }
}

/// Hold out one calendar day of bags as the test set.
///
/// Bags are grouped by the day-of-month of their window end. The held-out
/// day is the day with the fewest bags among days containing at least one
/// positive bag; ties go to the lowest day-of-month (days are visited in
/// ascending order with a strict comparison). Input order is preserved in
/// both halves.
pub fn leave_one_day_out(bags: Vec<Bag>) -> Result<TrainTestSplit, SplitError> {
    // BTreeMap gives the ascending day enumeration the tie-break relies on.
    let mut per_day: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
    for bag in &bags {
        let entry = per_day.entry(bag.end_day()).or_insert((0, 0));
        entry.0 += 1;
        if bag.is_positive() {
            entry.1 += 1;
        }
    }

    let mut held_out: Option<u32> = None;
    let mut shortest = usize::MAX;
    for (&day, &(count, positives)) in &per_day {
        if positives > 0 && count < shortest {
            shortest = count;
            held_out = Some(day);
        }
    }

    let held_out = held_out.ok_or_else(|| {
        SplitError::NoPositiveDay("no calendar day contains a positively labeled bag".to_string())
    })?;

    let (test, train): (Vec<Bag>, Vec<Bag>) =
        bags.into_iter().partition(|b| b.end_day() == held_out);

    Ok(TrainTestSplit { train, test })
}

/// Move bags of one participant from test to train to approach `pct_test`.
///
/// The cap on moved bags is `(1 - pct_test) * test.len()`, computed against
/// the test length before any moves. Only the designated participant's bags
/// are eligible, so the achieved fraction can land away from the target
/// when that participant runs out of bags. Move order follows test order.
pub fn rebalance_split(
    mut split: TrainTestSplit,
    participant_id: &str,
    pct_test: f64,
) -> TrainTestSplit {
    let cap = (1.0 - pct_test) * split.test.len() as f64;

    let mut moved: Vec<Bag> = Vec::new();
    let mut kept: Vec<Bag> = Vec::new();
    for bag in split.test {
        if bag.participant_id == participant_id && (moved.len() as f64) < cap {
            moved.push(bag);
        } else {
            kept.push(bag);
        }
    }

    split.train.extend(moved);
    split.test = kept;
    split
}
