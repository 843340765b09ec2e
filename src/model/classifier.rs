//! The classifier seam.
//!
//! Real models (random forests, SVM variants, boosted trees) live outside
//! this crate; everything here talks to them through the `BagClassifier`
//! trait. The two built-in classifiers are deliberately simple reference
//! implementations used for wiring, baselines, and tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::bag::{Bag, EVENT_LABEL, NO_EVENT_LABEL};

/// A flat, named hyperparameter assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HyperParams {
    values: BTreeMap<String, f64>,
}

impl HyperParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Errors raised by classifiers.
#[derive(Debug)]
pub enum ModelError {
    EmptyTrainingSet,
    UnknownModel(String),
    InvalidParameter(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::EmptyTrainingSet => write!(f, "training set is empty"),
            ModelError::UnknownModel(e) => write!(f, "unknown model: {e}"),
            ModelError::InvalidParameter(e) => write!(f, "invalid parameter: {e}"),
        }
    }
}

impl std::error::Error for ModelError {}

/// A model consuming labeled bags.
///
/// `fit` sees the full per-bag instance matrix; single-instance models are
/// fed mean-pooled bags by the caller rather than by this trait.
pub trait BagClassifier {
    fn name(&self) -> &'static str;
    fn fit(&mut self, bags: &[Bag]) -> Result<(), ModelError>;
    fn predict(&self, bag: &Bag) -> i8;
}

/// Predicts the most common training label for every bag.
#[derive(Debug)]
pub struct MajorityClass {
    majority: i8,
}

impl MajorityClass {
    pub fn new() -> Self {
        Self {
            majority: NO_EVENT_LABEL,
        }
    }
}

impl BagClassifier for MajorityClass {
    fn name(&self) -> &'static str {
        "majority"
    }

    fn fit(&mut self, bags: &[Bag]) -> Result<(), ModelError> {
        if bags.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let positives = bags.iter().filter(|b| b.is_positive()).count();
        self.majority = if positives * 2 > bags.len() {
            EVENT_LABEL
        } else {
            NO_EVENT_LABEL
        };
        Ok(())
    }

    fn predict(&self, _bag: &Bag) -> i8 {
        self.majority
    }
}

/// Thresholds the bag-level mean of one feature column.
///
/// Hyperparameters: `feature_index` (column into the bag's feature set) and
/// `threshold`. A bag with no rows predicts the no-event label.
#[derive(Debug)]
pub struct MeanThreshold {
    feature_index: usize,
    threshold: f64,
}

impl MeanThreshold {
    pub fn new(params: &HyperParams) -> Self {
        Self {
            feature_index: params.get_or("feature_index", 0.0) as usize,
            threshold: params.get_or("threshold", 0.0),
        }
    }
}

impl BagClassifier for MeanThreshold {
    fn name(&self) -> &'static str {
        "threshold"
    }

    fn fit(&mut self, bags: &[Bag]) -> Result<(), ModelError> {
        if bags.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let columns = bags
            .iter()
            .filter_map(|b| b.instances.first())
            .map(|row| row.len())
            .next()
            .unwrap_or(0);
        if self.feature_index >= columns {
            return Err(ModelError::InvalidParameter(format!(
                "feature_index {} out of range for {columns} columns",
                self.feature_index
            )));
        }
        Ok(())
    }

    fn predict(&self, bag: &Bag) -> i8 {
        match bag.mean_instance() {
            Some(mean) if mean[self.feature_index] >= self.threshold => EVENT_LABEL,
            _ => NO_EVENT_LABEL,
        }
    }
}

/// Construct a classifier by kind name.
pub fn build_classifier(
    kind: &str,
    params: &HyperParams,
) -> Result<Box<dyn BagClassifier>, ModelError> {
    match kind {
        "majority" => Ok(Box::new(MajorityClass::new())),
        "threshold" => Ok(Box::new(MeanThreshold::new(params))),
        other => Err(ModelError::UnknownModel(other.to_string())),
    }
}
