//! Hyperparameter search over a classifier seam.
//!
//! A deterministic grid stands in for the upstream search strategy; any
//! other strategy (random, Bayesian) can be substituted behind the same
//! fit-and-score loop without touching bag generation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::bag::Bag;
use crate::model::classifier::{build_classifier, HyperParams, ModelError};
use crate::model::metrics::{score, Metrics};

/// One named axis of the search grid.
#[derive(Debug, Clone)]
pub struct ParamAxis {
    pub name: String,
    pub values: Vec<f64>,
}

impl ParamAxis {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A cartesian hyperparameter grid.
#[derive(Debug, Clone, Default)]
pub struct SearchSpace {
    axes: Vec<ParamAxis>,
}

impl SearchSpace {
    pub fn new(axes: Vec<ParamAxis>) -> Self {
        Self { axes }
    }

    /// Default grid for a classifier kind.
    pub fn for_model(kind: &str) -> Self {
        match kind {
            "threshold" => Self::new(vec![
                ParamAxis::new(
                    "feature_index",
                    (0..8).map(|i| i as f64).collect(),
                ),
                ParamAxis::new("threshold", vec![-1.0, -0.5, 0.0, 0.5, 1.0]),
            ]),
            // Models without hyperparameters search a single empty setting.
            _ => Self::default(),
        }
    }

    /// Enumerate up to `limit` settings in grid order.
    pub fn candidates(&self, limit: usize) -> Vec<HyperParams> {
        let mut settings = vec![HyperParams::new()];
        for axis in &self.axes {
            let mut expanded = Vec::with_capacity(settings.len() * axis.values.len());
            for setting in &settings {
                for &value in &axis.values {
                    expanded.push(setting.clone().set(axis.name.as_str(), value));
                }
            }
            settings = expanded;
        }

        settings.truncate(limit.max(1));
        settings
    }
}

/// Result of a hyperparameter search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentOutcome {
    pub model: String,
    pub best_params: HyperParams,
    pub best_metrics: ExperimentMetrics,
    pub evaluated: usize,
    pub train_bags: usize,
    pub holdout_bags: usize,
}

/// Serializable copy of the scoring metrics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExperimentMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl From<Metrics> for ExperimentMetrics {
    fn from(m: Metrics) -> Self {
        Self {
            precision: m.precision,
            recall: m.recall,
            f1: m.f1,
        }
    }
}

/// A fit-and-score loop over one model kind.
#[derive(Debug, Clone)]
pub struct Experiment {
    model_kind: String,
    iterations: usize,
    holdout_fraction: f64,
}

impl Experiment {
    pub fn new(model_kind: impl Into<String>, iterations: usize) -> Self {
        Self {
            model_kind: model_kind.into(),
            iterations,
            holdout_fraction: 0.2,
        }
    }

    /// Override the trailing holdout fraction used for scoring.
    pub fn with_holdout_fraction(mut self, fraction: f64) -> Self {
        self.holdout_fraction = fraction;
        self
    }

    /// Run the search: fit each candidate on the leading bags, score F1 on
    /// the trailing holdout, keep the best.
    pub fn run(&self, bags: &[Bag]) -> Result<ExperimentOutcome, ModelError> {
        if bags.len() < 2 {
            return Err(ModelError::EmptyTrainingSet);
        }

        let holdout_len =
            ((bags.len() as f64 * self.holdout_fraction).round() as usize).clamp(1, bags.len() - 1);
        let (fit_bags, holdout) = bags.split_at(bags.len() - holdout_len);
        let holdout_labels: Vec<i8> = holdout.iter().map(|b| b.label).collect();

        let candidates = SearchSpace::for_model(&self.model_kind).candidates(self.iterations);

        let mut best: Option<(HyperParams, Metrics)> = None;
        let mut evaluated = 0usize;
        for params in candidates {
            let mut model = build_classifier(&self.model_kind, &params)?;
            if let Err(e) = model.fit(fit_bags) {
                // A single bad setting (e.g. out-of-range feature index)
                // should not sink the search, but a structurally empty
                // training set always does.
                if matches!(e, ModelError::EmptyTrainingSet) {
                    return Err(e);
                }
                continue;
            }

            let predictions: Vec<i8> = holdout.iter().map(|b| model.predict(b)).collect();
            let metrics = score(&predictions, &holdout_labels);
            evaluated += 1;

            let improved = best
                .as_ref()
                .map(|(_, current)| metrics.f1 > current.f1)
                .unwrap_or(true);
            if improved {
                best = Some((params, metrics));
            }
        }

        let (best_params, best_metrics) = best.ok_or_else(|| {
            ModelError::InvalidParameter("no hyperparameter setting could be fit".to_string())
        })?;

        Ok(ExperimentOutcome {
            model: self.model_kind.clone(),
            best_params,
            best_metrics: best_metrics.into(),
            evaluated,
            train_bags: fit_bags.len(),
            holdout_bags: holdout.len(),
        })
    }
}

/// Write the winning configuration into an experiment output directory.
pub fn save_outcome(dir: impl AsRef<Path>, outcome: &ExperimentOutcome) -> std::io::Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(outcome).map_err(std::io::Error::other)?;
    std::fs::write(dir.join("best_config.json"), json)
}
