//! Binary classification metrics over 1 / -1 labels.

/// Precision, recall, and F1 for the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Score predictions against reference labels.
///
/// Slices must be the same length. Degenerate denominators (no predicted or
/// no actual positives) yield zero rather than NaN.
pub fn score(predictions: &[i8], labels: &[i8]) -> Metrics {
    debug_assert_eq!(predictions.len(), labels.len());

    let mut true_positives = 0usize;
    let mut predicted_positives = 0usize;
    let mut actual_positives = 0usize;

    for (&pred, &label) in predictions.iter().zip(labels.iter()) {
        if pred == 1 {
            predicted_positives += 1;
        }
        if label == 1 {
            actual_positives += 1;
        }
        if pred == 1 && label == 1 {
            true_positives += 1;
        }
    }

    let precision = if predicted_positives == 0 {
        0.0
    } else {
        true_positives as f64 / predicted_positives as f64
    };
    let recall = if actual_positives == 0 {
        0.0
    } else {
        true_positives as f64 / actual_positives as f64
    };
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    Metrics {
        precision,
        recall,
        f1,
    }
}
