use model::Labels;

use crate::reconcile::DiscreteLabels;
use crate::{EvalError, EvaluationMode};

/// Scores predicted labels against ground truth.
///
/// Implementations obtain their labels through
/// [`get_discrete_labels`](crate::get_discrete_labels) so that every metric
/// agrees on what counts as a true / false positive / negative in a given
/// [`EvaluationMode`].
pub trait Metric: Send + Sync {
    /// Identifier for this metric; lowercase letters, digits and dashes only.
    fn slug(&self) -> &str;

    /// Score `predicted` against `ground_truth`.
    fn evaluate(
        &self,
        predicted: &Labels,
        ground_truth: &Labels,
        mode: EvaluationMode,
    ) -> Result<f64, EvalError>;
}

/// Confusion counts with `1` as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confusion {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl Confusion {
    pub fn from_labels(labels: &DiscreteLabels) -> Self {
        let mut counts = Confusion::default();
        for (_, y_true, y_pred) in labels.iter() {
            match (y_true, y_pred) {
                (1, 1) => counts.true_positives += 1,
                (0, 1) => counts.false_positives += 1,
                (1, 0) => counts.false_negatives += 1,
                _ => counts.true_negatives += 1,
            }
        }
        counts
    }

    /// The same counts with `0` treated as the positive class.
    pub fn inverted(self) -> Self {
        Confusion {
            true_positives: self.true_negatives,
            false_positives: self.false_negatives,
            true_negatives: self.true_positives,
            false_negatives: self.false_positives,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }
}

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
