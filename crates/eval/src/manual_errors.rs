use model::{Label, Labels, PairId};
use tracing::{info, warn};

use crate::metric::{ratio, Metric};
use crate::{get_discrete_labels, EvalError, EvaluationMode};

/// Kind of disagreement between prediction and (reconciled) ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FalsePositive,
    FalseNegative,
}

/// One misclassified pair, for manual inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationError {
    pub pair: PairId,
    pub kind: ErrorKind,
    pub predicted: Label,
    /// `None` when the ground truth was filled in by the evaluation mode.
    pub annotated: Option<Label>,
}

/// Reports misclassified pairs through `tracing` and scores the error rate.
///
/// Every false positive and false negative is collected; the first
/// `max_reported` of them are logged individually, the rest only counted.
#[derive(Debug, Clone, Copy)]
pub struct ManualErrors {
    max_reported: usize,
}

impl Default for ManualErrors {
    fn default() -> Self {
        Self { max_reported: 20 }
    }
}

impl ManualErrors {
    pub fn new(max_reported: usize) -> Self {
        Self { max_reported }
    }

    /// All misclassified pairs in reconciliation order.
    pub fn collect(
        &self,
        predicted: &Labels,
        ground_truth: &Labels,
        mode: EvaluationMode,
    ) -> Result<Vec<ClassificationError>, EvalError> {
        let labels = get_discrete_labels(predicted, ground_truth, mode)?;
        let mut errors = Vec::new();
        for (id, y_true, y_pred) in labels.iter() {
            let kind = match (y_true, y_pred) {
                (0, 1) => ErrorKind::FalsePositive,
                (1, 0) => ErrorKind::FalseNegative,
                _ => continue,
            };
            let predicted_label = predicted
                .get(id)
                .ok_or_else(|| EvalError::MissingPrediction(id.clone()))?;
            errors.push(ClassificationError {
                pair: id.clone(),
                kind,
                predicted: predicted_label,
                annotated: ground_truth.get(id),
            });
        }
        Ok(errors)
    }
}

impl Metric for ManualErrors {
    fn slug(&self) -> &str {
        "manual-errors"
    }

    fn evaluate(
        &self,
        predicted: &Labels,
        ground_truth: &Labels,
        mode: EvaluationMode,
    ) -> Result<f64, EvalError> {
        let errors = self.collect(predicted, ground_truth, mode)?;
        for error in errors.iter().take(self.max_reported) {
            warn!(
                argument_id = %error.pair.argument_id,
                key_point_id = %error.pair.key_point_id,
                kind = ?error.kind,
                predicted = error.predicted,
                annotated = ?error.annotated,
                "manual_error"
            );
        }

        let false_positives = errors
            .iter()
            .filter(|e| e.kind == ErrorKind::FalsePositive)
            .count();
        let total = crate::get_all_ids(predicted, ground_truth).len();
        info!(
            false_positives,
            false_negatives = errors.len() - false_positives,
            reported = errors.len().min(self.max_reported),
            pairs = total,
            mode = %mode,
            "manual_errors_summary"
        );
        Ok(ratio(errors.len(), total))
    }
}
