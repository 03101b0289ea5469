use model::PairId;
use thiserror::Error;

/// Errors raised while scoring predictions.
///
/// Missing *ground truth* is never an error: it is filled in according to the
/// [`EvaluationMode`](crate::EvaluationMode). Missing *predictions* are, since
/// they mean the matcher under test did not label a pair it was evaluated on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    /// A pair in the reconciled id set has no predicted label.
    #[error("no prediction for pair {0}; matchers must label every eligible pair")]
    MissingPrediction(PairId),
    #[error("invalid metric config: {0}")]
    InvalidConfig(String),
}
