use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EvalError;

/// How to treat pairs that have a prediction but no ground-truth annotation.
///
/// Shared-task ground truth is incomplete, so the two modes bound a metric's
/// sensitivity to that incompleteness from both sides:
///
/// - `Strict`: an unannotated pair counts as a confirmed non-match (`0`).
///   Positive predictions outside the annotated set are false positives.
/// - `Relaxed`: an unannotated pair counts as a match (`1`). Predictions
///   outside the annotated set are never penalized as false positives.
///
/// Not to be confused with the training-time label policy of the matcher
/// crate, which shares two of these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    #[default]
    Strict,
    Relaxed,
}

impl EvaluationMode {
    /// Discrete ground-truth label substituted for an unannotated pair.
    pub fn missing_ground_truth(self) -> u8 {
        match self {
            EvaluationMode::Strict => 0,
            EvaluationMode::Relaxed => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EvaluationMode::Strict => "strict",
            EvaluationMode::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluationMode {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(EvaluationMode::Strict),
            "relaxed" => Ok(EvaluationMode::Relaxed),
            other => Err(EvalError::InvalidConfig(format!(
                "evaluation mode must be one of [\"strict\", \"relaxed\"], got {other:?}"
            ))),
        }
    }
}
