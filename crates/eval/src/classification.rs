//! Binary classification metrics over reconciled labels.
//!
//! Binary variants score the match class (`1`) only. Macro variants compute
//! the score for both classes and take the unweighted mean, so a matcher that
//! labels everything as a match is not rewarded for it.

use model::Labels;

use crate::metric::{Confusion, Metric};
use crate::{get_discrete_labels, EvalError, EvaluationMode};

/// How per-class scores are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Average {
    /// Score of the match class only.
    #[default]
    Binary,
    /// Mean of the match and no-match class scores.
    Macro,
}

fn confusion(
    predicted: &Labels,
    ground_truth: &Labels,
    mode: EvaluationMode,
) -> Result<Confusion, EvalError> {
    let labels = get_discrete_labels(predicted, ground_truth, mode)?;
    Ok(Confusion::from_labels(&labels))
}

fn averaged(counts: Confusion, average: Average, score: fn(&Confusion) -> f64) -> f64 {
    match average {
        Average::Binary => score(&counts),
        Average::Macro => (score(&counts) + score(&counts.inverted())) / 2.0,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Precision {
    average: Average,
}

impl Precision {
    pub fn binary() -> Self {
        Self {
            average: Average::Binary,
        }
    }

    pub fn macro_averaged() -> Self {
        Self {
            average: Average::Macro,
        }
    }
}

impl Metric for Precision {
    fn slug(&self) -> &str {
        match self.average {
            Average::Binary => "precision",
            Average::Macro => "macro-precision",
        }
    }

    fn evaluate(
        &self,
        predicted: &Labels,
        ground_truth: &Labels,
        mode: EvaluationMode,
    ) -> Result<f64, EvalError> {
        let counts = confusion(predicted, ground_truth, mode)?;
        Ok(averaged(counts, self.average, Confusion::precision))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Recall {
    average: Average,
}

impl Recall {
    pub fn binary() -> Self {
        Self {
            average: Average::Binary,
        }
    }

    pub fn macro_averaged() -> Self {
        Self {
            average: Average::Macro,
        }
    }
}

impl Metric for Recall {
    fn slug(&self) -> &str {
        match self.average {
            Average::Binary => "recall",
            Average::Macro => "macro-recall",
        }
    }

    fn evaluate(
        &self,
        predicted: &Labels,
        ground_truth: &Labels,
        mode: EvaluationMode,
    ) -> Result<f64, EvalError> {
        let counts = confusion(predicted, ground_truth, mode)?;
        Ok(averaged(counts, self.average, Confusion::recall))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct F1Score {
    average: Average,
}

impl F1Score {
    pub fn binary() -> Self {
        Self {
            average: Average::Binary,
        }
    }

    pub fn macro_averaged() -> Self {
        Self {
            average: Average::Macro,
        }
    }
}

impl Metric for F1Score {
    fn slug(&self) -> &str {
        match self.average {
            Average::Binary => "f1",
            Average::Macro => "macro-f1",
        }
    }

    fn evaluate(
        &self,
        predicted: &Labels,
        ground_truth: &Labels,
        mode: EvaluationMode,
    ) -> Result<f64, EvalError> {
        let counts = confusion(predicted, ground_truth, mode)?;
        Ok(averaged(counts, self.average, Confusion::f1))
    }
}

/// Fraction of reconciled pairs whose discrete labels agree.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy;

impl Metric for Accuracy {
    fn slug(&self) -> &str {
        "accuracy"
    }

    fn evaluate(
        &self,
        predicted: &Labels,
        ground_truth: &Labels,
        mode: EvaluationMode,
    ) -> Result<f64, EvalError> {
        Ok(confusion(predicted, ground_truth, mode)?.accuracy())
    }
}
