use std::cmp::Ordering;

use model::{Labels, PairId};

use crate::metric::Metric;
use crate::{get_discrete_labels, EvalError, EvaluationMode};

/// Mean average precision of each argument's best-scoring key point.
///
/// For every argument in the reconciled id set, the key point with the
/// highest predicted label is selected (ties go to the smaller key point id).
/// The selections are ranked by predicted label, highest first, and the
/// average precision of their reconciled `y_true` along that ranking is the
/// score. With `top_half` only the upper half of the ranking (at least one
/// selection) is scored, which is how the shared task reports it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAveragePrecision {
    top_half: bool,
}

impl MeanAveragePrecision {
    pub fn new() -> Self {
        Self { top_half: false }
    }

    pub fn top_half() -> Self {
        Self { top_half: true }
    }
}

struct Selection<'a> {
    id: &'a PairId,
    score: f64,
    y_true: u8,
}

impl Metric for MeanAveragePrecision {
    fn slug(&self) -> &str {
        if self.top_half {
            "map-top-half"
        } else {
            "map"
        }
    }

    fn evaluate(
        &self,
        predicted: &Labels,
        ground_truth: &Labels,
        mode: EvaluationMode,
    ) -> Result<f64, EvalError> {
        let labels = get_discrete_labels(predicted, ground_truth, mode)?;

        // Ids arrive sorted by argument, so each argument is one contiguous run.
        let mut selections: Vec<Selection<'_>> = Vec::new();
        for (id, y_true, _) in labels.iter() {
            let score = predicted
                .get(id)
                .ok_or_else(|| EvalError::MissingPrediction(id.clone()))?;
            match selections.last_mut() {
                Some(best) if best.id.argument_id == id.argument_id => {
                    if score > best.score {
                        *best = Selection { id, score, y_true };
                    }
                }
                _ => selections.push(Selection { id, score, y_true }),
            }
        }

        selections.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
        });

        if self.top_half && !selections.is_empty() {
            let keep = (selections.len() / 2).max(1);
            selections.truncate(keep);
        }

        Ok(average_precision(selections.iter().map(|s| s.y_true)))
    }
}

/// Average of precision@k over the ranks `k` holding a relevant item.
fn average_precision(ranked: impl Iterator<Item = u8>) -> f64 {
    let mut hits = 0usize;
    let mut precision_sum = 0.0;
    for (rank, relevant) in ranked.enumerate() {
        if relevant == 1 {
            hits += 1;
            precision_sum += hits as f64 / (rank + 1) as f64;
        }
    }
    if hits == 0 {
        0.0
    } else {
        precision_sum / hits as f64
    }
}
