//! Reconciliation of predicted and ground-truth labels.
//!
//! Every metric in this crate scores the **union** of pairs present in either
//! mapping, so a pair that was predicted but never annotated (or annotated
//! but never predicted) is still scored rather than silently dropped. The
//! union is turned into parallel `(y_true, y_pred)` vectors of `0`/`1` labels
//! by [`get_discrete_labels`]; metrics never re-derive their own notion of
//! "all pairs".

use std::collections::BTreeSet;

use model::{Label, Labels, PairId};
use tracing::debug;

use crate::{EvalError, EvaluationMode};

/// Labels at or above this value count as a match.
pub const MATCH_THRESHOLD: Label = 0.5;

/// Map a soft label to `1` (match) or `0` (no match).
pub fn discretize(label: Label) -> u8 {
    u8::from(label >= MATCH_THRESHOLD)
}

/// Union of the pairs present in `predicted` or `ground_truth`.
pub fn get_all_ids(predicted: &Labels, ground_truth: &Labels) -> BTreeSet<PairId> {
    predicted
        .keys()
        .chain(ground_truth.keys())
        .cloned()
        .collect()
}

/// Discrete labels for every reconciled pair, as parallel vectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscreteLabels {
    pub ids: Vec<PairId>,
    pub y_true: Vec<u8>,
    pub y_pred: Vec<u8>,
}

impl DiscreteLabels {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `(pair, y_true, y_pred)` triples in reconciliation order.
    pub fn iter(&self) -> impl Iterator<Item = (&PairId, u8, u8)> {
        self.ids
            .iter()
            .zip(self.y_true.iter().copied())
            .zip(self.y_pred.iter().copied())
            .map(|((id, t), p)| (id, t, p))
    }
}

/// Derive `(y_true, y_pred)` for every pair in [`get_all_ids`].
///
/// `y_pred` comes from `predicted` and must exist for every pair; a gap fails
/// with [`EvalError::MissingPrediction`]. `y_true` comes from `ground_truth`
/// when annotated, otherwise from [`EvaluationMode::missing_ground_truth`].
///
/// ```rust
/// use evaluation::{get_discrete_labels, EvaluationMode};
/// use model::Labels;
///
/// let predicted = Labels::try_from_pairs([(("a1", "k1"), 0.9), (("a1", "k2"), 0.3)]).unwrap();
/// let ground_truth = Labels::try_from_pairs([(("a1", "k1"), 1.0)]).unwrap();
///
/// let strict = get_discrete_labels(&predicted, &ground_truth, EvaluationMode::Strict).unwrap();
/// assert_eq!((strict.y_true, strict.y_pred), (vec![1, 0], vec![1, 0]));
///
/// let relaxed = get_discrete_labels(&predicted, &ground_truth, EvaluationMode::Relaxed).unwrap();
/// assert_eq!((relaxed.y_true, relaxed.y_pred), (vec![1, 1], vec![1, 0]));
/// ```
pub fn get_discrete_labels(
    predicted: &Labels,
    ground_truth: &Labels,
    mode: EvaluationMode,
) -> Result<DiscreteLabels, EvalError> {
    let ids = get_all_ids(predicted, ground_truth);
    let missing = mode.missing_ground_truth();

    let mut out = DiscreteLabels {
        ids: Vec::with_capacity(ids.len()),
        y_true: Vec::with_capacity(ids.len()),
        y_pred: Vec::with_capacity(ids.len()),
    };
    let mut unannotated = 0usize;

    for id in ids {
        let y_pred = predicted
            .get(&id)
            .map(discretize)
            .ok_or_else(|| EvalError::MissingPrediction(id.clone()))?;
        let y_true = match ground_truth.get(&id) {
            Some(label) => discretize(label),
            None => {
                unannotated += 1;
                missing
            }
        };
        out.ids.push(id);
        out.y_true.push(y_true);
        out.y_pred.push(y_pred);
    }

    debug!(
        pairs = out.len(),
        predicted = predicted.len(),
        ground_truth = ground_truth.len(),
        unannotated,
        mode = %mode,
        "labels_reconciled"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str, f64)]) -> Labels {
        Labels::try_from_pairs(pairs.iter().map(|&(a, k, v)| ((a, k), v))).unwrap()
    }

    #[test]
    fn union_of_disjoint_mappings_has_both_sizes() {
        let p = labels(&[("a1", "k1", 0.2), ("a1", "k2", 0.7), ("a2", "k1", 1.0)]);
        let g = labels(&[("a3", "k1", 1.0), ("a3", "k2", 0.0)]);
        assert_eq!(get_all_ids(&p, &g).len(), p.len() + g.len());
    }

    #[test]
    fn union_removes_duplicates() {
        let p = labels(&[("a1", "k1", 0.2), ("a1", "k2", 0.7)]);
        let g = labels(&[("a1", "k1", 1.0)]);
        assert_eq!(get_all_ids(&p, &g).len(), 2);
    }

    #[test]
    fn unannotated_pairs_follow_the_mode() {
        let p = labels(&[("a1", "k1", 0.9), ("a2", "k1", 0.1), ("a3", "k1", 0.6)]);
        let g = labels(&[("a1", "k1", 0.0)]);

        let strict = get_discrete_labels(&p, &g, EvaluationMode::Strict).unwrap();
        let relaxed = get_discrete_labels(&p, &g, EvaluationMode::Relaxed).unwrap();

        for (id, y_true, _) in strict.iter() {
            if !g.contains(id) {
                assert_eq!(y_true, 0, "strict default for {id}");
            }
        }
        for (id, y_true, _) in relaxed.iter() {
            if !g.contains(id) {
                assert_eq!(y_true, 1, "relaxed default for {id}");
            }
        }
        // The annotated pair keeps its own label in both modes.
        assert_eq!(strict.y_true[0], 0);
        assert_eq!(relaxed.y_true[0], 0);
    }

    #[test]
    fn missing_prediction_is_fatal() {
        let p = labels(&[("a1", "k1", 0.9)]);
        let g = labels(&[("a1", "k1", 1.0), ("a2", "k1", 1.0)]);
        for mode in [EvaluationMode::Strict, EvaluationMode::Relaxed] {
            assert_eq!(
                get_discrete_labels(&p, &g, mode).unwrap_err(),
                EvalError::MissingPrediction(PairId::new("a2", "k1"))
            );
        }
    }

    #[test]
    fn soft_labels_discretize_at_one_half() {
        assert_eq!(discretize(0.5), 1);
        assert_eq!(discretize(0.4999), 0);
        assert_eq!(discretize(1.0), 1);
        assert_eq!(discretize(0.0), 0);

        let p = labels(&[("a1", "k1", 0.5)]);
        let g = labels(&[("a1", "k1", 0.49)]);
        let d = get_discrete_labels(&p, &g, EvaluationMode::Strict).unwrap();
        assert_eq!((d.y_true, d.y_pred), (vec![0], vec![1]));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let p = labels(&[("a2", "k1", 0.9), ("a1", "k1", 0.1), ("a1", "k3", 0.5)]);
        let g = labels(&[("a1", "k1", 1.0), ("a9", "k9", 1.0)]);
        let p = Labels::try_from_pairs(
            p.iter()
                .map(|(id, v)| (id.clone(), v))
                .chain([(PairId::new("a9", "k9"), 0.8)]),
        )
        .unwrap();

        let first = get_discrete_labels(&p, &g, EvaluationMode::Relaxed).unwrap();
        let second = get_discrete_labels(&p, &g, EvaluationMode::Relaxed).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn empty_inputs_give_empty_labels() {
        let d = get_discrete_labels(&Labels::new(), &Labels::new(), EvaluationMode::Strict).unwrap();
        assert!(d.is_empty());
    }
}
