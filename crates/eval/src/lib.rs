//! KPMatch evaluation layer.
//!
//! Turns two possibly mismatched, sparse [`Labels`](model::Labels) mappings
//! (predictions and ground truth) into a single score.
//!
//! ## Reconciliation
//!
//! 1. [`get_all_ids`] takes the **union** of pairs present on either side.
//! 2. [`get_discrete_labels`] maps each pair to `(y_true, y_pred)` in `{0, 1}`,
//!    discretizing at `0.5`. Pairs without ground truth get the default of
//!    the chosen [`EvaluationMode`]; pairs without a prediction are an error.
//! 3. A [`Metric`] turns those vectors into a score.
//!
//! ## Metrics
//!
//! | Slug | Type |
//! |------|------|
//! | `precision`, `macro-precision` | [`Precision`] |
//! | `recall`, `macro-recall` | [`Recall`] |
//! | `f1`, `macro-f1` | [`F1Score`] |
//! | `accuracy` | [`Accuracy`] |
//! | `map`, `map-top-half` | [`MeanAveragePrecision`] |
//! | `manual-errors` | [`ManualErrors`] |
//!
//! ## Example
//!
//! ```
//! use evaluation::{EvaluationMode, F1Score, Metric};
//! use model::Labels;
//!
//! let predicted = Labels::try_from_pairs([(("a1", "k1"), 0.9), (("a1", "k2"), 0.3)]).unwrap();
//! let ground_truth = Labels::try_from_pairs([(("a1", "k1"), 1.0)]).unwrap();
//!
//! let f1 = F1Score::binary()
//!     .evaluate(&predicted, &ground_truth, EvaluationMode::Strict)
//!     .unwrap();
//! assert_eq!(f1, 1.0);
//! ```

mod classification;
mod error;
mod manual_errors;
mod map;
mod metric;
mod mode;
mod reconcile;

pub use crate::classification::{Accuracy, Average, F1Score, Precision, Recall};
pub use crate::error::EvalError;
pub use crate::manual_errors::{ClassificationError, ErrorKind, ManualErrors};
pub use crate::map::MeanAveragePrecision;
pub use crate::metric::{Confusion, Metric};
pub use crate::mode::EvaluationMode;
pub use crate::reconcile::{
    discretize, get_all_ids, get_discrete_labels, DiscreteLabels, MATCH_THRESHOLD,
};
