//! Error types produced while constructing datasets, labels and slugs.
//!
//! Everything in this crate is built once by a loader and then treated as
//! read-only, so every error here is a construction-time validation failure.
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`DuplicateArgument`](ModelError::DuplicateArgument) | [`Dataset::new`](crate::Dataset::new) |
//! | [`DuplicateKeyPoint`](ModelError::DuplicateKeyPoint) | [`Dataset::new`](crate::Dataset::new) |
//! | [`UnknownArgument`](ModelError::UnknownArgument) | [`LabelledDataset::new`](crate::LabelledDataset::new) |
//! | [`UnknownKeyPoint`](ModelError::UnknownKeyPoint) | [`LabelledDataset::new`](crate::LabelledDataset::new) |
//! | [`IneligiblePair`](ModelError::IneligiblePair) | [`LabelledDataset::new`](crate::LabelledDataset::new) |
//! | [`LabelOutOfRange`](ModelError::LabelOutOfRange) | [`Labels::try_from_pairs`](crate::Labels::try_from_pairs) |
//! | [`InvalidSlug`](ModelError::InvalidSlug) | [`Slug::parse`](crate::Slug::parse) |
//! | [`Submission`](ModelError::Submission) | [`Labels::from_submission_json`](crate::Labels::from_submission_json) |
use thiserror::Error;

use crate::labels::PairId;

/// Errors raised by the data model.
///
/// ```rust
/// use model::ModelError;
///
/// let err = ModelError::DuplicateArgument("arg_1".into());
/// assert_eq!(err.to_string(), "duplicate argument id: arg_1");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ModelError {
    /// Two arguments in one dataset share an id.
    #[error("duplicate argument id: {0}")]
    DuplicateArgument(String),
    /// Two key points in one dataset share an id.
    #[error("duplicate key point id: {0}")]
    DuplicateKeyPoint(String),
    /// A label references an argument that is not part of the dataset.
    #[error("label references unknown argument: {0}")]
    UnknownArgument(String),
    /// A label references a key point that is not part of the dataset.
    #[error("label references unknown key point: {0}")]
    UnknownKeyPoint(String),
    /// A label was given for a pair that differs in topic or stance.
    #[error("label given for ineligible pair {0}")]
    IneligiblePair(PairId),
    /// A label value is not a finite number in `[0, 1]`.
    #[error("label {value} for {pair} is outside [0, 1]")]
    LabelOutOfRange { pair: PairId, value: f64 },
    /// A slug contains characters outside `[a-z0-9-]` or is malformed.
    #[error("invalid slug {0:?}: expected lowercase letters, digits and single dashes")]
    InvalidSlug(String),
    /// A submission document could not be decoded.
    #[error("invalid submission: {0}")]
    Submission(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(value: serde_json::Error) -> Self {
        ModelError::Submission(value.to_string())
    }
}
