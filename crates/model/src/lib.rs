//! KPMatch data model.
//!
//! Value types shared by every stage of argument / key point matching:
//!
//! - [`Argument`] and [`KeyPoint`]: a text with a topic and a [`Stance`].
//! - [`Dataset`] and [`LabelledDataset`]: arguments and key points, unique by
//!   id, optionally with ground-truth [`Labels`].
//! - [`Labels`]: a **sparse** mapping from [`PairId`] to a label in `[0, 1]`.
//!   Predicted and ground-truth mappings rarely cover the same pairs; the
//!   evaluation layer reconciles them.
//! - [`Slug`]: filesystem-safe identifier used to key caches and model files.
//!
//! ## Eligibility
//!
//! A pair is only ever labelled when argument and key point share topic and
//! stance ([`is_eligible`]). [`Dataset::eligible_pairs`] enumerates exactly
//! those pairs, and [`LabelledDataset::new`] refuses ground truth for any
//! other pair.
//!
//! ## Example
//!
//! ```
//! use model::{Argument, Dataset, KeyPoint, LabelledDataset, Labels, Stance};
//!
//! let dataset = Dataset::new(
//!     vec![Argument {
//!         id: "arg_0".into(),
//!         text: "Vaccines save lives.".into(),
//!         topic: "Routine child vaccinations should be mandatory".into(),
//!         stance: Stance::Pro,
//!     }],
//!     vec![KeyPoint {
//!         id: "kp_0".into(),
//!         text: "Vaccines protect public health".into(),
//!         topic: "Routine child vaccinations should be mandatory".into(),
//!         stance: Stance::Pro,
//!     }],
//! )
//! .unwrap();
//!
//! assert_eq!(dataset.eligible_pairs().count(), 1);
//!
//! let labels = Labels::try_from_pairs([(("arg_0", "kp_0"), 1.0)]).unwrap();
//! let labelled = LabelledDataset::new(dataset, labels).unwrap();
//! assert_eq!(labelled.labels().len(), 1);
//! ```

mod error;
mod labels;
mod slug;
mod types;

pub use crate::error::ModelError;
pub use crate::labels::{Label, Labels, PairId};
pub use crate::slug::{slug_float, Slug};
pub use crate::types::{
    is_eligible, Argument, ArgumentId, Dataset, DatasetSplit, KeyPoint, KeyPointId,
    LabelledDataset, Splits, Stance, Topic,
};
