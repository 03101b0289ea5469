//! # KPMatch Matchers (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` defines how a matcher is driven through its lifecycle and ships
//! the combinator and reference matchers built on that contract. A matcher
//! labels every eligible `(argument, key point)` pair of a
//! [`Dataset`](model::Dataset) with a value in `[0, 1]`.
//!
//! ## Core Types
//!
//! - [`Matcher`]: `prepare` → `load_model` → `train` + `save_model` → `predict`.
//! - [`UntrainedMatcher`] and [`Untrained`]: matchers without a model only
//!   implement `predict`; the adapter supplies the rest.
//! - [`ModelState`]: `Unloaded`, `Loaded` or `Trained`, so prediction before
//!   a model exists is a typed [`MatcherError::NotReady`].
//! - [`Cascade`]: primary matcher where it is confident, fallback elsewhere.
//! - [`LabelPolicy`] and [`training_examples`]: how unannotated eligible pairs
//!   become training data.
//!
//! ## Reference Matchers
//!
//! | Slug | Type | Model |
//! |------|------|-------|
//! | `all` | [`AllMatcher`] | none |
//! | `none` | [`NoneMatcher`] | none |
//! | `random-<seed>` | [`RandomMatcher`] | none |
//! | `term-overlap[-stemming][-stop-words][-custom-stop-words-<hash>]` | [`TermOverlapMatcher`] | none |
//! | `logistic-regression-<lr>-<epochs>-<decay>[...]` | [`RegressionMatcher`] | `model.json` |
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{AllMatcher, Cascade, Matcher, NoneMatcher, UntrainedMatcher};
//!
//! let cascade = Cascade::new(
//!     Box::new(NoneMatcher::new().untrained()),
//!     Box::new(AllMatcher::new().untrained()),
//!     0.5,
//! )
//! .unwrap();
//! assert_eq!(cascade.slug().as_str(), "cascade-0p5-none-all");
//! ```

mod baselines;
mod cascade;
mod contract;
mod regression;
mod term_overlap;
mod terms;
mod training;
mod types;

#[cfg(test)]
mod fixtures;

pub use crate::baselines::{AllMatcher, NoneMatcher, RandomMatcher};
pub use crate::cascade::{Cascade, MissingLabelPolicy};
pub use crate::contract::{label_eligible_pairs, Matcher, Untrained, UntrainedMatcher};
pub use crate::regression::{LogisticModel, RegressionConfig, RegressionMatcher};
pub use crate::term_overlap::{TermOverlapConfig, TermOverlapMatcher};
pub use crate::terms::{stem_terms, terms, OverlapFeatures, StopWords, FEATURE_COUNT};
pub use crate::training::{training_examples, TrainingExample};
pub use crate::types::{LabelPolicy, MatcherError, ModelState};
