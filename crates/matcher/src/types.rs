use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use model::{Label, ModelError, PairId, Slug};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a trained matcher turns unannotated eligible pairs into training data.
///
/// Annotators only label a subset of the eligible pairs. `Skip` trains on the
/// annotated pairs alone, `Strict` treats the rest as non-matches and
/// `Relaxed` treats the rest as matches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    #[default]
    Skip,
    Strict,
    Relaxed,
}

impl LabelPolicy {
    /// Label assumed for an eligible pair without annotation.
    pub fn missing_label(self) -> Option<Label> {
        match self {
            LabelPolicy::Skip => None,
            LabelPolicy::Strict => Some(0.0),
            LabelPolicy::Relaxed => Some(1.0),
        }
    }

    /// Slug fragment; empty for the default so existing slugs stay stable.
    pub fn slug_suffix(self) -> &'static str {
        match self {
            LabelPolicy::Skip => "",
            LabelPolicy::Strict => "strict",
            LabelPolicy::Relaxed => "relaxed",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LabelPolicy::Skip => "skip",
            LabelPolicy::Strict => "strict",
            LabelPolicy::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for LabelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelPolicy {
    type Err = MatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(LabelPolicy::Skip),
            "strict" => Ok(LabelPolicy::Strict),
            "relaxed" => Ok(LabelPolicy::Relaxed),
            other => Err(MatcherError::InvalidConfig(format!(
                "unknown label policy '{other}' (expected skip, strict or relaxed)"
            ))),
        }
    }
}

/// Where a matcher's model came from, if it has one.
///
/// `Loaded` and `Trained` both allow prediction; the distinction is kept for
/// logging and so callers can tell a cache hit from a fresh fit.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelState<T> {
    Unloaded,
    Loaded(T),
    Trained(T),
}

impl<T> Default for ModelState<T> {
    fn default() -> Self {
        ModelState::Unloaded
    }
}

impl<T> ModelState<T> {
    pub fn model(&self) -> Option<&T> {
        match self {
            ModelState::Unloaded => None,
            ModelState::Loaded(model) | ModelState::Trained(model) => Some(model),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.model().is_some()
    }

    /// The model, or [`MatcherError::NotReady`] naming the matcher.
    pub fn ready(&self, slug: &Slug) -> Result<&T, MatcherError> {
        self.model().ok_or_else(|| MatcherError::NotReady {
            slug: slug.to_string(),
        })
    }
}

/// Errors produced by matchers and the cascade combinator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MatcherError {
    /// Invalid hyperparameters or combinator settings.
    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),
    /// `predict` or `save_model` before a model was trained or loaded.
    #[error("matcher '{slug}' has no trained or loaded model")]
    NotReady { slug: String },
    /// `predict` before `prepare` provided a required asset.
    #[error("matcher '{slug}' was not prepared (missing {asset})")]
    NotPrepared { slug: String, asset: String },
    /// A sub-matcher left an eligible pair unlabelled.
    #[error("matcher '{matcher}' produced no label for {pair}")]
    MissingLabel { matcher: String, pair: PairId },
    /// Training data yielded no examples.
    #[error("matcher '{slug}' has no training examples")]
    EmptyTrainingSet { slug: String },
    /// An external resource could not be prepared.
    #[error("failed to prepare asset {}: {source}", asset.display())]
    Asset {
        asset: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("model serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
}
