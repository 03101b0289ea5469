use std::fs;
use std::path::{Path, PathBuf};

use model::{slug_float, Dataset, Label, LabelledDataset, Labels, PairId, Slug};
use tracing::{debug, info};

use crate::contract::Matcher;
use crate::MatcherError;

/// What a [`Cascade`] does when a sub-matcher left an eligible pair out.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MissingLabelPolicy {
    /// Fail with [`MatcherError::MissingLabel`].
    #[default]
    Fail,
    /// Treat a missing primary label as below the threshold and a missing
    /// fallback label as this value.
    Default(Label),
}

/// Combines two matchers: the primary decides where it is confident, the
/// fallback everywhere else.
///
/// For each eligible pair the primary label is used when it is at least
/// `threshold`, otherwise the fallback label. Each sub-matcher keeps its
/// models and caches in a subdirectory named after its own slug, so
/// sub-matchers with equal slugs are rejected.
pub struct Cascade {
    primary: Box<dyn Matcher>,
    fallback: Box<dyn Matcher>,
    threshold: Label,
    missing_label: MissingLabelPolicy,
    slug: Slug,
}

impl std::fmt::Debug for Cascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cascade")
            .field("slug", &self.slug)
            .field("threshold", &self.threshold)
            .field("missing_label", &self.missing_label)
            .finish_non_exhaustive()
    }
}

fn check_label(name: &str, value: Label) -> Result<(), MatcherError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MatcherError::InvalidConfig(format!(
            "{name} must be between 0.0 and 1.0, got {value}"
        )))
    }
}

impl Cascade {
    pub fn new(
        primary: Box<dyn Matcher>,
        fallback: Box<dyn Matcher>,
        threshold: Label,
    ) -> Result<Self, MatcherError> {
        check_label("threshold", threshold)?;
        if primary.slug() == fallback.slug() {
            return Err(MatcherError::InvalidConfig(format!(
                "cascade sub-matchers must have distinct slugs, both are '{}'",
                primary.slug()
            )));
        }
        let threshold_fragment = slug_float(threshold);
        let slug = Slug::from_parts([
            "cascade",
            threshold_fragment.as_str(),
            primary.slug().as_str(),
            fallback.slug().as_str(),
        ])?;
        Ok(Self {
            primary,
            fallback,
            threshold,
            missing_label: MissingLabelPolicy::default(),
            slug,
        })
    }

    pub fn with_missing_label(mut self, policy: MissingLabelPolicy) -> Result<Self, MatcherError> {
        if let MissingLabelPolicy::Default(value) = policy {
            check_label("missing label default", value)?;
        }
        self.missing_label = policy;
        Ok(self)
    }

    pub fn threshold(&self) -> Label {
        self.threshold
    }

    pub fn primary(&self) -> &dyn Matcher {
        self.primary.as_ref()
    }

    pub fn fallback(&self) -> &dyn Matcher {
        self.fallback.as_ref()
    }

    fn sub_paths(&self, path: &Path) -> (PathBuf, PathBuf) {
        (
            path.join(self.primary.slug()),
            path.join(self.fallback.slug()),
        )
    }

    fn missing(&self, matcher: &dyn Matcher, pair: &PairId) -> MatcherError {
        MatcherError::MissingLabel {
            matcher: matcher.slug().to_string(),
            pair: pair.clone(),
        }
    }

    /// Label for one pair; the bool is whether the primary decided it.
    fn combine(
        &self,
        pair: &PairId,
        primary: &Labels,
        fallback: &Labels,
    ) -> Result<(Label, bool), MatcherError> {
        match (primary.get(pair), self.missing_label) {
            (Some(label), _) if label >= self.threshold => return Ok((label, true)),
            (Some(_), _) | (None, MissingLabelPolicy::Default(_)) => {}
            (None, MissingLabelPolicy::Fail) => {
                return Err(self.missing(self.primary.as_ref(), pair))
            }
        }
        match (fallback.get(pair), self.missing_label) {
            (Some(label), _) => Ok((label, false)),
            (None, MissingLabelPolicy::Default(label)) => Ok((label, false)),
            (None, MissingLabelPolicy::Fail) => Err(self.missing(self.fallback.as_ref(), pair)),
        }
    }
}

impl Matcher for Cascade {
    fn slug(&self) -> &Slug {
        &self.slug
    }

    fn name(&self) -> Option<&str> {
        Some("Cascade")
    }

    fn prepare(&mut self) -> Result<(), MatcherError> {
        self.primary.prepare()?;
        self.fallback.prepare()
    }

    fn load_model(&mut self, path: &Path) -> Result<bool, MatcherError> {
        let (primary_path, fallback_path) = self.sub_paths(path);
        if !primary_path.is_dir() || !fallback_path.is_dir() {
            debug!(slug = %self.slug, path = %path.display(), "cascade_model_not_found");
            return Ok(false);
        }
        if !self.primary.load_model(&primary_path)? {
            info!(slug = %self.slug, missing = "primary", "cascade_partial_cache");
            return Ok(false);
        }
        if !self.fallback.load_model(&fallback_path)? {
            info!(slug = %self.slug, missing = "fallback", "cascade_partial_cache");
            return Ok(false);
        }
        Ok(true)
    }

    fn train(
        &mut self,
        train_data: &LabelledDataset,
        dev_data: &LabelledDataset,
        cache_path: &Path,
    ) -> Result<(), MatcherError> {
        let (primary_cache, fallback_cache) = self.sub_paths(cache_path);
        fs::create_dir_all(&primary_cache)?;
        fs::create_dir_all(&fallback_cache)?;
        self.primary.train(train_data, dev_data, &primary_cache)?;
        self.fallback.train(train_data, dev_data, &fallback_cache)?;
        info!(slug = %self.slug, "cascade_trained");
        Ok(())
    }

    fn save_model(&self, path: &Path) -> Result<(), MatcherError> {
        let (primary_path, fallback_path) = self.sub_paths(path);
        fs::create_dir_all(&primary_path)?;
        fs::create_dir_all(&fallback_path)?;
        self.primary.save_model(&primary_path)?;
        self.fallback.save_model(&fallback_path)
    }

    fn predict(&self, data: &Dataset) -> Result<Labels, MatcherError> {
        let primary = self.primary.predict(data)?;
        let fallback = self.fallback.predict(data)?;

        let mut from_primary = 0usize;
        let mut combined = Vec::new();
        for pair in data.eligible_pair_ids() {
            let (label, decided_by_primary) = self.combine(&pair, &primary, &fallback)?;
            from_primary += usize::from(decided_by_primary);
            combined.push((pair, label));
        }
        debug!(
            slug = %self.slug,
            pairs = combined.len(),
            from_primary,
            from_fallback = combined.len() - from_primary,
            "cascade_predicted"
        );
        Ok(combined.into_iter().collect())
    }
}
