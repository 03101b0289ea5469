use std::path::Path;

use model::{Argument, Dataset, KeyPoint, Label, LabelledDataset, Labels, Slug};

use crate::MatcherError;

/// Lifecycle contract shared by every matcher.
///
/// A pipeline drives a matcher in this order:
///
/// 1. [`prepare`](Matcher::prepare), any number of times;
/// 2. [`load_model`](Matcher::load_model) from `<model dir>/<slug>`;
/// 3. on a miss, [`train`](Matcher::train) followed by
///    [`save_model`](Matcher::save_model);
/// 4. [`predict`](Matcher::predict) on the test split.
///
/// The [`slug`](Matcher::slug) names cache and model directories, so two
/// matchers with the same slug must be interchangeable.
pub trait Matcher: Send {
    fn slug(&self) -> &Slug;

    fn name(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        None
    }

    /// Fetch or build external assets. Must be safe to call repeatedly.
    fn prepare(&mut self) -> Result<(), MatcherError> {
        Ok(())
    }

    /// Restore a previously saved model from `path`.
    ///
    /// Returns `Ok(false)` when nothing usable is stored there; the caller
    /// then trains. A matcher that already holds a model returns `Ok(true)`
    /// without touching the filesystem.
    fn load_model(&mut self, path: &Path) -> Result<bool, MatcherError>;

    /// Fit on `train_data`, optionally consulting `dev_data`. Intermediate
    /// artifacts go below `cache_path`.
    fn train(
        &mut self,
        train_data: &LabelledDataset,
        dev_data: &LabelledDataset,
        cache_path: &Path,
    ) -> Result<(), MatcherError>;

    /// Persist the current model so [`load_model`](Matcher::load_model) on a
    /// fresh instance restores the same predictions.
    fn save_model(&self, path: &Path) -> Result<(), MatcherError>;

    /// Label eligible pairs of `data`. Every returned pair is eligible; an
    /// eligible pair may be left out when the matcher abstains.
    fn predict(&self, data: &Dataset) -> Result<Labels, MatcherError>;
}

impl<M: Matcher + ?Sized> Matcher for Box<M> {
    fn slug(&self) -> &Slug {
        (**self).slug()
    }

    fn name(&self) -> Option<&str> {
        (**self).name()
    }

    fn description(&self) -> Option<&str> {
        (**self).description()
    }

    fn prepare(&mut self) -> Result<(), MatcherError> {
        (**self).prepare()
    }

    fn load_model(&mut self, path: &Path) -> Result<bool, MatcherError> {
        (**self).load_model(path)
    }

    fn train(
        &mut self,
        train_data: &LabelledDataset,
        dev_data: &LabelledDataset,
        cache_path: &Path,
    ) -> Result<(), MatcherError> {
        (**self).train(train_data, dev_data, cache_path)
    }

    fn save_model(&self, path: &Path) -> Result<(), MatcherError> {
        (**self).save_model(path)
    }

    fn predict(&self, data: &Dataset) -> Result<Labels, MatcherError> {
        (**self).predict(data)
    }
}

/// A matcher without a learned model.
///
/// Implementors only describe themselves and predict; wrapping one in
/// [`Untrained`] supplies the model lifecycle.
pub trait UntrainedMatcher: Send {
    fn slug(&self) -> &Slug;

    fn name(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        None
    }

    fn prepare(&mut self) -> Result<(), MatcherError> {
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> Result<Labels, MatcherError>;

    fn untrained(self) -> Untrained<Self>
    where
        Self: Sized,
    {
        Untrained::new(self)
    }
}

/// [`Matcher`] adapter for an [`UntrainedMatcher`].
///
/// Loading always succeeds, training and saving do nothing.
#[derive(Debug, Clone)]
pub struct Untrained<M> {
    inner: M,
}

impl<M: UntrainedMatcher> Untrained<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: UntrainedMatcher> Matcher for Untrained<M> {
    fn slug(&self) -> &Slug {
        self.inner.slug()
    }

    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn description(&self) -> Option<&str> {
        self.inner.description()
    }

    fn prepare(&mut self) -> Result<(), MatcherError> {
        self.inner.prepare()
    }

    fn load_model(&mut self, _path: &Path) -> Result<bool, MatcherError> {
        Ok(true)
    }

    fn train(
        &mut self,
        _train_data: &LabelledDataset,
        _dev_data: &LabelledDataset,
        _cache_path: &Path,
    ) -> Result<(), MatcherError> {
        Ok(())
    }

    fn save_model(&self, _path: &Path) -> Result<(), MatcherError> {
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> Result<Labels, MatcherError> {
        self.inner.predict(data)
    }
}

/// Label every eligible pair of `data` with `label`.
///
/// Matchers that score each pair independently build their predictions
/// through this, which keeps ineligible pairs out by construction.
pub fn label_eligible_pairs<F>(data: &Dataset, mut label: F) -> Labels
where
    F: FnMut(&Argument, &KeyPoint) -> Label,
{
    data.eligible_pairs()
        .map(|(argument, key_point)| {
            let value = label(argument, key_point);
            ((argument.id.as_str(), key_point.id.as_str()), value)
        })
        .collect()
}
