use std::fs;
use std::path::Path;
use std::time::Instant;

use model::{slug_float, Argument, Dataset, KeyPoint, LabelledDataset, Labels, Slug};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::contract::{label_eligible_pairs, Matcher};
use crate::terms::{terms, OverlapFeatures, StopWords, FEATURE_COUNT};
use crate::training::training_examples;
use crate::{LabelPolicy, MatcherError, ModelState};

const MODEL_FILE: &str = "model.json";
const CHECKPOINT_FILE: &str = "checkpoint.json";

/// Hyperparameters of [`RegressionMatcher`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegressionConfig {
    #[serde(default = "RegressionConfig::default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "RegressionConfig::default_epochs")]
    pub epochs: usize,
    /// L2 penalty applied to the weights, not the bias.
    #[serde(default = "RegressionConfig::default_weight_decay")]
    pub weight_decay: f64,
    /// Keep the weights with the lowest dev loss and stop once it has not
    /// improved for `patience` epochs.
    #[serde(default)]
    pub early_stopping: bool,
    #[serde(default = "RegressionConfig::default_patience")]
    pub patience: usize,
    #[serde(default)]
    pub label_policy: LabelPolicy,
    /// Drop English stop words before computing features.
    #[serde(default = "RegressionConfig::default_stop_words")]
    pub stop_words: bool,
}

impl RegressionConfig {
    pub(crate) fn default_learning_rate() -> f64 {
        0.5
    }

    pub(crate) fn default_epochs() -> usize {
        200
    }

    pub(crate) fn default_weight_decay() -> f64 {
        1e-4
    }

    pub(crate) fn default_patience() -> usize {
        10
    }

    pub(crate) fn default_stop_words() -> bool {
        true
    }

    pub fn validate(&self) -> Result<(), MatcherError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(MatcherError::InvalidConfig(
                "learning_rate must be a positive number".into(),
            ));
        }
        if self.epochs == 0 {
            return Err(MatcherError::InvalidConfig(
                "epochs must be greater than zero".into(),
            ));
        }
        if !(self.weight_decay.is_finite() && self.weight_decay >= 0.0) {
            return Err(MatcherError::InvalidConfig(
                "weight_decay must be >= 0.0".into(),
            ));
        }
        if self.early_stopping && self.patience == 0 {
            return Err(MatcherError::InvalidConfig(
                "patience must be greater than zero when early_stopping is enabled".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            learning_rate: Self::default_learning_rate(),
            epochs: Self::default_epochs(),
            weight_decay: Self::default_weight_decay(),
            early_stopping: false,
            patience: Self::default_patience(),
            label_policy: LabelPolicy::default(),
            stop_words: Self::default_stop_words(),
        }
    }
}

/// Fitted weights, one per overlap feature, plus a bias.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LogisticModel {
    pub weights: [f64; FEATURE_COUNT],
    pub bias: f64,
}

impl LogisticModel {
    fn zero() -> Self {
        Self {
            weights: [0.0; FEATURE_COUNT],
            bias: 0.0,
        }
    }

    pub fn probability(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let z = self
            .weights
            .iter()
            .zip(features)
            .fold(self.bias, |acc, (w, x)| acc + w * x);
        1.0 / (1.0 + (-z).exp())
    }
}

/// On-disk form of a model; the slug guards against loading weights that
/// were fitted with other hyperparameters.
#[derive(Debug, Serialize, Deserialize)]
struct StoredModel {
    slug: Slug,
    model: LogisticModel,
}

/// Logistic regression over term-overlap features.
///
/// Training is full-batch gradient descent from zero weights, so the same
/// data and hyperparameters always produce the same model.
#[derive(Debug, Clone)]
pub struct RegressionMatcher {
    config: RegressionConfig,
    slug: Slug,
    stop_words: Option<StopWords>,
    state: ModelState<LogisticModel>,
}

impl RegressionMatcher {
    pub fn new(config: RegressionConfig) -> Result<Self, MatcherError> {
        config.validate()?;
        let learning_rate = slug_float(config.learning_rate);
        let epochs = config.epochs.to_string();
        let weight_decay = slug_float(config.weight_decay);
        // Patience only shapes the weights when early stopping is on.
        let early_stopping = if config.early_stopping {
            format!("early-stopping-{}", config.patience)
        } else {
            String::new()
        };
        let slug = Slug::from_parts([
            "logistic-regression",
            learning_rate.as_str(),
            epochs.as_str(),
            weight_decay.as_str(),
            early_stopping.as_str(),
            if config.stop_words { "" } else { "all-terms" },
            config.label_policy.slug_suffix(),
        ])?;
        Ok(Self {
            stop_words: config.stop_words.then(StopWords::english),
            config,
            slug,
            state: ModelState::Unloaded,
        })
    }

    pub fn config(&self) -> &RegressionConfig {
        &self.config
    }

    pub fn state(&self) -> &ModelState<LogisticModel> {
        &self.state
    }

    fn features(&self, argument: &Argument, key_point: &KeyPoint) -> [f64; FEATURE_COUNT] {
        let stop_words = self.stop_words.as_ref();
        OverlapFeatures::new(
            &terms(&argument.text, stop_words),
            &terms(&key_point.text, stop_words),
        )
        .to_array()
    }

    fn examples(&self, data: &LabelledDataset) -> Vec<([f64; FEATURE_COUNT], f64)> {
        training_examples(data, self.config.label_policy)
            .into_iter()
            .map(|example| (self.features(example.argument, example.key_point), example.label))
            .collect()
    }

    fn write_model(&self, path: &Path, model: LogisticModel) -> Result<(), MatcherError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredModel {
            slug: self.slug.clone(),
            model,
        };
        fs::write(path, serde_json::to_vec_pretty(&stored)?)?;
        Ok(())
    }
}

/// Mean binary cross-entropy, clamped away from `log(0)`.
fn log_loss(model: &LogisticModel, examples: &[([f64; FEATURE_COUNT], f64)]) -> f64 {
    if examples.is_empty() {
        return 0.0;
    }
    let total: f64 = examples
        .iter()
        .map(|(x, y)| {
            let p = model.probability(x).clamp(1e-12, 1.0 - 1e-12);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    total / examples.len() as f64
}

fn gradient_step(
    model: &mut LogisticModel,
    examples: &[([f64; FEATURE_COUNT], f64)],
    learning_rate: f64,
    weight_decay: f64,
) {
    let n = examples.len() as f64;
    let mut grad_w = [0.0; FEATURE_COUNT];
    let mut grad_b = 0.0;
    for (x, y) in examples {
        let err = model.probability(x) - y;
        for (g, xi) in grad_w.iter_mut().zip(x) {
            *g += err * xi;
        }
        grad_b += err;
    }
    for (w, g) in model.weights.iter_mut().zip(grad_w) {
        *w -= learning_rate * (g / n + weight_decay * *w);
    }
    model.bias -= learning_rate * grad_b / n;
}

impl Matcher for RegressionMatcher {
    fn slug(&self) -> &Slug {
        &self.slug
    }

    fn name(&self) -> Option<&str> {
        Some("Logistic regression")
    }

    fn description(&self) -> Option<&str> {
        Some("Logistic regression over term overlap features.")
    }

    fn load_model(&mut self, path: &Path) -> Result<bool, MatcherError> {
        if self.state.is_ready() {
            return Ok(true);
        }
        let file = path.join(MODEL_FILE);
        if !file.is_file() {
            debug!(slug = %self.slug, path = %file.display(), "model_not_found");
            return Ok(false);
        }
        let raw = fs::read(&file)?;
        let stored: StoredModel = match serde_json::from_slice(&raw) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(slug = %self.slug, path = %file.display(), error = %err, "model_unreadable");
                return Ok(false);
            }
        };
        if stored.slug != self.slug {
            warn!(
                slug = %self.slug,
                stored_slug = %stored.slug,
                path = %file.display(),
                "model_slug_mismatch"
            );
            return Ok(false);
        }
        self.state = ModelState::Loaded(stored.model);
        info!(slug = %self.slug, path = %file.display(), "model_loaded");
        Ok(true)
    }

    fn train(
        &mut self,
        train_data: &LabelledDataset,
        dev_data: &LabelledDataset,
        cache_path: &Path,
    ) -> Result<(), MatcherError> {
        let start = Instant::now();
        let train = self.examples(train_data);
        if train.is_empty() {
            return Err(MatcherError::EmptyTrainingSet {
                slug: self.slug.to_string(),
            });
        }
        let dev = if self.config.early_stopping {
            self.examples(dev_data)
        } else {
            Vec::new()
        };
        let checkpoint = cache_path.join(CHECKPOINT_FILE);

        let mut model = LogisticModel::zero();
        let mut best: Option<(LogisticModel, f64)> = None;
        let mut stale_epochs = 0;
        let mut epochs_run = 0;
        for _ in 0..self.config.epochs {
            gradient_step(
                &mut model,
                &train,
                self.config.learning_rate,
                self.config.weight_decay,
            );
            epochs_run += 1;

            if dev.is_empty() {
                continue;
            }
            let dev_loss = log_loss(&model, &dev);
            match best {
                Some((_, best_loss)) if dev_loss >= best_loss => {
                    stale_epochs += 1;
                    if stale_epochs >= self.config.patience {
                        break;
                    }
                }
                _ => {
                    best = Some((model, dev_loss));
                    stale_epochs = 0;
                    self.write_model(&checkpoint, model)?;
                }
            }
        }

        let (model, dev_loss) = match best {
            Some((best_model, loss)) => (best_model, Some(loss)),
            None => (model, None),
        };
        info!(
            slug = %self.slug,
            examples = train.len(),
            dev_examples = dev.len(),
            epochs_run,
            train_loss = log_loss(&model, &train),
            dev_loss = ?dev_loss,
            elapsed_micros = start.elapsed().as_micros() as u64,
            "matcher_trained"
        );
        self.state = ModelState::Trained(model);
        Ok(())
    }

    fn save_model(&self, path: &Path) -> Result<(), MatcherError> {
        let model = *self.state.ready(&self.slug)?;
        self.write_model(&path.join(MODEL_FILE), model)
    }

    fn predict(&self, data: &Dataset) -> Result<Labels, MatcherError> {
        let model = self.state.ready(&self.slug)?;
        Ok(label_eligible_pairs(data, |argument, key_point| {
            model.probability(&self.features(argument, key_point))
        }))
    }
}

#[cfg(test)]
mod tests;
