use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use evaluation::{EvaluationMode, Metric};
use matcher::Matcher;
use model::{Labels, ModelError, Slug, Splits};
use serde::Serialize;
use tracing::{Level, debug, info, span};

use crate::config::KpmConfig;
use crate::registry::{MatcherRegistry, MetricRegistry};
use crate::{MetricsSpan, PipelineError};

/// Outcome of one [`Pipeline::run`].
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub matcher: Slug,
    pub metric: String,
    pub mode: EvaluationMode,
    pub score: f64,
    /// Whether the model came from `model_dir` instead of being trained.
    pub loaded_from_cache: bool,
    pub predictions: Labels,
}

/// Drives one matcher through its lifecycle and scores its test predictions.
pub struct Pipeline {
    matcher: Box<dyn Matcher>,
    metric: Box<dyn Metric>,
    mode: EvaluationMode,
    cache_dir: PathBuf,
    model_dir: PathBuf,
    submission: Option<PathBuf>,
}

fn create_dir(path: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl Pipeline {
    pub fn new(matcher: Box<dyn Matcher>, metric: Box<dyn Metric>) -> Self {
        Self {
            matcher,
            metric,
            mode: EvaluationMode::default(),
            cache_dir: PathBuf::from("data/cache"),
            model_dir: PathBuf::from("data/models"),
            submission: None,
        }
    }

    /// Build matcher and metric through the built-in registries.
    ///
    /// Unknown metric slugs and matcher kinds fail here, before any
    /// preparation or training.
    pub fn from_config(config: &KpmConfig) -> Result<Self, PipelineError> {
        let metric = MetricRegistry::new().get(&config.evaluation.metric)?;
        let matcher = MatcherRegistry::new().build(&config.matcher)?;
        let mut pipeline = Self::new(matcher, metric)
            .with_mode(config.evaluation.mode)
            .with_cache_dir(&config.paths.cache_dir)
            .with_model_dir(&config.paths.model_dir);
        if let Some(path) = &config.paths.submission {
            pipeline = pipeline.with_submission(path);
        }
        Ok(pipeline)
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_dir = path.into();
        self
    }

    pub fn with_model_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_dir = path.into();
        self
    }

    /// Also write test predictions as submission JSON to `path`.
    pub fn with_submission(mut self, path: impl Into<PathBuf>) -> Self {
        self.submission = Some(path.into());
        self
    }

    pub fn matcher(&self) -> &dyn Matcher {
        self.matcher.as_ref()
    }

    pub fn metric(&self) -> &dyn Metric {
        self.metric.as_ref()
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// `prepare`, then `load_model` from `<model_dir>/<slug>`; on a miss
    /// `train` with `<cache_dir>/<slug>` and `save_model`. Finally predict
    /// the test split and evaluate against its labels.
    pub fn run(&mut self, splits: &Splits) -> Result<PipelineReport, PipelineError> {
        let slug = self.matcher.slug().clone();
        let span = span!(
            Level::INFO,
            "pipeline.run",
            matcher = %slug,
            metric = self.metric.slug(),
            mode = %self.mode
        );
        let _guard = span.enter();
        let start = Instant::now();

        let metrics = MetricsSpan::start();
        let prepared = self.matcher.prepare();
        if let Some(metrics) = metrics {
            metrics.record_prepare(prepared.as_ref().map(|_| ()));
        }
        prepared?;

        let model_path = self.model_dir.join(&slug);
        let loaded_from_cache = self.matcher.load_model(&model_path)?;
        if loaded_from_cache {
            info!(path = %model_path.display(), "model_reused");
        } else {
            let cache_path = self.cache_dir.join(&slug);
            create_dir(&cache_path)?;

            let metrics = MetricsSpan::start();
            let trained = self.matcher.train(&splits.train, &splits.dev, &cache_path);
            if let Some(metrics) = metrics {
                metrics.record_train(trained.as_ref().map(|_| ()));
            }
            trained?;

            create_dir(&model_path)?;
            self.matcher.save_model(&model_path)?;
            info!(path = %model_path.display(), "model_saved");
        }

        let test = splits.test.as_dataset();
        let metrics = MetricsSpan::start();
        let predicted = self.matcher.predict(test);
        if let Some(metrics) = metrics {
            metrics.record_predict(predicted.as_ref().map(Labels::len));
        }
        let predictions = predicted?;
        if let Some(pair) = predictions.keys().find(|pair| test.resolve(pair).is_none()) {
            return Err(ModelError::IneligiblePair(pair.clone()).into());
        }
        predictions.validate()?;
        debug!(pairs = predictions.len(), "predictions_ready");

        let metrics = MetricsSpan::start();
        let evaluated = self
            .metric
            .evaluate(&predictions, splits.test.labels(), self.mode);
        if let Some(metrics) = metrics {
            metrics.record_evaluate(evaluated.as_ref().copied());
        }
        let score = evaluated?;

        if let Some(path) = &self.submission {
            if let Some(parent) = path.parent() {
                create_dir(parent)?;
            }
            fs::write(path, predictions.to_submission_json()?).map_err(|source| {
                PipelineError::Io {
                    path: path.clone(),
                    source,
                }
            })?;
            info!(path = %path.display(), "submission_written");
        }

        info!(
            score,
            loaded_from_cache,
            elapsed_micros = start.elapsed().as_micros() as u64,
            "pipeline_completed"
        );

        Ok(PipelineReport {
            matcher: slug,
            metric: self.metric.slug().to_string(),
            mode: self.mode,
            score,
            loaded_from_cache,
            predictions,
        })
    }
}
