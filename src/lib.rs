//! Workspace umbrella crate for KPMatch, argument / key point matching.
//!
//! This crate stitches the data model, the matchers and the evaluation
//! metrics into a single pipeline: prepare a matcher, restore or train its
//! model, predict labels for the test split and score them.
//!
//! ```no_run
//! use kpmatch::{KpmConfig, Pipeline, load_splits};
//!
//! let config = KpmConfig::from_file("kpmatch.yaml")?;
//! let splits = load_splits(&config.data)?;
//! let report = Pipeline::from_config(&config)?.run(&splits)?;
//! println!("{} = {:.4}", report.metric, report.score);
//! # Ok::<(), kpmatch::PipelineError>(())
//! ```

pub mod config;
mod data;
mod pipeline;
mod registry;

pub use config::{ConfigLoadError, KpmConfig, MatcherConfig};
pub use data::{load_labelled_dataset, load_splits};
pub use evaluation::{
    Accuracy, EvalError, EvaluationMode, F1Score, ManualErrors, MeanAveragePrecision, Metric,
    Precision, Recall, get_all_ids, get_discrete_labels,
};
pub use matcher::{
    AllMatcher, Cascade, LabelPolicy, Matcher, MatcherError, MissingLabelPolicy, NoneMatcher,
    RandomMatcher, RegressionConfig, RegressionMatcher, TermOverlapConfig, TermOverlapMatcher,
    Untrained, UntrainedMatcher,
};
pub use model::{
    Argument, Dataset, KeyPoint, Label, LabelledDataset, Labels, ModelError, PairId, Slug,
    Splits, Stance,
};
pub use pipeline::{Pipeline, PipelineReport};
pub use registry::{MatcherConstructor, MatcherRegistry, MetricConstructor, MetricRegistry};

use std::path::PathBuf;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Errors that can occur while building or running a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown metric '{0}'")]
    UnknownMetric(String),
    #[error("unknown matcher kind '{0}'")]
    UnknownMatcher(String),
    #[error("invalid parameters for matcher kind '{kind}': {message}")]
    InvalidMatcherConfig { kind: String, message: String },
    #[error("matcher failure: {0}")]
    Matcher(#[from] MatcherError),
    #[error("evaluation failure: {0}")]
    Evaluation(#[from] EvalError),
    #[error("dataset failure: {0}")]
    Model(#[from] ModelError),
    #[error("configuration failure: {0}")]
    Config(#[from] ConfigLoadError),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_prepare(&self, latency: Duration, result: Result<(), &MatcherError>);
    fn record_train(&self, latency: Duration, result: Result<(), &MatcherError>);
    fn record_predict(&self, latency: Duration, result: Result<usize, &MatcherError>);
    fn record_evaluate(&self, latency: Duration, result: Result<f64, &EvalError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_prepare(self, result: Result<(), &MatcherError>) {
        self.recorder.record_prepare(self.start.elapsed(), result);
    }

    pub(crate) fn record_train(self, result: Result<(), &MatcherError>) {
        self.recorder.record_train(self.start.elapsed(), result);
    }

    pub(crate) fn record_predict(self, result: Result<usize, &MatcherError>) {
        self.recorder.record_predict(self.start.elapsed(), result);
    }

    pub(crate) fn record_evaluate(self, result: Result<f64, &EvalError>) {
        self.recorder.record_evaluate(self.start.elapsed(), result);
    }
}
