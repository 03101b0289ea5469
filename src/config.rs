//! YAML configuration for a KPMatch run.
//!
//! A single file names the data splits, where caches and models live, the
//! metric and evaluation mode, and the matcher to build. Matchers are
//! described by a `kind` plus kind-specific parameters; a `cascade` nests two
//! more matcher descriptions.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "cascade baseline"
//!
//! data:
//!   train: "data/train.json"
//!   dev: "data/dev.json"
//!   test: "data/test.json"
//!
//! paths:
//!   cache_dir: "data/cache"
//!   model_dir: "data/models"
//!   submission: "data/out/predictions.json"
//!
//! evaluation:
//!   metric: "map"
//!   mode: "strict"
//!
//! logging:
//!   level: "info"
//!   json: false
//!
//! matcher:
//!   kind: "cascade"
//!   threshold: 0.5
//!   primary:
//!     kind: "logistic-regression"
//!     learning_rate: 0.5
//!     epochs: 200
//!     early_stopping: true
//!   fallback:
//!     kind: "term-overlap"
//!     stop_words: true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use evaluation::EvaluationMode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KpmConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Labelled dataset files for the three splits
    #[serde(default)]
    pub data: DataYamlConfig,

    /// Cache, model and submission locations
    #[serde(default)]
    pub paths: PathsYamlConfig,

    #[serde(default)]
    pub evaluation: EvaluationYamlConfig,

    #[serde(default)]
    pub logging: LoggingYamlConfig,

    pub matcher: MatcherConfig,
}

impl KpmConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: KpmConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration with default sections around `matcher`.
    pub fn with_matcher(matcher: MatcherConfig) -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            data: DataYamlConfig::default(),
            paths: PathsYamlConfig::default(),
            evaluation: EvaluationYamlConfig::default(),
            logging: LoggingYamlConfig::default(),
            matcher,
        }
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.data.validate()?;
        self.paths.validate()?;
        self.evaluation.validate()?;
        self.logging.validate()?;
        self.matcher.validate()?;

        Ok(())
    }
}

/// Serialized `LabelledDataset` JSON files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataYamlConfig {
    #[serde(default = "default_train_path")]
    pub train: PathBuf,

    #[serde(default = "default_dev_path")]
    pub dev: PathBuf,

    #[serde(default = "default_test_path")]
    pub test: PathBuf,
}

impl DataYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        for (field, path) in [("train", &self.train), ("dev", &self.dev), ("test", &self.test)] {
            if path.as_os_str().is_empty() {
                return Err(ConfigLoadError::Validation(format!(
                    "data.{field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

impl Default for DataYamlConfig {
    fn default() -> Self {
        Self {
            train: default_train_path(),
            dev: default_dev_path(),
            test: default_test_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsYamlConfig {
    /// Parent of the per-slug training caches
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Parent of the per-slug saved models
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Where to write test predictions as submission JSON
    #[serde(default)]
    pub submission: Option<PathBuf>,
}

impl PathsYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.cache_dir.as_os_str().is_empty() {
            return Err(ConfigLoadError::Validation(
                "paths.cache_dir must not be empty".to_string(),
            ));
        }
        if self.model_dir.as_os_str().is_empty() {
            return Err(ConfigLoadError::Validation(
                "paths.model_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PathsYamlConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            model_dir: default_model_dir(),
            submission: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationYamlConfig {
    /// Metric slug, see `MetricRegistry::slugs`
    #[serde(default = "default_metric")]
    pub metric: String,

    #[serde(default)]
    pub mode: EvaluationMode,
}

impl EvaluationYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.metric.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "evaluation.metric must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EvaluationYamlConfig {
    fn default() -> Self {
        Self {
            metric: default_metric(),
            mode: EvaluationMode::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingYamlConfig {
    /// `tracing` env-filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingYamlConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Matcher description: a registry `kind` plus its parameters.
///
/// Parameters stay untyped here; the constructor registered for `kind`
/// decodes them with [`MatcherConfig::params`], so unknown kinds surface as
/// registry errors rather than YAML errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatcherConfig {
    pub kind: String,

    #[serde(flatten)]
    pub params: BTreeMap<String, serde_yaml::Value>,
}

impl MatcherConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Decode the parameters as `T`.
    pub fn params<T: DeserializeOwned>(&self) -> Result<T, serde_yaml::Error> {
        let mapping: serde_yaml::Mapping = self
            .params
            .iter()
            .map(|(key, value)| (serde_yaml::Value::String(key.clone()), value.clone()))
            .collect();
        serde_yaml::from_value(serde_yaml::Value::Mapping(mapping))
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.kind.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "matcher.kind must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_train_path() -> PathBuf {
    PathBuf::from("data/train.json")
}
fn default_dev_path() -> PathBuf {
    PathBuf::from("data/dev.json")
}
fn default_test_path() -> PathBuf {
    PathBuf::from("data/test.json")
}
fn default_cache_dir() -> PathBuf {
    PathBuf::from("data/cache")
}
fn default_model_dir() -> PathBuf {
    PathBuf::from("data/models")
}
fn default_metric() -> String {
    "map".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
