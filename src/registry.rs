//! Name-to-constructor tables for metrics and matchers.

use evaluation::{
    Accuracy, F1Score, ManualErrors, MeanAveragePrecision, Metric, Precision, Recall,
};
use matcher::{
    AllMatcher, Cascade, Matcher, MissingLabelPolicy, NoneMatcher, RandomMatcher,
    RegressionConfig, RegressionMatcher, TermOverlapConfig, TermOverlapMatcher,
    UntrainedMatcher,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::PipelineError;
use crate::config::MatcherConfig;

pub type MetricConstructor = fn() -> Box<dyn Metric>;

/// Metrics selectable by slug.
pub struct MetricRegistry {
    entries: Vec<(&'static str, MetricConstructor)>,
}

impl MetricRegistry {
    /// Registry with every built-in metric.
    pub fn new() -> Self {
        let builtin: [(&'static str, MetricConstructor); 10] = [
            ("map", || Box::new(MeanAveragePrecision::new())),
            ("map-top-half", || Box::new(MeanAveragePrecision::top_half())),
            ("precision", || Box::new(Precision::binary())),
            ("macro-precision", || Box::new(Precision::macro_averaged())),
            ("recall", || Box::new(Recall::binary())),
            ("macro-recall", || Box::new(Recall::macro_averaged())),
            ("f1", || Box::new(F1Score::binary())),
            ("macro-f1", || Box::new(F1Score::macro_averaged())),
            ("accuracy", || Box::new(Accuracy)),
            ("manual-errors", || Box::new(ManualErrors::default())),
        ];
        Self {
            entries: builtin.to_vec(),
        }
    }

    /// Add or replace a metric.
    pub fn register(&mut self, slug: &'static str, constructor: MetricConstructor) {
        self.entries.retain(|(existing, _)| *existing != slug);
        self.entries.push((slug, constructor));
    }

    pub fn slugs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(slug, _)| *slug)
    }

    pub fn get(&self, slug: &str) -> Result<Box<dyn Metric>, PipelineError> {
        self.entries
            .iter()
            .find(|(name, _)| *name == slug)
            .map(|(_, constructor)| constructor())
            .ok_or_else(|| PipelineError::UnknownMetric(slug.to_string()))
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub type MatcherConstructor =
    fn(&MatcherConfig, &MatcherRegistry) -> Result<Box<dyn Matcher>, PipelineError>;

/// Matchers buildable from a [`MatcherConfig`], keyed by `kind`.
///
/// Constructors receive the registry itself so combinators can build their
/// sub-matchers.
pub struct MatcherRegistry {
    entries: Vec<(&'static str, MatcherConstructor)>,
}

#[derive(Debug, Default, Deserialize)]
struct RandomParams {
    #[serde(default)]
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct CascadeParams {
    #[serde(default = "default_threshold")]
    threshold: f64,
    primary: MatcherConfig,
    fallback: MatcherConfig,
    /// Label substituted for a missing sub-matcher label; fail when absent.
    #[serde(default)]
    missing_label: Option<f64>,
}

fn default_threshold() -> f64 {
    0.5
}

fn decode<T: DeserializeOwned>(config: &MatcherConfig) -> Result<T, PipelineError> {
    config
        .params()
        .map_err(|err| PipelineError::InvalidMatcherConfig {
            kind: config.kind.clone(),
            message: err.to_string(),
        })
}

fn build_all(_: &MatcherConfig, _: &MatcherRegistry) -> Result<Box<dyn Matcher>, PipelineError> {
    Ok(Box::new(AllMatcher::new().untrained()))
}

fn build_none(_: &MatcherConfig, _: &MatcherRegistry) -> Result<Box<dyn Matcher>, PipelineError> {
    Ok(Box::new(NoneMatcher::new().untrained()))
}

fn build_random(
    config: &MatcherConfig,
    _: &MatcherRegistry,
) -> Result<Box<dyn Matcher>, PipelineError> {
    let params: RandomParams = decode(config)?;
    Ok(Box::new(RandomMatcher::new(params.seed).untrained()))
}

fn build_term_overlap(
    config: &MatcherConfig,
    _: &MatcherRegistry,
) -> Result<Box<dyn Matcher>, PipelineError> {
    let params: TermOverlapConfig = decode(config)?;
    Ok(Box::new(TermOverlapMatcher::new(params)?.untrained()))
}

fn build_regression(
    config: &MatcherConfig,
    _: &MatcherRegistry,
) -> Result<Box<dyn Matcher>, PipelineError> {
    let params: RegressionConfig = decode(config)?;
    Ok(Box::new(RegressionMatcher::new(params)?))
}

fn build_cascade(
    config: &MatcherConfig,
    registry: &MatcherRegistry,
) -> Result<Box<dyn Matcher>, PipelineError> {
    let params: CascadeParams = decode(config)?;
    let primary = registry.build(&params.primary)?;
    let fallback = registry.build(&params.fallback)?;
    let mut cascade = Cascade::new(primary, fallback, params.threshold)?;
    if let Some(label) = params.missing_label {
        cascade = cascade.with_missing_label(MissingLabelPolicy::Default(label))?;
    }
    Ok(Box::new(cascade))
}

impl MatcherRegistry {
    /// Registry with every built-in matcher kind.
    pub fn new() -> Self {
        let builtin: [(&'static str, MatcherConstructor); 6] = [
            ("all", build_all),
            ("none", build_none),
            ("random", build_random),
            ("term-overlap", build_term_overlap),
            ("logistic-regression", build_regression),
            ("cascade", build_cascade),
        ];
        Self {
            entries: builtin.to_vec(),
        }
    }

    /// Add or replace a matcher kind.
    pub fn register(&mut self, kind: &'static str, constructor: MatcherConstructor) {
        self.entries.retain(|(existing, _)| *existing != kind);
        self.entries.push((kind, constructor));
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }

    pub fn build(&self, config: &MatcherConfig) -> Result<Box<dyn Matcher>, PipelineError> {
        let constructor = self
            .entries
            .iter()
            .find(|(kind, _)| *kind == config.kind)
            .map(|(_, constructor)| *constructor)
            .ok_or_else(|| PipelineError::UnknownMatcher(config.kind.clone()))?;
        constructor(config, self)
    }
}

impl Default for MatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_metric_slug_resolves_to_itself() {
        let registry = MetricRegistry::new();
        let slugs: Vec<_> = registry.slugs().collect();
        assert_eq!(slugs.len(), 10);
        for slug in slugs {
            assert_eq!(registry.get(slug).unwrap().slug(), slug);
        }
    }

    #[test]
    fn unknown_metric_is_reported() {
        match MetricRegistry::new().get("bleu") {
            Err(PipelineError::UnknownMetric(slug)) => assert_eq!(slug, "bleu"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("bleu is not a metric"),
        }
    }

    #[test]
    fn builds_nested_cascade() {
        let config = MatcherConfig::new("cascade")
            .with_param("threshold", 0.5)
            .with_param(
                "primary",
                serde_yaml::to_value(MatcherConfig::new("random").with_param("seed", 3u64))
                    .unwrap(),
            )
            .with_param(
                "fallback",
                serde_yaml::to_value(
                    MatcherConfig::new("term-overlap").with_param("stop_words", true),
                )
                .unwrap(),
            );
        let matcher = MatcherRegistry::new().build(&config).unwrap();
        assert_eq!(
            matcher.slug().as_str(),
            "cascade-0p5-random-3-term-overlap-stop-words"
        );
    }

    #[test]
    fn unknown_kind_fails_before_anything_is_built() {
        let config = MatcherConfig::new("cascade")
            .with_param("primary", serde_yaml::to_value(MatcherConfig::new("bilstm")).unwrap())
            .with_param("fallback", serde_yaml::to_value(MatcherConfig::new("all")).unwrap());
        match MatcherRegistry::new().build(&config) {
            Err(PipelineError::UnknownMatcher(kind)) => assert_eq!(kind, "bilstm"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("bilstm is not registered"),
        }
    }

    #[test]
    fn invalid_parameters_are_reported_with_kind() {
        let config = MatcherConfig::new("logistic-regression").with_param("epochs", "many");
        match MatcherRegistry::new().build(&config) {
            Err(PipelineError::InvalidMatcherConfig { kind, .. }) => {
                assert_eq!(kind, "logistic-regression")
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("epochs must be a number"),
        }

        let config = MatcherConfig::new("logistic-regression").with_param("epochs", 0u64);
        assert!(matches!(
            MatcherRegistry::new().build(&config),
            Err(PipelineError::Matcher(_))
        ));
    }

    #[test]
    fn registered_kinds_can_be_replaced() {
        let mut registry = MatcherRegistry::new();
        registry.register("all", build_none);
        let matcher = registry.build(&MatcherConfig::new("all")).unwrap();
        assert_eq!(matcher.slug().as_str(), "none");
        assert_eq!(registry.kinds().filter(|k| *k == "all").count(), 1);
    }
}
