use kpmatch::{
    Cascade, Matcher, MatcherConfig, MatcherRegistry, RandomMatcher, RegressionConfig,
    RegressionMatcher, TermOverlapMatcher, UntrainedMatcher,
};

mod common;
use common::splits;

fn train_and_predict(mut matcher: Box<dyn Matcher>) -> kpmatch::Labels {
    let data = splits();
    let cache = tempfile::tempdir().unwrap();
    matcher.prepare().unwrap();
    matcher.train(&data.train, &data.dev, cache.path()).unwrap();
    matcher.predict(data.test.as_dataset()).unwrap()
}

#[test]
fn random_labels_depend_only_on_seed_and_pair() {
    let data = splits();
    let first = RandomMatcher::new(42).predict(data.test.as_dataset()).unwrap();
    let second = RandomMatcher::new(42).predict(data.test.as_dataset()).unwrap();
    let other = RandomMatcher::new(43).predict(data.test.as_dataset()).unwrap();

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert!(first.iter().all(|(_, label)| (0.0..1.0).contains(&label)));
}

#[test]
fn regression_training_is_reproducible() {
    let build = || -> Box<dyn Matcher> {
        Box::new(
            RegressionMatcher::new(RegressionConfig {
                early_stopping: true,
                ..RegressionConfig::default()
            })
            .unwrap(),
        )
    };
    assert_eq!(train_and_predict(build()), train_and_predict(build()));
}

#[test]
fn cascade_built_from_config_matches_cascade_built_by_hand() {
    let config = MatcherConfig::new("cascade")
        .with_param("threshold", 0.4)
        .with_param(
            "primary",
            serde_yaml::to_value(MatcherConfig::new("logistic-regression")).unwrap(),
        )
        .with_param(
            "fallback",
            serde_yaml::to_value(MatcherConfig::new("term-overlap")).unwrap(),
        );
    let from_config = MatcherRegistry::new().build(&config).unwrap();

    let by_hand = Cascade::new(
        Box::new(RegressionMatcher::new(RegressionConfig::default()).unwrap()),
        Box::new(TermOverlapMatcher::new(Default::default()).unwrap().untrained()),
        0.4,
    )
    .unwrap();

    assert_eq!(from_config.slug(), by_hand.slug());
    assert_eq!(
        train_and_predict(from_config),
        train_and_predict(Box::new(by_hand))
    );
}
