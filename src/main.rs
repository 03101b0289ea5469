use std::env;
use std::path::Path;
use std::process::ExitCode;

use kpmatch::config::LoggingYamlConfig;
use kpmatch::{KpmConfig, MatcherRegistry, MetricRegistry, Pipeline, PipelineError, load_splits};
use tracing::error;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: kpmatch <config.yaml> | --list";

fn init_tracing(logging: &LoggingYamlConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(config: &KpmConfig) -> Result<(), PipelineError> {
    let mut pipeline = Pipeline::from_config(config)?;
    let splits = load_splits(&config.data)?;
    let report = pipeline.run(&splits)?;
    println!(
        "{} {} ({}): {:.4}",
        report.matcher, report.metric, report.mode, report.score
    );
    Ok(())
}

fn main() -> ExitCode {
    let Some(arg) = env::args_os().nth(1) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    if arg == "--list" {
        println!("metrics:  {}", MetricRegistry::new().slugs().collect::<Vec<_>>().join(", "));
        println!("matchers: {}", MatcherRegistry::new().kinds().collect::<Vec<_>>().join(", "));
        return ExitCode::SUCCESS;
    }

    let config = match KpmConfig::from_file(Path::new(&arg)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load {}: {err}", Path::new(&arg).display());
            return ExitCode::from(2);
        }
    };
    init_tracing(&config.logging);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "pipeline_failed");
            ExitCode::FAILURE
        }
    }
}
