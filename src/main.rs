//! psdflat CLI - flatten visible PSD layers into PNG files

use clap::Parser;
use psdflat::config::Config;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) => {
            // Usage problems go to stdout and exit with status 1.
            println!("{}", e.render());
            return match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::from(1),
            };
        }
    };

    init_logging(config.verbose);

    let document = match psdflat::psd::load_document(&config.input) {
        Ok(document) => document,
        Err(e) => {
            error!("Failed to load {:?}: {}", config.input, e);
            return ExitCode::FAILURE;
        }
    };

    let failures = psdflat::flatten_document(&document, &config.output_dir);

    // Per-layer write failures are reported but do not fail the run.
    for failure in &failures {
        warn!("Layer '{}' was not written: {}", failure.layer, failure.error);
    }
    if !failures.is_empty() {
        warn!("{} layer(s) could not be written", failures.len());
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose { "psdflat=debug" } else { "psdflat=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
