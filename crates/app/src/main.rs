//! Restcheck - contract-test harness entry point
//!
//! Loads the catalog, resolves settings, runs every selected case and
//! prints the suite report. Exits non-zero if any case failed.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use restcheck_infrastructure::{ReqwestProvider, SuiteRunner, builtin_catalog, load_catalog};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let (catalog, file_settings) = match &args.catalog {
        Some(path) => {
            let loaded = load_catalog(path).await?;
            (loaded.catalog, loaded.settings)
        }
        None => (builtin_catalog(), None),
    };

    if args.list {
        for name in catalog.names() {
            println!("{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let settings = args.apply(file_settings.unwrap_or_default());
    settings.validate()?;
    let catalog = catalog.select(&args.scenarios)?;

    tracing::info!(
        base_url = %settings.base_url,
        cases = catalog.case_count(),
        "Starting restcheck v{}",
        env!("CARGO_PKG_VERSION")
    );

    let runner = SuiteRunner::new(ReqwestProvider, settings);
    let report = runner.run(Arc::new(catalog)).await;
    print!("{}", report.render());

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
