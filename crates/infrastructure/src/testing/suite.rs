//! Suite runner.
//!
//! Read-only cases run concurrently, bounded by a semaphore; mutating cases
//! run one at a time afterwards, in catalog order. Every case gets its own
//! `CaseRunner` and client handle, and the catalog is shared read-only.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use restcheck_application::ports::TransportProvider;
use restcheck_domain::{
    AssertionResult, CaseReport, CaseState, Check, FailureKind, Fixture, HarnessSettings,
    ScenarioCatalog, SuiteReport, generate_run_id,
};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use super::CaseRunner;

/// Runs every case in a catalog.
pub struct SuiteRunner<P> {
    provider: Arc<P>,
    settings: Arc<HarnessSettings>,
}

impl<P> SuiteRunner<P>
where
    P: TransportProvider + 'static,
    P::Transport: 'static,
{
    /// Creates a suite runner.
    #[must_use]
    pub fn new(provider: P, settings: HarnessSettings) -> Self {
        Self {
            provider: Arc::new(provider),
            settings: Arc::new(settings),
        }
    }

    /// Settings every case is run with.
    #[must_use]
    pub fn settings(&self) -> &HarnessSettings {
        &self.settings
    }

    /// Runs the catalog and returns reports in catalog order.
    pub async fn run(&self, catalog: Arc<ScenarioCatalog>) -> SuiteReport {
        let start = Instant::now();
        let cases: Vec<(usize, usize)> = catalog
            .scenarios
            .iter()
            .enumerate()
            .flat_map(|(s, scenario)| (0..scenario.fixtures.len()).map(move |f| (s, f)))
            .collect();
        let mut reports: Vec<Option<CaseReport>> = vec![None; cases.len()];

        let permits = self.settings.max_concurrent_reads.max(1);
        info!(
            cases = cases.len(),
            max_concurrent_reads = permits,
            "running suite"
        );

        let semaphore = Arc::new(Semaphore::new(permits));
        let mut reads = JoinSet::new();
        for (index, &(s, f)) in cases.iter().enumerate() {
            if !catalog.scenarios[s].fixtures[f].is_read_only() {
                continue;
            }
            let provider = Arc::clone(&self.provider);
            let settings = Arc::clone(&self.settings);
            let catalog = Arc::clone(&catalog);
            let semaphore = Arc::clone(&semaphore);
            reads.spawn(async move {
                let scenario = &catalog.scenarios[s];
                let report =
                    run_read(provider, settings, semaphore, &scenario.name, &scenario.fixtures[f])
                        .await;
                (index, report)
            });
        }
        while let Some(joined) = reads.join_next().await {
            match joined {
                Ok((index, report)) => reports[index] = Some(report),
                Err(e) => error!(error = %e, "read-only case aborted"),
            }
        }

        for (index, &(s, f)) in cases.iter().enumerate() {
            let scenario = &catalog.scenarios[s];
            let fixture = &scenario.fixtures[f];
            if fixture.is_read_only() {
                continue;
            }
            let report = CaseRunner::run_isolated(
                Arc::clone(&self.provider),
                Arc::clone(&self.settings),
                &scenario.name,
                fixture,
            )
            .await;
            reports[index] = Some(report);
        }

        let cases = reports
            .into_iter()
            .zip(&cases)
            .map(|(report, &(s, f))| {
                report.unwrap_or_else(|| {
                    let scenario = &catalog.scenarios[s];
                    unfinished_report(
                        &scenario.name,
                        &scenario.fixtures[f],
                        "case task aborted before reporting",
                    )
                })
            })
            .collect();

        let report = SuiteReport::new(
            cases,
            u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            "suite finished"
        );
        report
    }
}

/// Runs one read-only case once a permit is free.
async fn run_read<P>(
    provider: Arc<P>,
    settings: Arc<HarnessSettings>,
    semaphore: Arc<Semaphore>,
    scenario: &str,
    fixture: &Fixture,
) -> CaseReport
where
    P: TransportProvider,
{
    let Ok(_permit) = semaphore.acquire_owned().await else {
        error!(scenario, case = %fixture.label, "read scheduler closed");
        return unfinished_report(
            scenario,
            fixture,
            "read scheduler closed before the case could start",
        );
    };
    CaseRunner::run_isolated(provider, settings, scenario, fixture).await
}

/// Report for a case that never produced one of its own.
fn unfinished_report(scenario: &str, fixture: &Fixture, reason: &str) -> CaseReport {
    let mut result = AssertionResult::new();
    result.push(Check::fail(
        FailureKind::TransportFailure,
        "Case completed",
        reason,
    ));
    CaseReport {
        run_id: generate_run_id(),
        scenario: scenario.to_string(),
        label: fixture.label.clone(),
        method: fixture.method,
        path: None,
        started_at: Utc::now(),
        duration_ms: 0,
        states: vec![CaseState::Idle, CaseState::TornDown],
        result,
        response_body: None,
    }
}
