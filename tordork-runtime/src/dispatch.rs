//! Dispatch Coordinator
//!
//! Runs every query's retry loop on a bounded pool and merges the links:
//! - At most `workers` queries in flight
//! - A query keeps its slot through all of its retries and sleeps
//! - Faults in one query's task never reach its siblings
//! - The merged set does not depend on completion order

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use tordork_core::{Engine, LinkSet};
use tordork_tor::QueryExecutor;

use crate::{run_query, QueryOutcome, QueryStatus, RetryPolicy};

/// Dispatch configuration
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Engine used for every query of the run
    pub engine: Engine,
    /// Maximum concurrent queries (values below 1 are treated as 1)
    pub workers: usize,
    /// Per-query retry policy
    pub retry: RetryPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            workers: 2,
            retry: RetryPolicy::default(),
        }
    }
}

/// What happened to one query
#[derive(Debug, Clone)]
pub enum QueryReport {
    /// The retry loop reached a terminal state
    Finished(QueryOutcome),
    /// The query's task died before finishing
    Faulted { query: String, error: String },
}

impl QueryReport {
    pub fn query(&self) -> &str {
        match self {
            QueryReport::Finished(outcome) => &outcome.query,
            QueryReport::Faulted { query, .. } => query,
        }
    }

    pub fn link_count(&self) -> usize {
        match self {
            QueryReport::Finished(outcome) => outcome.links.len(),
            QueryReport::Faulted { .. } => 0,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, QueryReport::Finished(outcome) if outcome.status() == QueryStatus::Succeeded)
    }
}

/// Observer for dispatch progress. Purely informational.
pub trait ProgressReporter {
    fn on_start(&self, _total: usize) {}

    fn on_query_finished(&self, _report: &QueryReport, _completed: usize, _total: usize) {}

    fn on_finish(&self, _report: &DispatchReport) {}
}

/// Reporter that ignores every event
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// Aggregate result of a run
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    /// Union of every successful query's links
    pub links: LinkSet,
    pub total_queries: usize,
    pub succeeded: usize,
    pub exhausted: usize,
    pub faulted: usize,
}

/// Runs a dork list through a shared executor
pub struct Dispatcher {
    executor: Arc<dyn QueryExecutor>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(executor: Arc<dyn QueryExecutor>, config: DispatchConfig) -> Self {
        Self { executor, config }
    }

    /// Run every query to a terminal state and return the merged links
    pub async fn run(&self, queries: Vec<String>, progress: &dyn ProgressReporter) -> DispatchReport {
        let total = queries.len();
        let workers = self.config.workers.max(1);
        let accumulator = Arc::new(Mutex::new(LinkSet::new()));

        info!(
            total,
            workers,
            engine = %self.config.engine,
            "Starting dispatch"
        );
        progress.on_start(total);

        let mut report = DispatchReport {
            total_queries: total,
            ..Default::default()
        };

        let mut completions = stream::iter(queries)
            .map(|query| self.spawn_query(query, Arc::clone(&accumulator)))
            .buffer_unordered(workers);

        let mut completed = 0;
        while let Some(query_report) = completions.next().await {
            completed += 1;

            match &query_report {
                QueryReport::Finished(outcome) => match outcome.status() {
                    QueryStatus::Succeeded => report.succeeded += 1,
                    QueryStatus::Exhausted => report.exhausted += 1,
                },
                QueryReport::Faulted { .. } => report.faulted += 1,
            }

            debug!(completed, total, "Query finished: {}", query_report.query());
            progress.on_query_finished(&query_report, completed, total);
        }
        drop(completions);

        report.links = std::mem::take(&mut *accumulator.lock());

        info!(
            links = report.links.len(),
            succeeded = report.succeeded,
            exhausted = report.exhausted,
            faulted = report.faulted,
            "Dispatch complete"
        );
        progress.on_finish(&report);

        report
    }

    /// Run one query in its own task so a panic stays contained
    async fn spawn_query(&self, query: String, accumulator: Arc<Mutex<LinkSet>>) -> QueryReport {
        let executor = Arc::clone(&self.executor);
        let engine = self.config.engine;
        let policy = self.config.retry.clone();
        let task_query = query.clone();

        let handle = tokio::spawn(async move {
            let outcome = run_query(executor.as_ref(), engine, &task_query, &policy).await;
            if !outcome.links.is_empty() {
                accumulator.lock().extend(outcome.links.iter().cloned());
            }
            outcome
        });

        match handle.await {
            Ok(outcome) => QueryReport::Finished(outcome),
            Err(e) => {
                warn!("Unexpected error for {}: {}", query, e);
                QueryReport::Faulted {
                    query,
                    error: e.to_string(),
                }
            }
        }
    }
}
