//! Per-query retry loop
//!
//! A query moves Pending → Attempting → {Succeeded, Exhausted}. Every kind
//! of miss (rate limit, HTTP error, transport fault, empty page) is treated
//! the same: wait a random delay and try again until attempts run out.

use std::fmt;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use tordork_core::{extract_links, Engine, LinkSet};
use tordork_tor::{FetchError, QueryExecutor};

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per query, including the first (at least 1 is always made)
    pub max_attempts: u32,
    /// Lower bound of the inter-attempt delay
    pub min_delay: Duration,
    /// Upper bound of the inter-attempt delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(15),
        }
    }
}

impl RetryPolicy {
    /// Policy that retries without sleeping
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Draw a delay uniformly from the configured window
    pub fn random_delay(&self) -> Duration {
        let (low, high) = if self.min_delay <= self.max_delay {
            (self.min_delay, self.max_delay)
        } else {
            (self.max_delay, self.min_delay)
        };

        if low == high {
            return low;
        }
        rand::thread_rng().gen_range(low..=high)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Why the most recent attempt did not yield links
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The request itself failed
    Fetch(FetchError),
    /// The page loaded but held no usable links
    Empty,
}

impl AttemptFailure {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AttemptFailure::Fetch(e) if e.is_rate_limited())
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Fetch(e) => write!(f, "{}", e),
            AttemptFailure::Empty => f.write_str("no links extracted"),
        }
    }
}

/// Terminal state of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Succeeded,
    Exhausted,
}

/// Result of running one query to completion
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub query: String,
    /// Links from the successful attempt; empty when exhausted
    pub links: LinkSet,
    /// Attempts actually made
    pub attempts: u32,
    /// Failure of the last attempt, if it failed
    pub last_failure: Option<AttemptFailure>,
}

impl QueryOutcome {
    pub fn status(&self) -> QueryStatus {
        if self.links.is_empty() {
            QueryStatus::Exhausted
        } else {
            QueryStatus::Succeeded
        }
    }
}

/// Run `query` against `engine` until it yields links or attempts run out.
///
/// Never fails: exhaustion is reported as an outcome with an empty link set.
pub async fn run_query(
    executor: &dyn QueryExecutor,
    engine: Engine,
    query: &str,
    policy: &RetryPolicy,
) -> QueryOutcome {
    let max_attempts = policy.attempts();
    let mut last_failure = None;

    for attempt in 1..=max_attempts {
        let failure = match executor.search(engine, query).await {
            Ok(body) => {
                let links = extract_links(&body);
                if !links.is_empty() {
                    debug!(attempt, count = links.len(), "Query succeeded: {}", query);
                    return QueryOutcome {
                        query: query.to_string(),
                        links,
                        attempts: attempt,
                        last_failure: None,
                    };
                }
                AttemptFailure::Empty
            }
            Err(e) => AttemptFailure::Fetch(e),
        };

        if failure.is_rate_limited() {
            warn!(attempt, max_attempts, "Rate limited on: {}", query);
        } else {
            debug!(attempt, max_attempts, "Attempt failed for {}: {}", query, failure);
        }
        last_failure = Some(failure);

        if attempt < max_attempts {
            let delay = policy.random_delay();
            debug!("Retrying in {:.1}s", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
    }

    QueryOutcome {
        query: query.to_string(),
        links: LinkSet::new(),
        attempts: max_attempts,
        last_failure,
    }
}
