// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy for fallible actions
//!
//! On failure the executor asks its consultants, in registration order, what
//! to do. The first consultant with a proposal decides; retry bookkeeping is
//! scoped to a single `execute_resilient` call.

use sechub_adapters::AdapterError;
use sechub_core::ResilienceSettings;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// What a consultant sees about a failure
#[derive(Debug)]
pub struct ResilienceContext<'a, E> {
    pub error: &'a E,
    /// Retries already spent in this `execute_resilient` call
    pub already_retried: u32,
}

/// A consultant's decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResilienceProposal {
    /// Retry after `wait`, at most `max_retries` times in total
    Retry { max_retries: u32, wait: Duration },
    /// The failure is permanent; stop without asking anyone else
    Fallthrough,
}

/// Pure policy function; `None` leaves the decision to the next consultant
pub type Consultant<E> =
    Box<dyn Fn(&ResilienceContext<'_, E>) -> Option<ResilienceProposal> + Send + Sync>;

/// Terminal failure of a resilient action
#[derive(Debug, Error)]
pub enum ResilienceError<E> {
    #[error("gave up after {retries} retries: {source}")]
    Exhausted {
        retries: u32,
        #[source]
        source: E,
    },
    #[error("not retryable: {0}")]
    NotRetryable(#[source] E),
    #[error("permanent failure: {0}")]
    FellThrough(#[source] E),
}

impl<E> ResilienceError<E> {
    /// The error of the last attempt
    pub fn last_error(&self) -> &E {
        match self {
            ResilienceError::Exhausted { source, .. } => source,
            ResilienceError::NotRetryable(source) | ResilienceError::FellThrough(source) => source,
        }
    }
}

/// Result of a successful resilient action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResilientOutcome<T> {
    pub value: T,
    /// Retries needed before the action succeeded
    pub retries: u32,
}

/// Runs actions under an ordered list of consultants
pub struct ResilientActionExecutor<E> {
    consultants: Vec<Consultant<E>>,
}

impl<E> Default for ResilientActionExecutor<E> {
    fn default() -> Self {
        Self {
            consultants: Vec::new(),
        }
    }
}

impl<E: std::fmt::Display> ResilientActionExecutor<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a consultant after the existing ones
    pub fn with_consultant(
        mut self,
        consultant: impl Fn(&ResilienceContext<'_, E>) -> Option<ResilienceProposal>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.consultants.push(Box::new(consultant));
        self
    }

    fn consult(&self, context: &ResilienceContext<'_, E>) -> Option<ResilienceProposal> {
        self.consultants.iter().find_map(|consultant| consultant(context))
    }

    /// Run `action` until it succeeds or the consultants give up
    ///
    /// The action is invoked afresh for every attempt; it is not assumed to be
    /// idempotent.
    pub async fn execute_resilient<T, F, Fut>(
        &self,
        mut action: F,
    ) -> Result<ResilientOutcome<T>, ResilienceError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut retried = 0;
        loop {
            let error = match action().await {
                Ok(value) => {
                    return Ok(ResilientOutcome {
                        value,
                        retries: retried,
                    })
                }
                Err(error) => error,
            };

            let proposal = self.consult(&ResilienceContext {
                error: &error,
                already_retried: retried,
            });
            match proposal {
                None => return Err(ResilienceError::NotRetryable(error)),
                Some(ResilienceProposal::Fallthrough) => {
                    tracing::debug!(error = %error, "failure is permanent");
                    return Err(ResilienceError::FellThrough(error));
                }
                Some(ResilienceProposal::Retry { max_retries, .. }) if retried >= max_retries => {
                    return Err(ResilienceError::Exhausted {
                        retries: retried,
                        source: error,
                    });
                }
                Some(ResilienceProposal::Retry { max_retries, wait }) => {
                    retried += 1;
                    tracing::warn!(
                        attempt = retried,
                        max_retries,
                        wait_ms = wait.as_millis() as u64,
                        error = %error,
                        "action failed, retrying"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

/// Policy for calls to a product delegation server
///
/// Transport trouble (unreachable, timeout, 5xx, 429) is retried; any other
/// 4xx answer is a permanent rejection.
pub fn pds_consultant(
    settings: ResilienceSettings,
) -> impl Fn(&ResilienceContext<'_, AdapterError>) -> Option<ResilienceProposal> + Send + Sync + 'static
{
    let retry = ResilienceProposal::Retry {
        max_retries: settings.max_retries,
        wait: settings.retry_wait,
    };
    move |context| match context.error {
        AdapterError::Unreachable(_) | AdapterError::Timeout(_) => Some(retry),
        AdapterError::Http { status, .. } if *status >= 500 || *status == 429 => Some(retry),
        AdapterError::Http { status, .. } if (400..500).contains(status) => {
            Some(ResilienceProposal::Fallthrough)
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "resilience_tests.rs"]
mod tests;
