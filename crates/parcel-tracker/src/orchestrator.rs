// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Deadline-bounded walk over a fallback chain.
//!
//! A lookup is a small state machine: `Trying(i)` attempts source `i` with a
//! slice of the remaining budget, moving to `Succeeded` on the first source
//! that yields events or to `Trying(i + 1)` on any failure. Running out of
//! sources is `Exhausted`. The whole walk races the global deadline; when
//! the deadline wins, the walk future (and any in-flight request) is dropped.
//! Exhaustion of any kind is answered with synthetic data, so
//! [`Orchestrator::track`] never fails.

use crate::chain::{build_chain, FallbackChain};
use crate::config::EngineConfig;
use crate::error::{ExhaustionCause, FetchError};
use crate::sources::{HttpClient, SourceAdapter};
use crate::timeline;
use crate::types::{TrackingIdentifier, TrackingResult};
use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

enum ChainState {
    Trying(usize),
    Succeeded(TrackingResult),
    Exhausted(ExhaustionCause),
}

/// Runs tracking lookups. Cheap to share behind an `Arc`.
pub struct Orchestrator {
    config: EngineConfig,
    http: HttpClient,
}

impl Orchestrator {
    pub fn new(config: EngineConfig) -> Self {
        let http = HttpClient::new(&config.user_agent);
        Self { config, http }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn chain_for(&self, id: &TrackingIdentifier) -> FallbackChain {
        build_chain(id.carrier, &self.config, &self.http)
    }

    /// Look up one tracking number. Always returns within the configured
    /// deadline (plus scheduling slack).
    pub async fn track(&self, id: &TrackingIdentifier) -> TrackingResult {
        let chain = self.chain_for(id);
        self.run(&chain, id).await
    }

    /// Walk an explicit chain.
    pub async fn run(&self, chain: &FallbackChain, id: &TrackingIdentifier) -> TrackingResult {
        let started = Instant::now();
        let deadline = self.config.deadline();

        let outcome = match tokio::time::timeout(deadline, self.walk(chain, id, started)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    carrier = %id.carrier,
                    deadline_ms = deadline.as_millis() as u64,
                    "global deadline elapsed"
                );
                Err(ExhaustionCause::GlobalTimeout(deadline))
            }
        };

        let result = match outcome {
            Ok(result) => result,
            Err(cause) => {
                let mut result = chain.terminal().generate(id, Utc::now());
                result.error = Some(cause.user_message().to_string());
                debug!(carrier = %id.carrier, cause = %cause, "serving synthetic data");
                result
            }
        };

        info!(
            carrier = %id.carrier,
            source = result.source.as_deref().unwrap_or("none"),
            status = result.current_status.as_str(),
            degraded = result.degraded,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "lookup finished"
        );

        result
    }

    async fn walk(
        &self,
        chain: &FallbackChain,
        id: &TrackingIdentifier,
        started: Instant,
    ) -> Result<TrackingResult, ExhaustionCause> {
        let sources = chain.sources();
        let deadline = self.config.deadline();
        let mut last_error: Option<FetchError> = None;

        let mut state = if sources.is_empty() {
            ChainState::Exhausted(ExhaustionCause::Unsupported)
        } else {
            ChainState::Trying(0)
        };

        loop {
            state = match state {
                ChainState::Trying(i) if i >= sources.len() => ChainState::Exhausted(
                    last_error
                        .take()
                        .map_or(ExhaustionCause::Unsupported, ExhaustionCause::Fetch),
                ),
                ChainState::Trying(i) => {
                    let source = sources[i].as_ref();
                    let remaining = deadline.saturating_sub(started.elapsed());
                    let budget = attempt_budget(
                        remaining,
                        sources.len() - i,
                        self.config.min_attempt(),
                        self.config.max_attempt(),
                    );

                    let attempt_started = Instant::now();
                    let outcome = attempt(source, id, budget).await;
                    let elapsed_ms = attempt_started.elapsed().as_millis() as u64;

                    match outcome {
                        Ok(result) => {
                            info!(
                                source = source.name(),
                                attempt = i + 1,
                                budget_ms = budget.as_millis() as u64,
                                elapsed_ms,
                                outcome = "ok",
                                events = result.events.len(),
                                "source attempt"
                            );
                            ChainState::Succeeded(result)
                        }
                        Err(e) => {
                            warn!(
                                source = source.name(),
                                attempt = i + 1,
                                budget_ms = budget.as_millis() as u64,
                                elapsed_ms,
                                outcome = %e,
                                "source attempt"
                            );
                            last_error = Some(e);
                            ChainState::Trying(i + 1)
                        }
                    }
                }
                ChainState::Succeeded(result) => return Ok(result),
                ChainState::Exhausted(cause) => return Err(cause),
            };
        }
    }
}

async fn attempt(
    source: &dyn SourceAdapter,
    id: &TrackingIdentifier,
    budget: Duration,
) -> Result<TrackingResult, FetchError> {
    let track = match tokio::time::timeout(budget, source.fetch(&id.tracking_number, budget)).await
    {
        Ok(fetched) => fetched?,
        Err(_) => return Err(FetchError::Timeout),
    };

    // A source that "succeeds" with no events is treated like NoData.
    let mut result =
        timeline::assemble(id.carrier, track, Utc::now()).map_err(|_| FetchError::NoData)?;
    result.source = Some(source.name().to_string());
    Ok(result)
}

/// Slice of `remaining` granted to the next attempt.
///
/// An even share of what is left, raised to `min_attempt`, capped by
/// `max_attempt` and by 90% of `remaining` so an attempt can never consume
/// the whole budget.
pub fn attempt_budget(
    remaining: Duration,
    sources_left: usize,
    min_attempt: Duration,
    max_attempt: Duration,
) -> Duration {
    let share = remaining / u32::try_from(sources_left.max(1)).unwrap_or(u32::MAX);
    share
        .max(min_attempt)
        .min(max_attempt)
        .min(remaining.mul_f64(0.9))
}
