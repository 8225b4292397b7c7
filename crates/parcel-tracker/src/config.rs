// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration and environment resolution.
//!
//! Values resolve as: explicit setting > `PARCEL_TRACKER_*` environment
//! variable > built-in default.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Upstream JSON tracking API shared by most large carriers.
pub const DEFAULT_TRACKER_API_BASE: &str = "https://apis.tracker.delivery";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                  AppleWebKit/537.36 (KHTML, like Gecko) \
                                  Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock budget for a whole lookup.
    pub deadline_ms: u64,
    /// Upper bound for one source attempt.
    pub max_attempt_ms: u64,
    /// Lower bound for one source attempt (still capped by the remaining budget).
    pub min_attempt_ms: u64,
    pub tracker_api_base: String,
    /// Replacement origins for scraped sites, keyed by source name.
    pub origin_overrides: HashMap<String, String>,
    pub user_agent: String,
    /// Fixed seed for synthetic data. `None` draws from OS entropy.
    pub synthetic_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            deadline_ms: 10_000,
            max_attempt_ms: 6_000,
            min_attempt_ms: 1_500,
            tracker_api_base: DEFAULT_TRACKER_API_BASE.to_string(),
            origin_overrides: HashMap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            synthetic_seed: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with whatever `PARCEL_TRACKER_*` variables are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_u64(&lookup, "PARCEL_TRACKER_DEADLINE_MS") {
            config.deadline_ms = ms;
        }
        if let Some(ms) = parse_u64(&lookup, "PARCEL_TRACKER_MAX_ATTEMPT_MS") {
            config.max_attempt_ms = ms;
        }
        if let Some(ms) = parse_u64(&lookup, "PARCEL_TRACKER_MIN_ATTEMPT_MS") {
            config.min_attempt_ms = ms;
        }
        if let Some(seed) = parse_u64(&lookup, "PARCEL_TRACKER_SEED") {
            config.synthetic_seed = Some(seed);
        }
        if let Some(base) = non_empty(&lookup, "PARCEL_TRACKER_API_BASE") {
            config.tracker_api_base = base;
        }
        if let Some(ua) = non_empty(&lookup, "PARCEL_TRACKER_USER_AGENT") {
            config.user_agent = ua;
        }
        // Format: "epost=http://127.0.0.1:9000,lotte=http://127.0.0.1:9001"
        if let Some(raw) = non_empty(&lookup, "PARCEL_TRACKER_ORIGINS") {
            for pair in raw.split(',') {
                if let Some((name, origin)) = pair.split_once('=') {
                    let (name, origin) = (name.trim(), origin.trim());
                    if !name.is_empty() && !origin.is_empty() {
                        config
                            .origin_overrides
                            .insert(name.to_string(), origin.to_string());
                    }
                }
            }
        }

        config
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    pub fn max_attempt(&self) -> Duration {
        Duration::from_millis(self.max_attempt_ms)
    }

    pub fn min_attempt(&self) -> Duration {
        Duration::from_millis(self.min_attempt_ms)
    }

    /// Origin to use for a scraped source, honoring overrides.
    pub fn origin_for<'a>(&'a self, source: &str, default_origin: &'a str) -> &'a str {
        self.origin_overrides
            .get(source)
            .map(String::as_str)
            .unwrap_or(default_origin)
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring non-numeric configuration value");
            None
        }
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
}
