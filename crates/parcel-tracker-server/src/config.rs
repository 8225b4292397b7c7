// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration resolution for the binary: CLI flag > environment > default.

use parcel_tracker::EngineConfig;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Engine configuration with command-line overrides applied.
pub fn resolve_engine_config(deadline_ms: Option<u64>, seed: Option<u64>) -> EngineConfig {
    apply_overrides(EngineConfig::from_env(), deadline_ms, seed)
}

fn apply_overrides(
    mut config: EngineConfig,
    deadline_ms: Option<u64>,
    seed: Option<u64>,
) -> EngineConfig {
    if let Some(ms) = deadline_ms {
        config.deadline_ms = ms;
    }
    if seed.is_some() {
        config.synthetic_seed = seed;
    }
    config
}

/// Resolve the listen address.
pub fn resolve_addr(explicit: Option<&str>) -> String {
    if let Some(addr) = explicit {
        return addr.to_string();
    }

    if let Ok(env_addr) = std::env::var("PARCEL_TRACKER_ADDR") {
        if !env_addr.trim().is_empty() {
            return env_addr.trim().to_string();
        }
    }

    DEFAULT_ADDR.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_base() {
        let base = EngineConfig {
            deadline_ms: 4_000,
            synthetic_seed: Some(1),
            ..EngineConfig::default()
        };

        let config = apply_overrides(base.clone(), Some(800), None);
        assert_eq!(config.deadline_ms, 800);
        assert_eq!(config.synthetic_seed, Some(1));

        let config = apply_overrides(base.clone(), None, Some(99));
        assert_eq!(config.deadline_ms, 4_000);
        assert_eq!(config.synthetic_seed, Some(99));

        assert_eq!(apply_overrides(base.clone(), None, None), base);
    }

    #[test]
    fn test_explicit_addr_wins() {
        assert_eq!(resolve_addr(Some("0.0.0.0:8080")), "0.0.0.0:8080");
    }
}
