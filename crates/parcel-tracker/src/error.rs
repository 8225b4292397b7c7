// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for tracking lookups.
//!
//! Only [`ValidationError`] ever reaches a caller as a failure. Everything
//! else is absorbed by the orchestrator into a degraded result.

use std::time::Duration;

/// A malformed tracking request. Fatal to the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unsupported carrier: {0}")]
    UnsupportedCarrier(String),
}

impl ValidationError {
    /// Message shown to end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "Please enter both the tracking number and the carrier.",
            Self::UnsupportedCarrier(_) => "Unsupported carrier.",
        }
    }
}

/// Failure of a single source attempt. Recovered by advancing the chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("carrier has no record of this tracking number")]
    NoData,

    #[error("source timed out")]
    Timeout,
}

/// The timeline assembler was handed nothing to assemble.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssembleError {
    #[error("source returned no events")]
    NoEvents,
}

/// Why a lookup fell through to synthetic data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExhaustionCause {
    #[error("carrier has no real-time source")]
    Unsupported,

    #[error("every source failed, last error: {0}")]
    Fetch(FetchError),

    #[error("global deadline of {}ms elapsed", .0.as_millis())]
    GlobalTimeout(Duration),
}

impl ExhaustionCause {
    /// Human-readable explanation placed in the result's `error` field.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unsupported => {
                "Real-time tracking is not supported for this carrier yet; showing estimated data."
            }
            Self::Fetch(FetchError::NoData) => {
                "No tracking information was found for this tracking number. \
                 Check the number or try again later if it was registered recently."
            }
            Self::Fetch(FetchError::Timeout) | Self::GlobalTimeout(_) => {
                "The carrier's tracking service timed out; showing estimated data. \
                 Please try again shortly."
            }
            Self::Fetch(FetchError::Unavailable(_)) => {
                "Failed to retrieve tracking information from the carrier; showing estimated data."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_messages_mention_timeout() {
        let global = ExhaustionCause::GlobalTimeout(Duration::from_secs(10));
        let attempt = ExhaustionCause::Fetch(FetchError::Timeout);
        assert!(global.user_message().contains("timed out"));
        assert_eq!(global.user_message(), attempt.user_message());
        assert_eq!(global.to_string(), "global deadline of 10000ms elapsed");
    }

    #[test]
    fn test_messages_are_distinct_per_class() {
        let no_data = ExhaustionCause::Fetch(FetchError::NoData).user_message();
        let down = ExhaustionCause::Fetch(FetchError::Unavailable("503".into())).user_message();
        let unsupported = ExhaustionCause::Unsupported.user_message();
        assert_ne!(no_data, down);
        assert_ne!(down, unsupported);
        assert!(no_data.contains("No tracking information"));
        assert!(unsupported.contains("not supported"));
    }

    #[test]
    fn test_validation_messages() {
        assert!(ValidationError::MissingField("carrier")
            .user_message()
            .contains("tracking number"));
        assert_eq!(
            ValidationError::UnsupportedCarrier("x".into()).to_string(),
            "unsupported carrier: x"
        );
    }
}
