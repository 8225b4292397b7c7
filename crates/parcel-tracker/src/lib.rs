// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parcel Tracker: deadline-bounded tracking lookups across Korean carriers.
//!
//! A lookup walks the carrier's fallback chain (JSON API, carrier web pages,
//! backup pages) under one global deadline and always answers: with real
//! events when any source delivered them, otherwise with clearly marked
//! synthetic data.

pub mod carriers;
pub mod chain;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod request;
pub mod sources;
pub mod timeline;
pub mod types;
pub mod vocabulary;

pub use carriers::CarrierId;
pub use chain::{build_chain, supports_realtime, FallbackChain};
pub use config::EngineConfig;
pub use error::{AssembleError, ExhaustionCause, FetchError, ValidationError};
pub use orchestrator::{attempt_budget, Orchestrator};
pub use request::TrackRequest;
pub use sources::{SourceAdapter, SourceKind};
pub use timeline::assemble;
pub use types::*;
pub use vocabulary::Wording;
