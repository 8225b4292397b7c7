// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Source adapters: one per (carrier, upstream) pair.
//!
//! Every adapter turns a tracking number into a [`RawTrack`] or a
//! [`FetchError`]. The synthetic generator sits outside the trait because it
//! cannot fail and is only ever the terminal entry of a chain.

pub mod http_client;
pub mod profiles;
pub mod scrape;
pub mod structured_api;
pub mod synthetic;

use crate::error::FetchError;
use crate::types::RawTrack;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

pub use http_client::HttpClient;
pub use scrape::DocumentScrapeAdapter;
pub use structured_api::StructuredApiAdapter;
pub use synthetic::SyntheticAdapter;

/// What kind of upstream an adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    StructuredApi,
    DocumentScrape,
    Synthetic,
}

/// A single upstream tracking source.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short stable name, used in logs and as the result's `source`.
    fn name(&self) -> &str;
    fn kind(&self) -> SourceKind;
    /// Fetch raw events. `budget` bounds the upstream call; the orchestrator
    /// also cancels the whole future when the budget runs out.
    async fn fetch(&self, tracking_number: &str, budget: Duration) -> Result<RawTrack, FetchError>;
}

/// Map a transport-level failure onto the fetch taxonomy.
pub(crate) fn transport_error(source: &str, err: anyhow::Error) -> FetchError {
    if http_client::is_timeout(&err) {
        FetchError::Timeout
    } else {
        FetchError::Unavailable(format!("{source}: {err}"))
    }
}

/// Percent-encode a tracking number for use inside a URL path.
pub(crate) fn encode_path_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}
