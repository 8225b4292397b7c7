// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! JSON tracking API shared by most large Korean carriers.

use super::http_client::HttpClient;
use super::{encode_path_segment, transport_error, SourceAdapter, SourceKind};
use crate::error::FetchError;
use crate::types::{RawEvent, RawTrack};
use crate::vocabulary::Wording;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const NAME: &str = "tracker-api";

const ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";
const REFERER: &str = "https://tracker.delivery/";
const ORIGIN: &str = "https://tracker.delivery";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTrack {
    #[serde(default)]
    from: Option<ApiParty>,
    #[serde(default)]
    to: Option<ApiParty>,
    #[serde(default)]
    estimated_delivery_at: Option<String>,
    #[serde(default)]
    progresses: Vec<ApiProgress>,
}

#[derive(Debug, Deserialize)]
struct ApiParty {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiProgress {
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    location: Option<ApiNamed>,
    #[serde(default)]
    status: Option<ApiStatus>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiNamed {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    text: Option<String>,
}

/// Client for `GET {base}/carriers/{code}/tracks/{number}`.
pub struct StructuredApiAdapter {
    carrier_code: &'static str,
    base: String,
    http: HttpClient,
}

impl StructuredApiAdapter {
    pub fn new(carrier_code: &'static str, base: impl Into<String>, http: HttpClient) -> Self {
        Self {
            carrier_code,
            base: base.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    fn url(&self, tracking_number: &str) -> String {
        format!(
            "{}/carriers/{}/tracks/{}",
            self.base,
            self.carrier_code,
            encode_path_segment(tracking_number)
        )
    }
}

#[async_trait]
impl SourceAdapter for StructuredApiAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::StructuredApi
    }

    async fn fetch(&self, tracking_number: &str, budget: Duration) -> Result<RawTrack, FetchError> {
        let headers = [
            ("Accept", "application/json"),
            ("Accept-Language", ACCEPT_LANGUAGE),
            ("Referer", REFERER),
            ("Origin", ORIGIN),
        ];

        let response = self
            .http
            .get(&self.url(tracking_number), &[], &headers, budget)
            .await
            .map_err(|e| transport_error(NAME, e))?;

        match response.status {
            404 => return Err(FetchError::NoData),
            s if !response.is_success() => {
                return Err(FetchError::Unavailable(format!("{NAME}: HTTP {s}")));
            }
            _ => {}
        }

        parse_api_track(&response.body, Utc::now())
    }
}

/// Parse an API response body into a raw track.
///
/// An empty `progresses` list is [`FetchError::NoData`]; unparseable event
/// times fall back to `now`.
pub fn parse_api_track(body: &str, now: DateTime<Utc>) -> Result<RawTrack, FetchError> {
    let track: ApiTrack = serde_json::from_str(body)
        .map_err(|e| FetchError::Unavailable(format!("{NAME}: malformed response: {e}")))?;

    if track.progresses.is_empty() {
        return Err(FetchError::NoData);
    }

    let events = track
        .progresses
        .into_iter()
        .map(|p| RawEvent {
            timestamp: p
                .time
                .as_deref()
                .and_then(parse_rfc3339)
                .unwrap_or_else(|| {
                    debug!(value = ?p.time, "unparseable progress time, using now");
                    now
                }),
            raw_location: p.location.and_then(|l| l.name),
            raw_status_text: p.status.and_then(|s| s.text).unwrap_or_default(),
            raw_description: p.description,
        })
        .collect();

    Ok(RawTrack {
        events,
        sender_name: track.from.and_then(|p| p.name).filter(|n| !n.is_empty()),
        receiver_name: track.to.and_then(|p| p.name).filter(|n| !n.is_empty()),
        estimated_delivery: track.estimated_delivery_at.as_deref().and_then(parse_rfc3339),
        wording: Wording::TrackerApi,
    })
}

fn parse_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
