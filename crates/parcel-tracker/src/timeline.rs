// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Timeline assembly: raw source events in, canonical [`TrackingResult`] out.
//!
//! Assembly is a pure fold. Every event is classified first, the list is
//! stably sorted newest-first, and the current state is read off the head.

use crate::carriers::CarrierId;
use crate::error::AssembleError;
use crate::types::{CanonicalStatus, RawEvent, RawTrack, TrackingEvent, TrackingResult};
use crate::vocabulary::{self, Wording};
use chrono::{DateTime, Utc};

/// Build a result from one source's raw output.
///
/// An empty event list is an error: a source that "succeeds" with nothing is
/// a failed attempt as far as the fallback chain is concerned.
pub fn assemble(
    carrier: CarrierId,
    track: RawTrack,
    now: DateTime<Utc>,
) -> Result<TrackingResult, AssembleError> {
    if track.events.is_empty() {
        return Err(AssembleError::NoEvents);
    }

    let events = track
        .events
        .into_iter()
        .map(|raw| classify_event(track.wording, carrier, raw))
        .collect();

    Ok(from_events(
        carrier,
        events,
        Parties {
            sender: track.sender_name,
            receiver: track.receiver_name,
        },
        track.estimated_delivery,
        now,
    ))
}

/// Sender/receiver names carried through to the result.
#[derive(Debug, Clone, Default)]
pub(crate) struct Parties {
    pub sender: Option<String>,
    pub receiver: Option<String>,
}

/// Derive current status, location and dates from already-classified events.
pub(crate) fn from_events(
    carrier: CarrierId,
    mut events: Vec<TrackingEvent>,
    parties: Parties,
    source_eta: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> TrackingResult {
    // sort_by is stable: equal timestamps keep source order.
    events.sort_by(|a, b| b.time.cmp(&a.time));

    let (current_status, current_location, head_time) = match events.first() {
        Some(head) => (head.status, head.location.clone(), Some(head.time)),
        None => (CanonicalStatus::Unknown, None, None),
    };

    let delivered = current_status.is_terminal();
    let delivered_at = if delivered { head_time } else { None };
    let estimated_delivery = if delivered {
        None
    } else {
        Some(source_eta.unwrap_or_else(|| now + carrier.default_lead_time()))
    };

    TrackingResult {
        carrier,
        events,
        current_status,
        current_location,
        estimated_delivery,
        delivered_at,
        sender_name: parties.sender,
        receiver_name: parties.receiver,
        degraded: false,
        error: None,
        source: None,
    }
}

fn classify_event(wording: Wording, carrier: CarrierId, raw: RawEvent) -> TrackingEvent {
    let status = vocabulary::match_worded(wording, carrier, &raw.raw_status_text)
        .or_else(|| {
            raw.raw_description
                .as_deref()
                .and_then(|d| vocabulary::match_worded(wording, carrier, d))
        })
        .unwrap_or_else(|| vocabulary::classify_worded(wording, carrier, &raw.raw_status_text));

    let description = raw
        .raw_description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| raw.raw_status_text.clone());

    TrackingEvent {
        time: raw.timestamp,
        location: non_blank(raw.raw_location),
        status,
        description,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
