// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core data types shared by every stage of a tracking lookup.

use crate::carriers::CarrierId;
use crate::vocabulary::Wording;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Korea Standard Time offset, in seconds east of UTC.
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Fixed UTC+9 offset used by every Korean carrier page.
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// A validated (carrier, tracking number) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingIdentifier {
    pub carrier: CarrierId,
    pub tracking_number: String,
}

impl TrackingIdentifier {
    pub fn new(carrier: CarrierId, tracking_number: impl Into<String>) -> Self {
        Self {
            carrier,
            tracking_number: tracking_number.into(),
        }
    }
}

/// Carrier-independent delivery stage.
///
/// `Received` through `Delivered` form the on-path timeline used for stage
/// highlighting. `Failed`, `OnHold` and `Unknown` sit off that path and have
/// no stage index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    Received,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Failed,
    OnHold,
    Unknown,
}

impl CanonicalStatus {
    /// Every on-path status, in timeline order.
    pub const TIMELINE: [CanonicalStatus; 5] = [
        CanonicalStatus::Received,
        CanonicalStatus::PickedUp,
        CanonicalStatus::InTransit,
        CanonicalStatus::OutForDelivery,
        CanonicalStatus::Delivered,
    ];

    /// Position on the delivery timeline, `None` for off-path statuses.
    pub fn stage(self) -> Option<u8> {
        match self {
            Self::Received => Some(0),
            Self::PickedUp => Some(1),
            Self::InTransit => Some(2),
            Self::OutForDelivery => Some(3),
            Self::Delivered => Some(4),
            Self::Failed | Self::OnHold | Self::Unknown => None,
        }
    }

    /// Whether `self` has reached `other` on the timeline.
    ///
    /// Off-path statuses are not comparable and always return `false`.
    pub fn has_reached(self, other: CanonicalStatus) -> bool {
        match (self.stage(), other.stage()) {
            (Some(a), Some(b)) => a >= b,
            _ => false,
        }
    }

    /// The parcel will see no further events.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Stable machine identifier (matches the serialized form).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::PickedUp => "picked_up",
            Self::InTransit => "in_transit",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::OnHold => "on_hold",
            Self::Unknown => "unknown",
        }
    }

    /// Korean display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Received => "택배 접수됨",
            Self::PickedUp => "집화처리",
            Self::InTransit => "배송중",
            Self::OutForDelivery => "배송출발",
            Self::Delivered => "배송완료",
            Self::Failed => "배송 실패",
            Self::OnHold => "보류 중",
            Self::Unknown => "알 수 없음",
        }
    }
}

/// One milestone exactly as a source reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub timestamp: DateTime<Utc>,
    pub raw_location: Option<String>,
    pub raw_status_text: String,
    pub raw_description: Option<String>,
}

/// Everything a single successful source call produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTrack {
    pub events: Vec<RawEvent>,
    pub sender_name: Option<String>,
    pub receiver_name: Option<String>,
    /// ETA reported by the source itself, if any.
    pub estimated_delivery: Option<DateTime<Utc>>,
    /// Vocabulary the status texts are written in.
    pub wording: Wording,
}

impl From<Vec<RawEvent>> for RawTrack {
    fn from(events: Vec<RawEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }
}

/// A classified timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    pub time: DateTime<Utc>,
    pub location: Option<String>,
    pub status: CanonicalStatus,
    pub description: String,
}

/// The normalized answer to one tracking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResult {
    pub carrier: CarrierId,
    /// Newest first.
    #[serde(rename = "progresses")]
    pub events: Vec<TrackingEvent>,
    pub current_status: CanonicalStatus,
    pub current_location: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub sender_name: Option<String>,
    pub receiver_name: Option<String>,
    pub degraded: bool,
    pub error: Option<String>,
    /// Name of the source that produced the data.
    pub source: Option<String>,
}

impl TrackingResult {
    pub fn is_delivered(&self) -> bool {
        self.current_status == CanonicalStatus::Delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let stages: Vec<u8> = CanonicalStatus::TIMELINE
            .iter()
            .filter_map(|s| s.stage())
            .collect();
        assert_eq!(stages, vec![0, 1, 2, 3, 4]);
        assert!(CanonicalStatus::Failed.stage().is_none());
        assert!(CanonicalStatus::OnHold.stage().is_none());
        assert!(CanonicalStatus::Unknown.stage().is_none());
    }

    #[test]
    fn test_has_reached() {
        assert!(CanonicalStatus::Delivered.has_reached(CanonicalStatus::InTransit));
        assert!(CanonicalStatus::PickedUp.has_reached(CanonicalStatus::PickedUp));
        assert!(!CanonicalStatus::Received.has_reached(CanonicalStatus::PickedUp));
        assert!(!CanonicalStatus::Failed.has_reached(CanonicalStatus::Received));
        assert!(!CanonicalStatus::Delivered.has_reached(CanonicalStatus::OnHold));
    }

    #[test]
    fn test_only_delivered_is_terminal() {
        let terminal: Vec<_> = CanonicalStatus::TIMELINE
            .into_iter()
            .chain([CanonicalStatus::Failed, CanonicalStatus::OnHold, CanonicalStatus::Unknown])
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![CanonicalStatus::Delivered]);
    }

    #[test]
    fn test_status_serializes_as_snake_case() {
        let json = serde_json::to_string(&CanonicalStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"out_for_delivery\"");
        assert_eq!(CanonicalStatus::OutForDelivery.as_str(), "out_for_delivery");
    }

    #[test]
    fn test_result_serializes_events_as_progresses() {
        let result = TrackingResult {
            carrier: CarrierId::Lotte,
            events: vec![TrackingEvent {
                time: Utc::now(),
                location: Some("서울".to_string()),
                status: CanonicalStatus::InTransit,
                description: "간선상차".to_string(),
            }],
            current_status: CanonicalStatus::InTransit,
            current_location: Some("서울".to_string()),
            estimated_delivery: None,
            delivered_at: None,
            sender_name: None,
            receiver_name: None,
            degraded: false,
            error: None,
            source: Some("lotte".to_string()),
        };
        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["carrier"], "lotte");
        assert_eq!(v["progresses"].as_array().unwrap().len(), 1);
        assert_eq!(v["currentStatus"], "in_transit");
        assert!(v.get("events").is_none());
    }

    #[test]
    fn test_kst_offset() {
        assert_eq!(kst().local_minus_utc(), 9 * 3600);
    }
}
