// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Untrusted tracking request bodies.

use crate::carriers::CarrierId;
use crate::error::ValidationError;
use crate::types::TrackingIdentifier;
use serde::Deserialize;

/// `{ "carrier": "...", "trackingNumber": "..." }` as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
}

impl TrackRequest {
    pub fn new(carrier: impl Into<String>, tracking_number: impl Into<String>) -> Self {
        Self {
            carrier: Some(carrier.into()),
            tracking_number: Some(tracking_number.into()),
        }
    }

    /// Check presence first, then the carrier id.
    pub fn validate(&self) -> Result<TrackingIdentifier, ValidationError> {
        let carrier =
            present(self.carrier.as_deref()).ok_or(ValidationError::MissingField("carrier"))?;
        let number = present(self.tracking_number.as_deref())
            .ok_or(ValidationError::MissingField("trackingNumber"))?;

        let carrier: CarrierId = carrier.parse()?;
        Ok(TrackingIdentifier::new(carrier, number))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
