// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Placeholder tracking data, used when no real source answered.

use crate::timeline::{self, Parties};
use crate::types::{kst, CanonicalStatus, TrackingEvent, TrackingIdentifier, TrackingResult};
use chrono::{DateTime, Duration, Utc};
use fnv::FnvHasher;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hash::Hasher;

pub const SOURCE_NAME: &str = "synthetic";

const HUBS: &[&str] = &[
    "서울 중랑구 물류센터",
    "경기도 용인시 물류센터",
    "인천 서구 물류센터",
    "부산 사상구 물류센터",
    "대전 유성구 물류센터",
];

const PICKUP_POINT: &str = "집화점";

/// Stages a synthetic track may stop at. Never terminal.
const FINAL_STAGES: [CanonicalStatus; 3] = [
    CanonicalStatus::PickedUp,
    CanonicalStatus::InTransit,
    CanonicalStatus::OutForDelivery,
];

/// Terminal entry of every fallback chain. Cannot fail.
#[derive(Debug, Clone, Default)]
pub struct SyntheticAdapter {
    seed: Option<u64>,
}

impl SyntheticAdapter {
    /// Generator drawing from OS entropy.
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Deterministic generator: the same seed and tracking number always
    /// produce the same track for a given `now`.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Build a degraded result. `error` is left for the caller to fill.
    pub fn generate(&self, id: &TrackingIdentifier, now: DateTime<Utc>) -> TrackingResult {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ fnv1a(&id.tracking_number)),
            None => StdRng::from_entropy(),
        };

        let final_stage = FINAL_STAGES[rng.gen_range(0..FINAL_STAGES.len())];
        let path: Vec<CanonicalStatus> = CanonicalStatus::TIMELINE
            .iter()
            .copied()
            .take_while(|s| !s.has_reached(final_stage) || *s == final_stage)
            .collect();

        // Walk backwards from the newest event.
        let mut events = Vec::with_capacity(path.len());
        let mut at = now - Duration::minutes(rng.gen_range(10..=90));
        for status in path.iter().rev() {
            let location = if *status == CanonicalStatus::Received {
                PICKUP_POINT
            } else {
                HUBS[rng.gen_range(0..HUBS.len())]
            };
            events.push(TrackingEvent {
                time: at,
                location: Some(location.to_string()),
                status: *status,
                description: description(*status).to_string(),
            });
            at -= Duration::hours(rng.gen_range(3..=14));
        }

        let eta = tomorrow_afternoon(now, rng.gen_range(13..=18));

        let mut result = timeline::from_events(id.carrier, events, Parties::default(), eta, now);
        result.degraded = true;
        result.source = Some(SOURCE_NAME.to_string());
        result
    }
}

fn description(status: CanonicalStatus) -> &'static str {
    match status {
        CanonicalStatus::Received => "택배가 접수되었습니다",
        CanonicalStatus::PickedUp => "택배를 집화하였습니다",
        CanonicalStatus::OutForDelivery => "배송 기사님이 배송을 시작하였습니다",
        _ => "배송이 진행중입니다",
    }
}

/// `hour`:00 KST on the day after `now` (in KST).
fn tomorrow_afternoon(now: DateTime<Utc>, hour: u32) -> Option<DateTime<Utc>> {
    now.with_timezone(&kst())
        .date_naive()
        .succ_opt()?
        .and_hms_opt(hour, 0, 0)?
        .and_local_timezone(kst())
        .single()
        .map(|local| local.with_timezone(&Utc))
}

/// Spreads one configured seed across tracking numbers.
fn fnv1a(s: &str) -> u64 {
    let mut hasher = FnvHasher::default();
    hasher.write(s.as_bytes());
    hasher.finish()
}
