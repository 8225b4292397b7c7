// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-carrier status vocabulary.
//!
//! Each carrier owns an ordered keyword table. The first keyword contained in
//! the raw text wins, so specific phrases ("미배달", "배달출발") are listed
//! before the generic words they contain ("배달", "완료"). Carrier tables are
//! never shared: the same word can mean different stages at different
//! carrier sites. Text from the tracker API is worded alike for every
//! carrier and always goes through the generic table.

use crate::carriers::CarrierId;
use crate::types::CanonicalStatus::{self, *};

type Rules = &'static [(&'static str, CanonicalStatus)];

const CJ_RULES: Rules = &[
    ("미배달", Failed),
    ("배달실패", Failed),
    ("보류", OnHold),
    ("집화완료", PickedUp),
    ("집화", PickedUp),
    ("배달완료", Delivered),
    ("배달출발", OutForDelivery),
    ("배송출발", OutForDelivery),
    ("상품인수", Received),
    ("접수", Received),
];

const EPOST_RULES: Rules = &[
    ("미배달", Failed),
    ("배달실패", Failed),
    ("반송", Failed),
    ("보관", OnHold),
    ("보류", OnHold),
    ("접수", Received),
    ("발송", PickedUp),
    ("집하", PickedUp),
    ("배달준비", OutForDelivery),
    ("배달출발", OutForDelivery),
    ("배달완료", Delivered),
];

const LOTTE_RULES: Rules = &[
    ("미배달", Failed),
    ("배달실패", Failed),
    ("보류", OnHold),
    ("배달완료", Delivered),
    ("배달출발", OutForDelivery),
    ("배송출발", OutForDelivery),
    ("집하", PickedUp),
    ("접수", PickedUp),
];

const HANJIN_RULES: Rules = &[
    ("미배달", Failed),
    ("배달실패", Failed),
    ("보류", OnHold),
    ("상품접수", Received),
    ("집하완료", PickedUp),
    ("집하", PickedUp),
    ("배달완료", Delivered),
    ("배송출발", OutForDelivery),
    ("배달출발", OutForDelivery),
];

const LOGEN_RULES: Rules = &[
    ("미배달", Failed),
    ("배달실패", Failed),
    ("보류", OnHold),
    ("접수", Received),
    ("집하", PickedUp),
    ("출발", OutForDelivery),
    ("완료", Delivered),
    ("배달", Delivered),
];

/// Wording of the shared tracker API, used by carriers without their own page.
const GENERIC_RULES: Rules = &[
    ("미배달", Failed),
    ("배달실패", Failed),
    ("보류", OnHold),
    ("집화", PickedUp),
    ("집하", PickedUp),
    ("배달완료", Delivered),
    ("배송완료", Delivered),
    ("완료", Delivered),
    ("배달출발", OutForDelivery),
    ("배송출발", OutForDelivery),
    ("출발", OutForDelivery),
    ("접수", Received),
    ("인수", Received),
];

/// Whose wording a raw track uses.
///
/// Carrier pages use their own terms; the shared tracker API words every
/// carrier's events the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Wording {
    #[default]
    CarrierSite,
    TrackerApi,
}

fn rules_for(wording: Wording, carrier: CarrierId) -> Rules {
    if wording == Wording::TrackerApi {
        return GENERIC_RULES;
    }
    match carrier {
        CarrierId::CjKoreaExpress => CJ_RULES,
        CarrierId::KoreaPost => EPOST_RULES,
        CarrierId::Lotte => LOTTE_RULES,
        CarrierId::Hanjin => HANJIN_RULES,
        CarrierId::Logen => LOGEN_RULES,
        _ => GENERIC_RULES,
    }
}

/// Return the status of the first keyword found in `raw_text`, if any.
pub fn match_status(carrier: CarrierId, raw_text: &str) -> Option<CanonicalStatus> {
    match_worded(Wording::CarrierSite, carrier, raw_text)
}

/// [`match_status`] against an explicit wording.
pub fn match_worded(
    wording: Wording,
    carrier: CarrierId,
    raw_text: &str,
) -> Option<CanonicalStatus> {
    let text = raw_text.trim();
    if text.is_empty() {
        return None;
    }
    rules_for(wording, carrier)
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, status)| *status)
}

/// Classify raw carrier text. Ambiguous text defaults to `InTransit`.
pub fn classify(carrier: CarrierId, raw_text: &str) -> CanonicalStatus {
    classify_worded(Wording::CarrierSite, carrier, raw_text)
}

/// [`classify`] against an explicit wording.
pub fn classify_worded(wording: Wording, carrier: CarrierId, raw_text: &str) -> CanonicalStatus {
    match_worded(wording, carrier, raw_text).unwrap_or(InTransit)
}
