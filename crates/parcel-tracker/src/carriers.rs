// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Static carrier catalog: identifiers, display names, tracker API codes
//! and default delivery lead times.

use crate::error::ValidationError;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every carrier the engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarrierId {
    CjKoreaExpress,
    KoreaPost,
    Lotte,
    Hanjin,
    Logen,
    Coupang,
    Kdexp,
    Chunil,
    Cvsnet,
    Cupost,
    Daesin,
    Homepick,
    Handex,
    Honam,
    IlyangLogis,
    Kyungjin,
    NhLogis,
    Sebang,
    Warpex,
    Yellowcap,
}

impl CarrierId {
    pub const ALL: [CarrierId; 20] = [
        CarrierId::CjKoreaExpress,
        CarrierId::KoreaPost,
        CarrierId::Lotte,
        CarrierId::Hanjin,
        CarrierId::Logen,
        CarrierId::Coupang,
        CarrierId::Kdexp,
        CarrierId::Chunil,
        CarrierId::Cvsnet,
        CarrierId::Cupost,
        CarrierId::Daesin,
        CarrierId::Homepick,
        CarrierId::Handex,
        CarrierId::Honam,
        CarrierId::IlyangLogis,
        CarrierId::Kyungjin,
        CarrierId::NhLogis,
        CarrierId::Sebang,
        CarrierId::Warpex,
        CarrierId::Yellowcap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CjKoreaExpress => "cjkoreaexpress",
            Self::KoreaPost => "koreapost",
            Self::Lotte => "lotte",
            Self::Hanjin => "hanjin",
            Self::Logen => "logen",
            Self::Coupang => "coupang",
            Self::Kdexp => "kdexp",
            Self::Chunil => "chunil",
            Self::Cvsnet => "cvsnet",
            Self::Cupost => "cupost",
            Self::Daesin => "daesin",
            Self::Homepick => "homepick",
            Self::Handex => "handex",
            Self::Honam => "honam",
            Self::IlyangLogis => "ilyanglogis",
            Self::Kyungjin => "kyungjin",
            Self::NhLogis => "nhlogis",
            Self::Sebang => "sebang",
            Self::Warpex => "warpex",
            Self::Yellowcap => "yellowcap",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::CjKoreaExpress => "CJ대한통운",
            Self::KoreaPost => "우체국택배",
            Self::Lotte => "롯데택배",
            Self::Hanjin => "한진택배",
            Self::Logen => "로젠택배",
            Self::Coupang => "쿠팡",
            Self::Kdexp => "경동택배",
            Self::Chunil => "천일택배",
            Self::Cvsnet => "GS편의점택배",
            Self::Cupost => "CU편의점택배",
            Self::Daesin => "대신택배",
            Self::Homepick => "홈픽",
            Self::Handex => "한덱스",
            Self::Honam => "호남택배",
            Self::IlyangLogis => "일양로지스",
            Self::Kyungjin => "경진택배",
            Self::NhLogis => "농협물류",
            Self::Sebang => "세방택배",
            Self::Warpex => "워펙스",
            Self::Yellowcap => "옐로우캡",
        }
    }

    /// Carrier code on the shared tracker.delivery JSON API.
    pub fn tracker_code(self) -> Option<&'static str> {
        match self {
            Self::CjKoreaExpress => Some("kr.cjlogistics"),
            Self::KoreaPost => Some("kr.epost"),
            Self::Lotte => Some("kr.lotte"),
            Self::Hanjin => Some("kr.hanjin"),
            Self::Logen => Some("kr.logen"),
            Self::Kdexp => Some("kr.kdexp"),
            Self::Cupost => Some("kr.cupost"),
            Self::Cvsnet => Some("kr.cvsnet"),
            _ => None,
        }
    }

    /// Lead time added to "now" when a source supplies no ETA.
    pub fn default_lead_time(self) -> Duration {
        match self {
            Self::CjKoreaExpress | Self::Lotte | Self::Hanjin => Duration::hours(24),
            _ => Duration::hours(48),
        }
    }
}

impl fmt::Display for CarrierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarrierId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| ValidationError::UnsupportedCarrier(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_ids() {
        for carrier in CarrierId::ALL {
            assert_eq!(carrier.as_str().parse::<CarrierId>().unwrap(), carrier);
            let json = serde_json::to_string(&carrier).unwrap();
            assert_eq!(json, format!("\"{}\"", carrier.as_str()));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" KoreaPost ".parse::<CarrierId>().unwrap(), CarrierId::KoreaPost);
    }

    #[test]
    fn test_unknown_carrier_rejected() {
        let err = "fedex".parse::<CarrierId>().unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedCarrier("fedex".to_string()));
    }

    #[test]
    fn test_lead_times() {
        assert_eq!(CarrierId::CjKoreaExpress.default_lead_time(), Duration::hours(24));
        assert_eq!(CarrierId::KoreaPost.default_lead_time(), Duration::hours(48));
        assert_eq!(CarrierId::Honam.default_lead_time(), Duration::hours(48));
    }

    #[test]
    fn test_tracker_codes() {
        assert_eq!(CarrierId::KoreaPost.tracker_code(), Some("kr.epost"));
        assert_eq!(CarrierId::Honam.tracker_code(), None);
        assert_eq!(CarrierId::Coupang.tracker_code(), None);
    }
}
