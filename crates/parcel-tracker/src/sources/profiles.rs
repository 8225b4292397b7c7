// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Document extraction strategy table.
//!
//! Each scraped carrier page is described by a [`ScrapeProfile`]: how to
//! request it, which elements are timeline rows, which cell holds which
//! field, and how dates are written. The scrape adapter is generic over this
//! table, so supporting a new page is a data change rather than new code.

use crate::carriers::CarrierId;

/// How the tracking page is requested. Paths are relative to the origin.
#[derive(Debug, Clone, Copy)]
pub enum RequestShape {
    /// GET with the tracking number in `param`, plus fixed query pairs.
    Query {
        path: &'static str,
        param: &'static str,
        fixed: &'static [(&'static str, &'static str)],
    },
    /// GET with `{tracking}` substituted into the path.
    Path { path: &'static str },
    /// Form-encoded POST with the tracking number in `field`.
    Form {
        path: &'static str,
        field: &'static str,
    },
}

/// Where a field lives inside a row.
#[derive(Debug, Clone, Copy)]
pub enum Cell {
    /// Zero-based index into the row's `<td>` children.
    Nth(usize),
    /// CSS selector evaluated relative to the row.
    Css(&'static str),
}

/// How the timestamp is laid out in a row.
#[derive(Debug, Clone, Copy)]
pub enum TimeCells {
    Combined(Cell),
    Split { date: Cell, time: Cell },
}

/// How a sender or receiver name is located in the document.
#[derive(Debug, Clone, Copy)]
pub enum PartyLookup {
    Css(&'static str),
    /// A `<th>` label / `<td>` value table; the row whose header contains
    /// `label` supplies the value.
    LabeledRow {
        rows: &'static str,
        label: &'static str,
    },
}

/// Explicit "no such tracking number" text on the page.
#[derive(Debug, Clone, Copy)]
pub struct NoDataMarker {
    pub selector: &'static str,
    pub phrases: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct ScrapeProfile {
    /// Source name; also the key for origin overrides.
    pub name: &'static str,
    pub carrier: CarrierId,
    pub origin: &'static str,
    pub request: RequestShape,
    pub referer: Option<&'static str>,
    /// Selector matching one element per timeline event.
    pub rows: &'static str,
    /// Rows with fewer `<td>` cells are skipped (header and spacer rows).
    pub min_cells: usize,
    pub time: TimeCells,
    pub status: Cell,
    pub location: Option<Cell>,
    pub description: Option<Cell>,
    /// chrono formats tried in order; times are Korea Standard Time.
    pub date_formats: &'static [&'static str],
    pub no_data: Option<NoDataMarker>,
    pub sender: Option<PartyLookup>,
    pub receiver: Option<PartyLookup>,
    /// Status banner used as a single "now" event when the page has no rows.
    pub summary: Option<&'static str>,
}

const DOTTED: &[&str] = &["%Y.%m.%d %H:%M", "%Y.%m.%d %H:%M:%S"];
const DASHED: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

pub const PROFILES: &[ScrapeProfile] = &[
    ScrapeProfile {
        name: "cj-parcel",
        carrier: CarrierId::CjKoreaExpress,
        origin: "https://www.cjlogistics.com",
        request: RequestShape::Form {
            path: "/ko/tool/parcel/tracking",
            field: "paramInvcNo",
        },
        referer: Some("https://www.cjlogistics.com/"),
        rows: ".parcel-list tbody tr",
        min_cells: 3,
        time: TimeCells::Combined(Cell::Nth(0)),
        location: Some(Cell::Nth(1)),
        status: Cell::Nth(2),
        description: None,
        date_formats: DOTTED,
        no_data: Some(NoDataMarker {
            selector: "div.grid-error-wrap",
            phrases: &["조회된 결과가 없습니다", "운송장 정보를 찾을 수 없습니다"],
        }),
        sender: Some(PartyLookup::Css(".sender .name")),
        receiver: Some(PartyLookup::Css(".receiver .name")),
        summary: Some(".status-text"),
    },
    ScrapeProfile {
        name: "cj-doortodoor",
        carrier: CarrierId::CjKoreaExpress,
        origin: "https://www.doortodoor.co.kr",
        request: RequestShape::Query {
            path: "/parcel/doortodoor.do",
            param: "invc_no",
            fixed: &[
                ("fsp_action", "PARC_ACT_002"),
                ("fsp_cmd", "retrieveInvNoACT"),
            ],
        },
        referer: None,
        rows: "table.ptb tbody tr",
        min_cells: 4,
        time: TimeCells::Split {
            date: Cell::Nth(0),
            time: Cell::Nth(1),
        },
        location: Some(Cell::Nth(2)),
        status: Cell::Nth(3),
        description: None,
        date_formats: DOTTED,
        no_data: None,
        sender: None,
        receiver: None,
        summary: None,
    },
    ScrapeProfile {
        name: "epost",
        carrier: CarrierId::KoreaPost,
        origin: "https://service.epost.go.kr",
        request: RequestShape::Query {
            path: "/trace.RetrieveDomRigiTraceList.comm",
            param: "sid1",
            fixed: &[],
        },
        referer: None,
        rows: ".table_col tbody tr",
        min_cells: 4,
        time: TimeCells::Combined(Cell::Nth(0)),
        status: Cell::Nth(1),
        location: Some(Cell::Nth(2)),
        description: Some(Cell::Nth(3)),
        date_formats: DOTTED,
        no_data: None,
        sender: None,
        receiver: None,
        summary: None,
    },
    ScrapeProfile {
        name: "lotte",
        carrier: CarrierId::Lotte,
        origin: "https://www.lotteglogis.com",
        request: RequestShape::Query {
            path: "/mobile/reservation/tracking/linkView",
            param: "InvNo",
            fixed: &[],
        },
        referer: None,
        rows: ".trackingTable tbody tr",
        min_cells: 0,
        time: TimeCells::Combined(Cell::Css("td.date")),
        status: Cell::Css("td.stat"),
        location: Some(Cell::Css("td.from")),
        description: None,
        date_formats: DASHED,
        no_data: None,
        sender: Some(PartyLookup::Css(".addrBox .from dd")),
        receiver: Some(PartyLookup::Css(".addrBox .to dd")),
        summary: None,
    },
    ScrapeProfile {
        name: "hanjin",
        carrier: CarrierId::Hanjin,
        origin: "https://www.hanjin.co.kr",
        request: RequestShape::Query {
            path: "/kor/CMS/DeliveryMgr/WaybillResult.do",
            param: "wblnumText2",
            fixed: &[("mCode", "MN038"), ("schLang", "KR")],
        },
        referer: None,
        rows: ".process-box .result-points",
        min_cells: 0,
        time: TimeCells::Split {
            date: Cell::Css(".date"),
            time: Cell::Css(".time"),
        },
        status: Cell::Css(".result"),
        location: Some(Cell::Css(".location")),
        description: None,
        date_formats: DOTTED,
        no_data: None,
        sender: Some(PartyLookup::Css(".waybill-info .from .name")),
        receiver: Some(PartyLookup::Css(".waybill-info .to .name")),
        summary: None,
    },
    ScrapeProfile {
        name: "logen",
        carrier: CarrierId::Logen,
        origin: "https://www.ilogen.com",
        request: RequestShape::Path {
            path: "/web/personal/trace/{tracking}",
        },
        referer: None,
        rows: "#result_waybill2 tbody tr",
        min_cells: 4,
        time: TimeCells::Split {
            date: Cell::Nth(0),
            time: Cell::Nth(1),
        },
        location: Some(Cell::Nth(2)),
        status: Cell::Nth(3),
        description: None,
        date_formats: DOTTED,
        no_data: None,
        sender: Some(PartyLookup::LabeledRow {
            rows: "#result_waybill tbody tr",
            label: "보내는 분",
        }),
        receiver: Some(PartyLookup::LabeledRow {
            rows: "#result_waybill tbody tr",
            label: "받는 분",
        }),
        summary: None,
    },
];

/// Look up a profile by source name.
pub fn profile(name: &str) -> Option<&'static ScrapeProfile> {
    PROFILES.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn test_names_unique() {
        let mut names: Vec<&str> = PROFILES.iter().map(|p| p.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PROFILES.len());
    }

    #[test]
    fn test_every_selector_parses() {
        fn check(css: &str) {
            assert!(Selector::parse(css).is_ok(), "bad selector: {css}");
        }
        fn check_cell(cell: &Cell) {
            if let Cell::Css(css) = cell {
                check(css);
            }
        }
        for p in PROFILES {
            check(p.rows);
            check_cell(&p.status);
            p.location.iter().for_each(check_cell);
            p.description.iter().for_each(check_cell);
            match &p.time {
                TimeCells::Combined(c) => check_cell(c),
                TimeCells::Split { date, time } => {
                    check_cell(date);
                    check_cell(time);
                }
            }
            for party in p.sender.iter().chain(p.receiver.iter()) {
                match party {
                    PartyLookup::Css(css) => check(css),
                    PartyLookup::LabeledRow { rows, .. } => check(rows),
                }
            }
            if let Some(marker) = &p.no_data {
                check(marker.selector);
            }
            if let Some(summary) = p.summary {
                check(summary);
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(profile("epost").map(|p| p.carrier), Some(CarrierId::KoreaPost));
        assert!(profile("nope").is_none());
    }
}
