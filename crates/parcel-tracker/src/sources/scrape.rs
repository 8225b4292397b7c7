// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Carrier web page scraping driven by [`ScrapeProfile`] descriptors.
//!
//! Extraction is synchronous and works on an owned body string: `scraper`
//! documents are `!Send`, so they are parsed and dropped without crossing an
//! await point.

use super::http_client::HttpClient;
use super::profiles::{Cell, NoDataMarker, PartyLookup, RequestShape, ScrapeProfile, TimeCells};
use super::{encode_path_segment, transport_error, SourceAdapter, SourceKind};
use crate::error::FetchError;
use crate::types::{kst, RawEvent, RawTrack};
use crate::vocabulary::Wording;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

/// Scrapes one carrier tracking page.
pub struct DocumentScrapeAdapter {
    profile: &'static ScrapeProfile,
    origin: String,
    http: HttpClient,
}

impl DocumentScrapeAdapter {
    pub fn new(profile: &'static ScrapeProfile, origin: impl Into<String>, http: HttpClient) -> Self {
        Self {
            profile,
            origin: origin.into().trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[async_trait]
impl SourceAdapter for DocumentScrapeAdapter {
    fn name(&self) -> &str {
        self.profile.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::DocumentScrape
    }

    async fn fetch(&self, tracking_number: &str, budget: Duration) -> Result<RawTrack, FetchError> {
        let mut headers: Vec<(&str, &str)> =
            vec![("Accept", HTML_ACCEPT), ("Accept-Language", ACCEPT_LANGUAGE)];
        if let Some(referer) = self.profile.referer {
            headers.push(("Referer", referer));
        }

        let response = match self.profile.request {
            RequestShape::Query { path, param, fixed } => {
                let url = format!("{}{}", self.origin, path);
                let mut query: Vec<(&str, &str)> = fixed.to_vec();
                query.push((param, tracking_number));
                self.http.get(&url, &query, &headers, budget).await
            }
            RequestShape::Path { path } => {
                let path = path.replace("{tracking}", &encode_path_segment(tracking_number));
                let url = format!("{}{}", self.origin, path);
                self.http.get(&url, &[], &headers, budget).await
            }
            RequestShape::Form { path, field } => {
                let url = format!("{}{}", self.origin, path);
                self.http
                    .post_form(&url, &[(field, tracking_number)], &headers, budget)
                    .await
            }
        }
        .map_err(|e| transport_error(self.profile.name, e))?;

        if !response.is_success() {
            return Err(FetchError::Unavailable(format!(
                "{}: HTTP {}",
                self.profile.name, response.status
            )));
        }

        extract_track(self.profile, &response.body, Utc::now())
    }
}

/// Extract a raw track from a carrier page.
///
/// Rows whose date cannot be parsed are kept with `now` as their timestamp;
/// rows with no date text at all are skipped.
pub fn extract_track(
    profile: &ScrapeProfile,
    html: &str,
    now: DateTime<Utc>,
) -> Result<RawTrack, FetchError> {
    let document = Html::parse_document(html);

    if let Some(marker) = &profile.no_data {
        if has_marker(&document, marker) {
            return Err(FetchError::NoData);
        }
    }

    let invalid = || FetchError::Unavailable(format!("{}: invalid selector", profile.name));
    let rows = compile(profile.rows).ok_or_else(invalid)?;
    let td = compile("td").ok_or_else(invalid)?;
    let time = CompiledTime::new(&profile.time).ok_or_else(invalid)?;
    let status = CompiledCell::new(&profile.status).ok_or_else(invalid)?;
    let location = profile.location.as_ref().and_then(CompiledCell::new);
    let description = profile.description.as_ref().and_then(CompiledCell::new);

    let mut events = Vec::new();
    for row in document.select(&rows) {
        let cells: Vec<ElementRef<'_>> = row.select(&td).collect();
        if cells.len() < profile.min_cells {
            continue;
        }
        let Some(stamp) = time.read(row, &cells) else {
            continue;
        };
        let timestamp = parse_timestamp(&stamp, profile.date_formats).unwrap_or_else(|| {
            debug!(source = profile.name, value = %stamp, "unparseable date, using now");
            now
        });

        events.push(RawEvent {
            timestamp,
            raw_location: location.as_ref().and_then(|c| c.read(row, &cells)),
            raw_status_text: status.read(row, &cells).unwrap_or_default(),
            raw_description: description.as_ref().and_then(|c| c.read(row, &cells)),
        });
    }

    if events.is_empty() {
        match profile.summary.and_then(|css| first_text(&document, css)) {
            Some(text) => events.push(RawEvent {
                timestamp: now,
                raw_location: None,
                raw_status_text: text,
                raw_description: None,
            }),
            None => return Err(FetchError::NoData),
        }
    }

    Ok(RawTrack {
        events,
        sender_name: profile
            .sender
            .as_ref()
            .and_then(|p| find_party(&document, p)),
        receiver_name: profile
            .receiver
            .as_ref()
            .and_then(|p| find_party(&document, p)),
        estimated_delivery: None,
        wording: Wording::CarrierSite,
    })
}

/// Parse a Korean local timestamp with the first matching format.
pub(crate) fn parse_timestamp(raw: &str, formats: &[&str]) -> Option<DateTime<Utc>> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .and_then(|naive| naive.and_local_timezone(kst()).single())
        .map(|local| local.with_timezone(&Utc))
}

enum CompiledCell {
    Nth(usize),
    Css(Selector),
}

impl CompiledCell {
    fn new(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Nth(i) => Some(Self::Nth(*i)),
            Cell::Css(css) => compile(css).map(Self::Css),
        }
    }

    fn read(&self, row: ElementRef<'_>, cells: &[ElementRef<'_>]) -> Option<String> {
        let text = match self {
            Self::Nth(i) => cells.get(*i).map(|c| text_of(*c)),
            Self::Css(sel) => row.select(sel).next().map(text_of),
        }?;
        (!text.is_empty()).then_some(text)
    }
}

enum CompiledTime {
    Combined(CompiledCell),
    Split {
        date: CompiledCell,
        time: CompiledCell,
    },
}

impl CompiledTime {
    fn new(cells: &TimeCells) -> Option<Self> {
        match cells {
            TimeCells::Combined(c) => CompiledCell::new(c).map(Self::Combined),
            TimeCells::Split { date, time } => Some(Self::Split {
                date: CompiledCell::new(date)?,
                time: CompiledCell::new(time)?,
            }),
        }
    }

    fn read(&self, row: ElementRef<'_>, cells: &[ElementRef<'_>]) -> Option<String> {
        match self {
            Self::Combined(c) => c.read(row, cells),
            Self::Split { date, time } => {
                let date = date.read(row, cells)?;
                Some(match time.read(row, cells) {
                    Some(time) => format!("{date} {time}"),
                    None => date,
                })
            }
        }
    }
}

fn compile(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            warn!(selector = css, error = %e, "invalid CSS selector");
            None
        }
    }
}

/// Visible text with whitespace runs collapsed to single spaces.
fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let sel = compile(css)?;
    document
        .select(&sel)
        .map(text_of)
        .find(|text| !text.is_empty())
}

fn has_marker(document: &Html, marker: &NoDataMarker) -> bool {
    let Some(sel) = compile(marker.selector) else {
        return false;
    };
    document.select(&sel).map(text_of).any(|text| {
        marker
            .phrases
            .iter()
            .any(|phrase| text.contains(phrase))
    })
}

fn find_party(document: &Html, lookup: &PartyLookup) -> Option<String> {
    match lookup {
        PartyLookup::Css(css) => first_text(document, css),
        PartyLookup::LabeledRow { rows, label } => {
            let rows = compile(rows)?;
            let th = compile("th")?;
            let td = compile("td")?;
            document.select(&rows).find_map(|row| {
                let title = row.select(&th).next().map(text_of)?;
                if !title.contains(*label) {
                    return None;
                }
                row.select(&td)
                    .next()
                    .map(text_of)
                    .filter(|v| !v.is_empty())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::profiles::profile;
    use chrono::TimeZone;

    fn kst_utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        kst()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 3, 0, 0).single().unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let dotted = ["%Y.%m.%d %H:%M", "%Y.%m.%d %H:%M:%S"];
        assert_eq!(
            parse_timestamp("2026.10.18  14:05", &dotted),
            Some(kst_utc(2026, 10, 18, 14, 5))
        );
        assert_eq!(
            parse_timestamp("2026.10.18 14:05:30", &dotted).map(|t| t.timestamp()),
            Some(kst_utc(2026, 10, 18, 14, 5).timestamp() + 30)
        );
        assert_eq!(parse_timestamp("어제 오후", &dotted), None);
    }

    #[test]
    fn test_epost_rows() {
        let html = r#"
            <table class="table_col"><thead><tr><th>날짜</th><th>상태</th></tr></thead>
            <tbody>
              <tr><td>2026.10.17 09:10</td><td>접수</td><td>서울중앙우체국</td><td>소포 접수</td></tr>
              <tr><td colspan="4">구분선</td></tr>
              <tr><td>2026.10.18 13:40</td><td>배달완료</td><td>강남우체국</td><td></td></tr>
            </tbody></table>"#;

        let track = extract_track(profile("epost").unwrap(), html, now()).unwrap();

        assert_eq!(track.events.len(), 2);
        let first = &track.events[0];
        assert_eq!(first.timestamp, kst_utc(2026, 10, 17, 9, 10));
        assert_eq!(first.raw_status_text, "접수");
        assert_eq!(first.raw_location.as_deref(), Some("서울중앙우체국"));
        assert_eq!(first.raw_description.as_deref(), Some("소포 접수"));
        assert_eq!(track.events[1].raw_description, None);
    }

    #[test]
    fn test_malformed_date_keeps_row() {
        let html = r#"
            <table class="table_col"><tbody>
              <tr><td>18일 오후</td><td>배달완료</td><td>강남우체국</td><td>-</td></tr>
            </tbody></table>"#;

        let track = extract_track(profile("epost").unwrap(), html, now()).unwrap();

        assert_eq!(track.events.len(), 1);
        assert_eq!(track.events[0].timestamp, now());
        assert_eq!(track.events[0].raw_status_text, "배달완료");
    }

    #[test]
    fn test_cj_no_data_marker() {
        let html = r#"
            <div class="grid-error-wrap"><p>조회된 결과가 없습니다.</p></div>
            <table class="parcel-list"><tbody></tbody></table>"#;

        let err = extract_track(profile("cj-parcel").unwrap(), html, now()).unwrap_err();
        assert_eq!(err, FetchError::NoData);
    }

    #[test]
    fn test_cj_rows_and_parties() {
        let html = r#"
            <div class="sender"><span class="name">홍*동</span></div>
            <div class="receiver"><span class="name">김*수</span></div>
            <table class="parcel-list"><tbody>
              <tr><td>2026.10.17 18:02</td><td>용인허브</td><td>집화완료</td></tr>
              <tr><td>2026.10.18 07:55</td><td>강남대리점</td><td>배달출발</td></tr>
            </tbody></table>"#;

        let track = extract_track(profile("cj-parcel").unwrap(), html, now()).unwrap();

        assert_eq!(track.events.len(), 2);
        assert_eq!(track.events[1].raw_status_text, "배달출발");
        assert_eq!(track.events[1].raw_location.as_deref(), Some("강남대리점"));
        assert_eq!(track.sender_name.as_deref(), Some("홍*동"));
        assert_eq!(track.receiver_name.as_deref(), Some("김*수"));
    }

    #[test]
    fn test_cj_summary_fallback() {
        let html = r#"<p class="status-text">  상품 이동중  </p>
            <table class="parcel-list"><tbody></tbody></table>"#;

        let track = extract_track(profile("cj-parcel").unwrap(), html, now()).unwrap();

        assert_eq!(track.events.len(), 1);
        assert_eq!(track.events[0].raw_status_text, "상품 이동중");
        assert_eq!(track.events[0].timestamp, now());
    }

    #[test]
    fn test_empty_page_is_no_data() {
        let html = "<html><body><p>점검중입니다</p></body></html>";
        for name in ["cj-doortodoor", "epost", "lotte", "hanjin", "logen"] {
            let err = extract_track(profile(name).unwrap(), html, now()).unwrap_err();
            assert_eq!(err, FetchError::NoData, "profile {name}");
        }
    }

    #[test]
    fn test_doortodoor_split_date_time() {
        let html = r#"
            <table class="ptb"><tbody>
              <tr><td>2026.10.16</td><td>21:30</td><td>곤지암Hub</td><td>간선상차</td></tr>
            </tbody></table>"#;

        let track = extract_track(profile("cj-doortodoor").unwrap(), html, now()).unwrap();

        assert_eq!(track.events[0].timestamp, kst_utc(2026, 10, 16, 21, 30));
        assert_eq!(track.events[0].raw_location.as_deref(), Some("곤지암Hub"));
    }

    #[test]
    fn test_lotte_classed_cells() {
        let html = r#"
            <dl class="addrBox"><div class="from"><dd>롯데마트</dd></div><div class="to"><dd>이*희</dd></div></dl>
            <table class="trackingTable"><tbody>
              <tr><td class="stat">집하</td><td class="date">2026-10-17 11:20</td><td class="from">부산</td></tr>
            </tbody></table>"#;

        let track = extract_track(profile("lotte").unwrap(), html, now()).unwrap();

        assert_eq!(track.events[0].timestamp, kst_utc(2026, 10, 17, 11, 20));
        assert_eq!(track.events[0].raw_status_text, "집하");
        assert_eq!(track.events[0].raw_location.as_deref(), Some("부산"));
        assert_eq!(track.sender_name.as_deref(), Some("롯데마트"));
        assert_eq!(track.receiver_name.as_deref(), Some("이*희"));
    }

    #[test]
    fn test_hanjin_div_rows() {
        let html = r#"
            <div class="process-box">
              <div class="result-points">
                <span class="date">2026.10.18</span><span class="time">08:15</span>
                <span class="location">대전HUB</span><span class="result">배송출발</span>
              </div>
            </div>"#;

        let track = extract_track(profile("hanjin").unwrap(), html, now()).unwrap();

        assert_eq!(track.events.len(), 1);
        assert_eq!(track.events[0].timestamp, kst_utc(2026, 10, 18, 8, 15));
        assert_eq!(track.events[0].raw_status_text, "배송출발");
    }

    #[test]
    fn test_logen_labeled_parties() {
        let html = r#"
            <table id="result_waybill"><tbody>
              <tr><th>보내는 분</th><td>(주)테스트상사</td></tr>
              <tr><th>받는 분</th><td>박*민</td></tr>
            </tbody></table>
            <table id="result_waybill2"><tbody>
              <tr><td>2026.10.18</td><td>16:00</td><td>성남</td><td>배달완료</td></tr>
              <tr><td>2026.10.18</td><td>09:00</td><td>성남</td></tr>
            </tbody></table>"#;

        let track = extract_track(profile("logen").unwrap(), html, now()).unwrap();

        assert_eq!(track.events.len(), 1);
        assert_eq!(track.sender_name.as_deref(), Some("(주)테스트상사"));
        assert_eq!(track.receiver_name.as_deref(), Some("박*민"));
    }
}
