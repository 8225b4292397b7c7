// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! Carrier → ordered list of sources.

use crate::carriers::CarrierId;
use crate::config::EngineConfig;
use crate::sources::profiles;
use crate::sources::{
    DocumentScrapeAdapter, HttpClient, SourceAdapter, SourceKind, StructuredApiAdapter,
    SyntheticAdapter,
};
use std::sync::Arc;
use tracing::warn;

/// Sources to try for one carrier, in order, ending with synthetic data.
#[derive(Clone)]
pub struct FallbackChain {
    carrier: CarrierId,
    sources: Vec<Arc<dyn SourceAdapter>>,
    terminal: SyntheticAdapter,
}

impl FallbackChain {
    pub fn new(
        carrier: CarrierId,
        sources: Vec<Arc<dyn SourceAdapter>>,
        terminal: SyntheticAdapter,
    ) -> Self {
        Self {
            carrier,
            sources,
            terminal,
        }
    }

    pub fn carrier(&self) -> CarrierId {
        self.carrier
    }

    /// Real sources, excluding the synthetic terminal entry.
    pub fn sources(&self) -> &[Arc<dyn SourceAdapter>] {
        &self.sources
    }

    pub fn terminal(&self) -> &SyntheticAdapter {
        &self.terminal
    }

    /// Number of entries including the terminal one.
    pub fn len(&self) -> usize {
        self.sources.len() + 1
    }

    /// Always false: the terminal entry is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn has_real_sources(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn kinds(&self) -> Vec<SourceKind> {
        self.sources
            .iter()
            .map(|s| s.kind())
            .chain(std::iter::once(SourceKind::Synthetic))
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.sources
            .iter()
            .map(|s| s.name().to_string())
            .chain(std::iter::once(crate::sources::synthetic::SOURCE_NAME.to_string()))
            .collect()
    }
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain")
            .field("carrier", &self.carrier)
            .field("sources", &self.names())
            .finish()
    }
}

/// Scraped sites per carrier, own site first, then backups.
fn site_profiles(carrier: CarrierId) -> &'static [&'static str] {
    match carrier {
        CarrierId::CjKoreaExpress => &["cj-parcel", "cj-doortodoor"],
        CarrierId::KoreaPost => &["epost"],
        CarrierId::Lotte => &["lotte"],
        CarrierId::Hanjin => &["hanjin"],
        CarrierId::Logen => &["logen"],
        _ => &[],
    }
}

/// Whether any real source exists for `carrier`.
pub fn supports_realtime(carrier: CarrierId) -> bool {
    carrier.tracker_code().is_some() || !site_profiles(carrier).is_empty()
}

/// Build the fallback chain for `carrier`.
pub fn build_chain(carrier: CarrierId, config: &EngineConfig, http: &HttpClient) -> FallbackChain {
    let mut sources: Vec<Arc<dyn SourceAdapter>> = Vec::new();

    if let Some(code) = carrier.tracker_code() {
        sources.push(Arc::new(StructuredApiAdapter::new(
            code,
            config.tracker_api_base.clone(),
            http.clone(),
        )));
    }

    for name in site_profiles(carrier) {
        match profiles::profile(name) {
            Some(profile) => {
                let origin = config.origin_for(profile.name, profile.origin);
                sources.push(Arc::new(DocumentScrapeAdapter::new(
                    profile,
                    origin,
                    http.clone(),
                )));
            }
            None => warn!(carrier = %carrier, source = *name, "unknown scrape profile"),
        }
    }

    let terminal = match config.synthetic_seed {
        Some(seed) => SyntheticAdapter::with_seed(seed),
        None => SyntheticAdapter::new(),
    };

    FallbackChain::new(carrier, sources, terminal)
}
