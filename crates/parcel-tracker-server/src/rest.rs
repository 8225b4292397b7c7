// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API.
//!
//! `POST /api/track` validates the body and runs one lookup. Validation
//! failures are the only non-200 answers; upstream trouble shows up as a
//! degraded result instead.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parcel_tracker::{supports_realtime, CarrierId, Orchestrator, TrackRequest};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

const INVALID_BODY: &str = "Invalid request body.";

/// Build the axum Router with all REST endpoints.
pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/carriers", get(list_carriers))
        .route("/api/track", post(track))
        .layer(cors)
        .with_state(orchestrator)
}

/// Serve until Ctrl-C.
pub async fn serve(addr: &str, orchestrator: Arc<Orchestrator>) -> anyhow::Result<()> {
    let app = router(orchestrator);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    info!("server stopped");
    Ok(())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn list_carriers() -> Json<Value> {
    let carriers: Vec<Value> = CarrierId::ALL
        .iter()
        .map(|c| {
            json!({
                "id": c.as_str(),
                "name": c.display_name(),
                "realtime": supports_realtime(*c),
            })
        })
        .collect();
    Json(json!({ "carriers": carriers }))
}

async fn track(
    State(orchestrator): State<Arc<Orchestrator>>,
    payload: Result<Json<TrackRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "rejected track request body");
            return error_response(StatusCode::BAD_REQUEST, INVALID_BODY);
        }
    };

    let id = match request.validate() {
        Ok(id) => id,
        Err(e) => {
            info!(error = %e, "invalid track request");
            return error_response(StatusCode::BAD_REQUEST, e.user_message());
        }
    };

    Json(orchestrator.track(&id).await).into_response()
}
