//! Read-only HTTP surface over the snapshot cache.
//!
//! Every handler is a synchronous read of a snapshot clone; nothing here
//! blocks on, or is blocked by, a refresh cycle in flight.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use nobletick_core::{MetalPrice, SnapshotCache, SourceStatus, UtcDateTime};

/// Router serving the dashboard API over the given cache.
pub fn router(cache: SnapshotCache) -> Router {
    Router::new()
        .route("/api/metals", get(list_metals))
        .route("/api/metals/:metal_name", get(get_metal))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(cache)
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    search: Option<String>,
}

#[derive(Debug, Serialize)]
struct MetalsListResponse {
    success: bool,
    total: usize,
    #[serde(rename = "lastUpdated")]
    last_updated: Option<UtcDateTime>,
    #[serde(rename = "sourceStatus")]
    source_status: BTreeMap<String, SourceStatus>,
    data: Vec<MetalPrice>,
}

#[derive(Debug, Serialize)]
struct MetalResponse {
    success: bool,
    #[serde(rename = "lastUpdated")]
    last_updated: Option<UtcDateTime>,
    data: MetalPrice,
}

#[derive(Debug, Serialize)]
struct MetalNotFoundResponse {
    success: bool,
    message: String,
    #[serde(rename = "availableMetals")]
    available_metals: Vec<String>,
    #[serde(rename = "lastUpdated")]
    last_updated: Option<UtcDateTime>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// `GET /api/metals?search=<term>` — all cached records, optionally
/// filtered by case-insensitive substring of the metal name. Snapshot
/// order is preserved; an empty search term means no filter.
async fn list_metals(
    State(cache): State<SnapshotCache>,
    Query(query): Query<ListQuery>,
) -> Json<MetalsListResponse> {
    let snapshot = cache.read().await;

    let records: Vec<MetalPrice> = match query.search.as_deref().filter(|term| !term.is_empty()) {
        Some(term) => {
            let needle = term.to_ascii_lowercase();
            snapshot
                .records
                .into_iter()
                .filter(|record| {
                    record
                        .metal
                        .name()
                        .to_ascii_lowercase()
                        .contains(&needle)
                })
                .collect()
        }
        None => snapshot.records,
    };

    Json(MetalsListResponse {
        success: true,
        total: records.len(),
        last_updated: snapshot.last_updated,
        source_status: snapshot.source_status,
        data: records,
    })
}

/// `GET /api/metals/:metal_name` — case-insensitive exact match. A miss is
/// a structured 404 listing what is currently available, never an error.
async fn get_metal(
    State(cache): State<SnapshotCache>,
    Path(metal_name): Path<String>,
) -> Response {
    let snapshot = cache.read().await;

    match snapshot
        .records
        .iter()
        .find(|record| record.metal.name().eq_ignore_ascii_case(&metal_name))
    {
        Some(record) => Json(MetalResponse {
            success: true,
            last_updated: snapshot.last_updated,
            data: record.clone(),
        })
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(MetalNotFoundResponse {
                success: false,
                message: format!("Metal '{metal_name}' not found."),
                available_metals: snapshot
                    .records
                    .iter()
                    .map(|record| record.metal.name().to_owned())
                    .collect(),
                last_updated: snapshot.last_updated,
            }),
        )
            .into_response(),
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "nobletick is running",
    })
}
