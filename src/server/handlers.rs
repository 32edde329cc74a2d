use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::location::Coordinate;
use crate::reviews::ReviewSummary;
use crate::workshops::Workshop;

use super::error::ApiError;
use super::state::AppState;
use super::static_files;

// ─── Static file handlers ────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

pub async fn script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        static_files::APP_JS,
    )
        .into_response()
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// ─── GET /get_location ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct LocationQuery {
    pub input: Option<String>,
}

pub async fn get_location(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<Coordinate>, ApiError> {
    let start = Instant::now();

    let Query(params) = query?;
    let input = params.input.as_deref().unwrap_or("").trim().to_string();
    if input.is_empty() {
        return Err(ApiError::Validation("Missing 'input' parameter".into()));
    }

    let worker_state = state.clone();
    let query = input.clone();
    let coord = tokio::task::spawn_blocking(move || worker_state.resolver.resolve(&query)).await??;

    info!(
        input = %input,
        lat = coord.lat,
        lon = coord.lon,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /get_location"
    );
    Ok(Json(coord))
}

// ─── POST /get_workshops ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct WorkshopsRequest {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

pub async fn get_workshops(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WorkshopsRequest>, JsonRejection>,
) -> Result<Json<Vec<Workshop>>, ApiError> {
    let start = Instant::now();

    let Json(body) = payload?;
    let (Some(lat), Some(lon)) = (body.lat, body.lon) else {
        return Err(ApiError::Validation("Missing 'lat' or 'lon'".into()));
    };
    let center = Coordinate::new(lat, lon);

    let worker_state = state.clone();
    let workshops = tokio::task::spawn_blocking(move || {
        worker_state.finder.find(center, &worker_state.reviews)
    })
    .await??;

    info!(
        lat,
        lon,
        radius_m = state.finder.radius_m(),
        found = workshops.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "POST /get_workshops"
    );
    Ok(Json(workshops))
}

// ─── POST /submit_rating_review ──────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitReviewRequest {
    pub workshop_id: Option<String>,
    pub rating: Option<f64>,
    pub review: Option<String>,
}

#[derive(Serialize)]
struct SubmitResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn submit_rating_review(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitReviewRequest>, JsonRejection>,
) -> Response {
    let result = payload.map_err(ApiError::from).and_then(|Json(body)| {
        state
            .reviews
            .submit(
                body.workshop_id.as_deref(),
                body.rating,
                body.review.as_deref(),
            )
            .map_err(ApiError::from)
            .map(|()| body.workshop_id)
    });

    match result {
        Ok(workshop_id) => {
            info!(workshop_id = workshop_id.as_deref().unwrap_or_default(), "POST /submit_rating_review");
            Json(SubmitResponse {
                success: true,
                error: None,
            })
            .into_response()
        }
        Err(e) => (
            e.status(),
            Json(SubmitResponse {
                success: false,
                error: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}

// ─── GET /get_reviews ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ReviewsQuery {
    pub workshop_id: Option<String>,
}

#[derive(Serialize)]
pub struct ReviewsResponse {
    pub workshop_id: String,
    #[serde(flatten)]
    pub summary: ReviewSummary,
}

pub async fn get_reviews(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ReviewsQuery>, QueryRejection>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    let Query(params) = query?;
    let workshop_id = params
        .workshop_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Missing 'workshop_id' parameter".into()))?;

    let summary = state.reviews.summary(&workshop_id);
    Ok(Json(ReviewsResponse {
        workshop_id,
        summary,
    }))
}

// ─── Fallback ────────────────────────────────────────────────────

pub async fn not_found() -> ApiError {
    ApiError::NotFound("No such endpoint".into())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed for this endpoint".into())
}
