//! Venue endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::VenueId;
use domain::Venue;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct VenueRequest {
    pub name: String,
    pub location: String,
    pub total_capacity: i32,
}

fn not_found(id: VenueId) -> ApiError {
    ApiError::NotFound(format!("Venue with ID {id} not found"))
}

/// GET /api/venues
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Venue>>, ApiError> {
    Ok(Json(state.repos().venues.get_all().await?))
}

/// GET /api/venues/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Venue>, ApiError> {
    let id = VenueId::new(id);
    state
        .repos()
        .venues
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// POST /api/venues — capacity must be positive.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VenueRequest>,
) -> Result<(StatusCode, Json<Venue>), ApiError> {
    let mut venue = Venue::new(req.name, req.location, req.total_capacity)?;
    venue.id = state.repos().venues.add(venue.clone()).await?;
    tracing::info!(venue_id = %venue.id, "venue created");

    Ok((StatusCode::CREATED, Json(venue)))
}

/// PUT /api/venues/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<VenueRequest>,
) -> Result<Json<Venue>, ApiError> {
    let id = VenueId::new(id);
    let venues = &state.repos().venues;
    let existing = venues.get_by_id(id).await?.ok_or_else(|| not_found(id))?;

    let mut venue = Venue::new(req.name, req.location, req.total_capacity)?;
    venue.id = id;
    venue.created_at = existing.created_at;
    venues.update(venue.clone()).await?;

    Ok(Json(venue))
}

/// DELETE /api/venues/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let id = VenueId::new(id);
    if state.repos().venues.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
