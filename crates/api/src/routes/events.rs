//! Event endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use booking::EventAvailability;
use chrono::{DateTime, Utc};
use common::{EventId, VenueId};
use domain::{Event, SeatingPolicy};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct EventRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub venue_id: VenueId,
    pub event_date: DateTime<Utc>,
    pub event_type: String,
    /// Fixed at creation. An update may omit it or repeat the stored policy.
    #[serde(default)]
    pub seating: Option<SeatingPolicy>,
}

fn not_found(id: EventId) -> ApiError {
    ApiError::NotFound(format!("Event with ID {id} not found"))
}

async fn ensure_venue_exists(state: &AppState, venue_id: VenueId) -> Result<(), ApiError> {
    match state.repos().venues.get_by_id(venue_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::BadRequest(format!(
            "Venue with ID {venue_id} not found"
        ))),
    }
}

impl EventRequest {
    fn into_event(self, seating: SeatingPolicy) -> Event {
        Event {
            description: self.description,
            ..Event::new(
                self.name,
                self.venue_id,
                self.event_date,
                self.event_type,
                seating,
            )
        }
    }
}

/// GET /api/events
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.repos().events.get_all().await?))
}

/// GET /api/events/future — upcoming events, earliest first.
pub async fn future(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.repos().events.get_future_events().await?))
}

/// GET /api/events/future-with-availability
pub async fn future_with_availability(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EventAvailability>>, ApiError> {
    Ok(Json(state.bookings.future_events_with_availability().await?))
}

/// GET /api/events/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Event>, ApiError> {
    let id = EventId::new(id);
    state
        .repos()
        .events
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// POST /api/events — the venue must exist.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    ensure_venue_exists(&state, req.venue_id).await?;

    let seating = req.seating.clone().unwrap_or_default();
    let mut event = req.into_event(seating);
    event.id = state.repos().events.add(event.clone()).await?;
    tracing::info!(event_id = %event.id, seating = event.seating.type_name(), "event created");

    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/{id} — the seating policy cannot be changed.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<EventRequest>,
) -> Result<Json<Event>, ApiError> {
    let id = EventId::new(id);
    let existing = state
        .repos()
        .events
        .get_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    ensure_venue_exists(&state, req.venue_id).await?;
    if req.seating.as_ref().is_some_and(|seating| *seating != existing.seating) {
        return Err(ApiError::Conflict(format!(
            "Seating policy of event {id} cannot be changed"
        )));
    }

    let mut event = req.into_event(existing.seating);
    event.id = id;
    event.created_at = existing.created_at;
    state.repos().events.update(event.clone()).await?;

    Ok(Json(event))
}

/// DELETE /api/events/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let id = EventId::new(id);
    if state.repos().events.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
