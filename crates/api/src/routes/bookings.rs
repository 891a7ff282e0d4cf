//! Booking endpoints, including the ledger's relational queries.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use booking::{BookingResult, CreateBookingRequest};
use common::{BookingId, UserId, VenueId};
use domain::Booking;

use crate::AppState;
use crate::error::ApiError;

fn not_found(id: BookingId) -> ApiError {
    ApiError::NotFound(format!("Booking with ID {id} not found"))
}

/// GET /api/bookings
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.repos().bookings.get_all().await?))
}

/// GET /api/bookings/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, ApiError> {
    let id = BookingId::new(id);
    state
        .repos()
        .bookings
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// POST /api/bookings — 201 on success, 400 with the failed result otherwise.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResult>), ApiError> {
    let result = state.bookings.create_booking(req).await?;
    let status = if result.success {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(result)))
}

/// DELETE /api/bookings/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let id = BookingId::new(id);
    if state.repos().bookings.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/bookings/{id}/refund — Paid → Refunded.
#[tracing::instrument(skip(state))]
pub async fn refund(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.bookings.refund_booking(BookingId::new(id)).await?))
}

/// GET /api/bookings/user/{user_id}
pub async fn by_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state
        .repos()
        .bookings
        .get_by_user_id(UserId::new(user_id))
        .await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/venue/{venue_id}
pub async fn by_venue(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state
        .repos()
        .bookings
        .get_by_venue_id(VenueId::new(venue_id))
        .await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/venue/{venue_id}/paid-users — every booking at the
/// venue by users holding at least one paid booking there.
pub async fn paid_users_at_venue(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state
        .repos()
        .bookings
        .find_bookings_for_paid_users_at_venue(VenueId::new(venue_id))
        .await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/venue/{venue_id}/users-without-bookings — ids of users
/// who booked elsewhere but never at this venue.
pub async fn users_without_bookings(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Result<Json<Vec<UserId>>, ApiError> {
    let users = state
        .repos()
        .bookings
        .find_users_without_bookings_in_venue(VenueId::new(venue_id))
        .await?;
    Ok(Json(users))
}
