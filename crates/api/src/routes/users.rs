//! User endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::UserId;
use domain::User;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct UserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// GET /api/users
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.repos().users.get_all().await?))
}

/// GET /api/users/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let id = UserId::new(id);
    state
        .repos()
        .users
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("User with ID {id} not found")))
}

/// GET /api/users/by-email/{email}
pub async fn get_by_email(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    state
        .repos()
        .users
        .get_by_email(&email)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("User with email {email} not found")))
}

/// POST /api/users — register a user with a unique email.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if req.email.trim().is_empty() {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    }

    let users = &state.repos().users;
    if users.get_by_email(&req.email).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "User with email {} already exists",
            req.email
        )));
    }

    let mut user = User::new(req.first_name, req.last_name, req.email);
    user.id = users.add(user.clone()).await?;
    tracing::info!(user_id = %user.id, "user created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UserRequest>,
) -> Result<Json<User>, ApiError> {
    let id = UserId::new(id);
    let users = &state.repos().users;
    let mut user = users
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with ID {id} not found")))?;

    user.first_name = req.first_name;
    user.last_name = req.last_name;
    user.email = req.email;
    users.update(user.clone()).await?;

    Ok(Json(user))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let id = UserId::new(id);
    if state.repos().users.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("User with ID {id} not found")))
    }
}
