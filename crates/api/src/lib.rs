//! HTTP API server for the event booking system.
//!
//! Provides REST endpoints for users, venues, events and bookings, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use booking::{BookingService, HttpPaymentGateway, PaymentGateway, SimulatedPaymentGateway};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use storage::{PostgresStore, Repositories};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::{Config, DataAccessMode, PaymentMode};
use error::StartupError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub bookings: BookingService,
}

impl AppState {
    pub fn repos(&self) -> &Repositories {
        self.bookings.repositories()
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/api/users",
            get(routes::users::list).post(routes::users::create),
        )
        .route(
            "/api/users/by-email/{email}",
            get(routes::users::get_by_email),
        )
        .route(
            "/api/users/{id}",
            get(routes::users::get)
                .put(routes::users::update)
                .delete(routes::users::delete),
        )
        .route(
            "/api/venues",
            get(routes::venues::list).post(routes::venues::create),
        )
        .route(
            "/api/venues/{id}",
            get(routes::venues::get)
                .put(routes::venues::update)
                .delete(routes::venues::delete),
        )
        .route(
            "/api/events",
            get(routes::events::list).post(routes::events::create),
        )
        .route("/api/events/future", get(routes::events::future))
        .route(
            "/api/events/future-with-availability",
            get(routes::events::future_with_availability),
        )
        .route(
            "/api/events/{id}",
            get(routes::events::get)
                .put(routes::events::update)
                .delete(routes::events::delete),
        )
        .route(
            "/api/bookings",
            get(routes::bookings::list).post(routes::bookings::create),
        )
        .route(
            "/api/bookings/{id}",
            get(routes::bookings::get).delete(routes::bookings::delete),
        )
        .route("/api/bookings/{id}/refund", post(routes::bookings::refund))
        .route(
            "/api/bookings/user/{user_id}",
            get(routes::bookings::by_user),
        )
        .route(
            "/api/bookings/venue/{venue_id}",
            get(routes::bookings::by_venue),
        )
        .route(
            "/api/bookings/venue/{venue_id}/paid-users",
            get(routes::bookings::paid_users_at_venue),
        )
        .route(
            "/api/bookings/venue/{venue_id}/users-without-bookings",
            get(routes::bookings::users_without_bookings),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over empty in-memory repositories and the
/// simulated payment gateway.
pub fn create_default_state() -> Arc<AppState> {
    create_state(
        Repositories::in_memory(),
        Arc::new(SimulatedPaymentGateway::new()),
    )
}

pub fn create_state(repos: Repositories, payments: Arc<dyn PaymentGateway>) -> Arc<AppState> {
    Arc::new(AppState {
        bookings: BookingService::new(repos, payments),
    })
}

/// Builds application state from configuration, connecting to the database
/// and seeding demo data as configured.
pub async fn build_state(config: &Config) -> Result<Arc<AppState>, StartupError> {
    let repos = match &config.data_access {
        DataAccessMode::InMemory => {
            let repos = Repositories::in_memory();
            if config.seed_demo_data {
                storage::seed_demo_data(&repos).await?;
            }
            repos
        }
        DataAccessMode::Postgres {
            url,
            max_connections,
        } => {
            let pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(url)
                .await?;
            let store = PostgresStore::new(pool);
            store.run_migrations().await?;
            tracing::info!(max_connections, "connected to PostgreSQL");
            Repositories::postgres(store)
        }
    };

    let payments: Arc<dyn PaymentGateway> = match &config.payment {
        PaymentMode::Simulated => Arc::new(SimulatedPaymentGateway::new()),
        PaymentMode::External { base_url, timeout } => {
            tracing::info!(%base_url, ?timeout, "using external payment gateway");
            Arc::new(HttpPaymentGateway::new(base_url, *timeout)?)
        }
    };

    Ok(create_state(repos, payments))
}
