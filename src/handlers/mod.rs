use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod clubs;
pub mod courts;
pub mod events;
pub mod health;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/admin/users", post(admin::create_user))
        .route("/api/me/club", get(clubs::get_my_club))
        .route("/api/clubs", post(clubs::create_club))
        .route("/api/clubs/:id", get(clubs::get_club).put(clubs::update_club))
        .route("/api/public/clubs/:slug", get(clubs::get_public_club))
        .route("/api/clubs/:id/stats", get(clubs::get_stats))
        .route("/api/clubs/:id/activity", get(clubs::get_activity))
        .route("/api/clubs/:id/events", get(events::events_stream))
        .route(
            "/api/clubs/:id/courts",
            get(courts::list_courts).post(courts::create_court),
        )
        .route(
            "/api/courts/:id",
            get(courts::get_court)
                .put(courts::update_court)
                .delete(courts::delete_court),
        )
        .route("/api/courts/:id/availability", get(courts::get_availability))
        .route(
            "/api/clubs/:id/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/api/bookings/:id",
            get(bookings::get_booking).put(bookings::update_booking),
        )
        .route("/api/bookings/:id/cancel", post(bookings::cancel_booking))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
