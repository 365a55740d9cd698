use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{ActivityKind, Booking, BookingStatus};
use crate::services::activity::record_activity;
use crate::services::bookings::{self, CreateBooking, ListBookings, UpdateBooking};
use crate::state::AppState;

use super::auth::authenticate;

fn describe(booking: &Booking) -> String {
    format!(
        "{} on {} {}-{}",
        booking.customer_name, booking.date, booking.start_time, booking.end_time
    )
}

/// A status change to cancelled is reported as a cancellation, anything else as an update.
fn update_activity(requested_status: Option<BookingStatus>, booking: &Booking) -> (ActivityKind, String) {
    if requested_status == Some(BookingStatus::Cancelled) {
        (
            ActivityKind::BookingCancelled,
            format!("Booking cancelled: {}", describe(booking)),
        )
    } else {
        (
            ActivityKind::BookingUpdated,
            format!("Booking updated: {}", describe(booking)),
        )
    }
}

// GET /api/clubs/:id/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(club_id): Path<String>,
    Query(query): Query<ListBookings>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let user = authenticate(&state, &headers)?;
    let db = state.db()?;
    Ok(Json(bookings::list_bookings(&db, &user, &club_id, query)?))
}

// POST /api/clubs/:id/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(club_id): Path<String>,
    Json(input): Json<CreateBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let user = authenticate(&state, &headers)?;
    let booking = {
        let db = state.db()?;
        bookings::create_booking(&db, &user, &club_id, input)?
    };

    tracing::info!(
        booking_id = %booking.id,
        court_id = %booking.court_id,
        date = %booking.date,
        "booking created"
    );
    record_activity(
        &state,
        &booking.club_id,
        Some(&booking.id),
        ActivityKind::BookingCreated,
        &format!("New booking: {}", describe(&booking)),
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let user = authenticate(&state, &headers)?;
    let db = state.db()?;
    Ok(Json(bookings::get_booking(&db, &user, &id)?))
}

// PUT /api/bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateBooking>,
) -> Result<Json<Booking>, AppError> {
    let user = authenticate(&state, &headers)?;
    let requested_status = input.status;
    let booking = {
        let db = state.db()?;
        bookings::update_booking(&db, &user, &id, input)?
    };

    tracing::info!(booking_id = %booking.id, status = booking.status.as_str(), "booking updated");
    let (kind, summary) = update_activity(requested_status, &booking);
    record_activity(&state, &booking.club_id, Some(&booking.id), kind, &summary);

    Ok(Json(booking))
}

#[derive(Deserialize, Default)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<CancelRequest>>,
) -> Result<Json<Booking>, AppError> {
    let user = authenticate(&state, &headers)?;
    let reason = body.and_then(|Json(req)| req.reason);
    let booking = {
        let db = state.db()?;
        bookings::cancel_booking(&db, &user, &id, reason.as_deref())?
    };

    tracing::info!(booking_id = %booking.id, "booking cancelled");
    record_activity(
        &state,
        &booking.club_id,
        Some(&booking.id),
        ActivityKind::BookingCancelled,
        &format!("Booking cancelled: {}", describe(&booking)),
    );

    Ok(Json(booking))
}
