use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::ActivityKind;
use crate::services::activity::record_activity;
use crate::services::bookings::{self, CourtAvailability};
use crate::services::courts::{self, CourtDetail, CourtWithCount, CreateCourt, ListCourts, UpdateCourt};
use crate::state::AppState;

use super::auth::authenticate;

// GET /api/clubs/:id/courts
pub async fn list_courts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(club_id): Path<String>,
    Query(query): Query<ListCourts>,
) -> Result<Json<Vec<CourtWithCount>>, AppError> {
    let user = authenticate(&state, &headers)?;
    let db = state.db()?;
    Ok(Json(courts::list_courts(&db, &user, &club_id, query)?))
}

// POST /api/clubs/:id/courts
pub async fn create_court(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(club_id): Path<String>,
    Json(input): Json<CreateCourt>,
) -> Result<(StatusCode, Json<CourtWithCount>), AppError> {
    let user = authenticate(&state, &headers)?;
    let created = {
        let db = state.db()?;
        courts::create_court(&db, &user, &club_id, input)?
    };

    tracing::info!(court_id = %created.court.id, club_id = %club_id, "court created");
    record_activity(
        &state,
        &club_id,
        None,
        ActivityKind::CourtCreated,
        &format!("Court {} added", created.court.name),
    );

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/courts/:id
pub async fn get_court(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<CourtDetail>, AppError> {
    let user = authenticate(&state, &headers)?;
    let db = state.db()?;
    Ok(Json(courts::get_court(&db, &user, &id)?))
}

// PUT /api/courts/:id
pub async fn update_court(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateCourt>,
) -> Result<Json<CourtWithCount>, AppError> {
    let user = authenticate(&state, &headers)?;
    let updated = {
        let db = state.db()?;
        courts::update_court(&db, &user, &id, input)?
    };

    record_activity(
        &state,
        &updated.court.club_id,
        None,
        ActivityKind::CourtUpdated,
        &format!("Court {} updated ({})", updated.court.name, updated.court.status.as_str()),
    );

    Ok(Json(updated))
}

// DELETE /api/courts/:id
pub async fn delete_court(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = authenticate(&state, &headers)?;
    let court = {
        let db = state.db()?;
        courts::delete_court(&db, &user, &id)?
    };

    tracing::info!(court_id = %court.id, club_id = %court.club_id, "court deleted");
    record_activity(
        &state,
        &court.club_id,
        None,
        ActivityKind::CourtDeleted,
        &format!("Court {} removed", court.name),
    );

    Ok(Json(serde_json::json!({ "message": "Court deleted successfully" })))
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

// GET /api/courts/:id/availability?date=YYYY-MM-DD
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<CourtAvailability>, AppError> {
    let user = authenticate(&state, &headers)?;
    let date = query
        .date
        .ok_or_else(|| AppError::validation("Date parameter is required"))?;
    let db = state.db()?;
    Ok(Json(bookings::court_availability(&db, &user, &id, &date)?))
}
