use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::db::queries::DashboardStats;
use crate::errors::AppError;
use crate::models::{ActivityEvent, ClubDetail, PublicClub};
use crate::services::clubs::{self, CreateClub, UpdateClub};
use crate::services::dashboard;
use crate::state::AppState;

use super::auth::authenticate;

// POST /api/clubs
pub async fn create_club(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<CreateClub>,
) -> Result<(StatusCode, Json<ClubDetail>), AppError> {
    let user = authenticate(&state, &headers)?;
    let club = {
        let db = state.db()?;
        clubs::create_club(&db, &user, input)?
    };
    Ok((StatusCode::CREATED, Json(club)))
}

// GET /api/clubs/:id
pub async fn get_club(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ClubDetail>, AppError> {
    let user = authenticate(&state, &headers)?;
    let db = state.db()?;
    Ok(Json(clubs::get_club(&db, &user, &id)?))
}

// PUT /api/clubs/:id
pub async fn update_club(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateClub>,
) -> Result<Json<ClubDetail>, AppError> {
    let user = authenticate(&state, &headers)?;
    let club = {
        let db = state.db()?;
        clubs::update_club(&db, &user, &id, input)?
    };
    tracing::info!(club_id = %id, user_id = %user.id, "club updated");
    Ok(Json(club))
}

// GET /api/public/clubs/:slug
pub async fn get_public_club(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PublicClub>, AppError> {
    let db = state.db()?;
    Ok(Json(clubs::get_club_by_slug(&db, &slug)?))
}

// GET /api/me/club
pub async fn get_my_club(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Option<ClubDetail>>, AppError> {
    let user = authenticate(&state, &headers)?;
    let db = state.db()?;
    Ok(Json(clubs::get_user_club(&db, &user)?))
}

// GET /api/clubs/:id/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DashboardStats>, AppError> {
    let user = authenticate(&state, &headers)?;
    let db = state.db()?;
    Ok(Json(dashboard::dashboard_stats(&db, &user, &id)?))
}

#[derive(Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

// GET /api/clubs/:id/activity
pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityEvent>>, AppError> {
    let user = authenticate(&state, &headers)?;
    let db = state.db()?;
    Ok(Json(dashboard::recent_activity(&db, &user, &id, query.limit)?))
}
