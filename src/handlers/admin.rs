use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::errors::AppError;
use crate::services::users::{self, ProvisionUser, ProvisionedUser};
use crate::state::AppState;

use super::auth::authenticate;

// POST /api/admin/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<ProvisionUser>,
) -> Result<(StatusCode, Json<ProvisionedUser>), AppError> {
    let caller = authenticate(&state, &headers)?;
    let created = {
        let db = state.db()?;
        users::provision_user(&db, &caller, input)?
    };
    Ok((StatusCode::CREATED, Json(created)))
}
