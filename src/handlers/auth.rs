use axum::http::HeaderMap;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::User;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> &str {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("")
}

/// Resolves the caller from `Authorization: Bearer <token>`.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    authenticate_token(state, bearer_token(headers))
}

pub fn authenticate_token(state: &AppState, token: &str) -> Result<User, AppError> {
    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }
    let db = state.db()?;
    queries::get_user_by_token(&db, token)?.ok_or(AppError::Unauthorized)
}
