use rusqlite::Connection;

use crate::db::queries::{self, DashboardStats};
use crate::errors::AppError;
use crate::models::{ActivityEvent, User};
use crate::services::access::require_club_access;
use crate::services::scheduling;

pub const DEFAULT_ACTIVITY_LIMIT: i64 = 20;
pub const MAX_ACTIVITY_LIMIT: i64 = 100;

pub fn dashboard_stats(conn: &Connection, user: &User, club_id: &str) -> Result<DashboardStats, AppError> {
    require_club_access(conn, user, club_id)?;
    Ok(queries::get_dashboard_stats(conn, club_id, scheduling::today())?)
}

/// Newest first. `limit` falls back to the default and is capped.
pub fn recent_activity(
    conn: &Connection,
    user: &User,
    club_id: &str,
    limit: Option<i64>,
) -> Result<Vec<ActivityEvent>, AppError> {
    require_club_access(conn, user, club_id)?;
    let limit = limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .min(MAX_ACTIVITY_LIMIT);
    Ok(queries::get_recent_activity(conn, club_id, limit)?)
}
