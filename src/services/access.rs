use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Club, User};

/// Loads the club and checks that `user` belongs to it (or is a platform admin).
pub fn require_club_access(conn: &Connection, user: &User, club_id: &str) -> Result<Club, AppError> {
    let club = queries::get_club(conn, club_id)?
        .ok_or_else(|| AppError::not_found("Club not found"))?;

    if !user.can_access_club(&club.id) {
        tracing::warn!(user_id = %user.id, club_id = %club.id, "club access denied");
        return Err(AppError::forbidden("You do not have access to this club"));
    }

    Ok(club)
}

pub fn require_membership(user: &User, club_id: &str, message: &str) -> Result<(), AppError> {
    if user.can_access_club(club_id) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, club_id = %club_id, "club access denied");
        Err(AppError::forbidden(message))
    }
}

pub fn require_admin(user: &User) -> Result<(), AppError> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AppError::forbidden("Admin access required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn user(club_id: Option<&str>, is_admin: bool) -> User {
        User {
            id: "u1".to_string(),
            email: "u1@example.com".to_string(),
            username: "u1".to_string(),
            is_admin,
            club_id: club_id.map(str::to_string),
            api_token: "tok".to_string(),
        }
    }

    fn setup_db() -> Connection {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute(
            "INSERT INTO clubs (id, name, slug, created_at, updated_at)
             VALUES ('club1', 'Club', 'club', '2030-01-01 00:00:00', '2030-01-01 00:00:00')",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_member_has_access() {
        let conn = setup_db();
        let club = require_club_access(&conn, &user(Some("club1"), false), "club1").unwrap();
        assert_eq!(club.slug, "club");
    }

    #[test]
    fn test_admin_has_access_everywhere() {
        let conn = setup_db();
        assert!(require_club_access(&conn, &user(None, true), "club1").is_ok());
    }

    #[test]
    fn test_outsider_is_forbidden() {
        let conn = setup_db();
        let err = require_club_access(&conn, &user(Some("other"), false), "club1").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_missing_club_is_not_found() {
        let conn = setup_db();
        let err = require_club_access(&conn, &user(None, true), "nope").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
