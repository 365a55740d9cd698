use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::User;
use crate::services::access::require_admin;
use crate::services::validate;

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionUser {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    pub club_id: Option<String>,
}

/// Returned once at provisioning time; the token is never shown again.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedUser {
    #[serde(flatten)]
    pub user: User,
    pub api_token: String,
}

pub fn provision_user(
    conn: &Connection,
    caller: &User,
    input: ProvisionUser,
) -> Result<ProvisionedUser, AppError> {
    require_admin(caller)?;

    if !validate::is_email(&input.email) {
        return Err(AppError::validation("Invalid email address"));
    }
    validate::require_len(&input.username, 50, "Username is required", "Username too long")?;

    if queries::get_user_by_email(conn, &input.email)?.is_some() {
        return Err(AppError::validation("Email already registered"));
    }
    let club_id = validate::non_empty(input.club_id);
    if let Some(club_id) = &club_id {
        if queries::get_club(conn, club_id)?.is_none() {
            return Err(AppError::not_found("Club not found"));
        }
    }

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: input.email,
        username: input.username,
        is_admin: input.is_admin,
        club_id,
        api_token: uuid::Uuid::new_v4().simple().to_string(),
    };
    queries::create_user(conn, &user)?;
    tracing::info!(user_id = %user.id, is_admin = user.is_admin, "user provisioned");

    Ok(ProvisionedUser {
        api_token: user.api_token.clone(),
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn admin() -> User {
        User {
            id: "admin".to_string(),
            email: "admin@localhost".to_string(),
            username: "admin".to_string(),
            is_admin: true,
            club_id: None,
            api_token: "admin-token".to_string(),
        }
    }

    fn request(email: &str) -> ProvisionUser {
        ProvisionUser {
            email: email.to_string(),
            username: "ana".to_string(),
            is_admin: false,
            club_id: None,
        }
    }

    #[test]
    fn test_provisioned_token_authenticates() {
        let conn = db::init_db(":memory:").unwrap();
        let created = provision_user(&conn, &admin(), request("ana@club.es")).unwrap();
        assert_eq!(created.api_token.len(), 32);

        let found = queries::get_user_by_token(&conn, &created.api_token).unwrap().unwrap();
        assert_eq!(found.email, "ana@club.es");
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let conn = db::init_db(":memory:").unwrap();
        provision_user(&conn, &admin(), request("ana@club.es")).unwrap();
        let err = provision_user(&conn, &admin(), request("ana@club.es")).unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn test_non_admin_forbidden() {
        let conn = db::init_db(":memory:").unwrap();
        let mut caller = admin();
        caller.is_admin = false;
        assert!(matches!(
            provision_user(&conn, &caller, request("ana@club.es")),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_unknown_club_rejected() {
        let conn = db::init_db(":memory:").unwrap();
        let mut input = request("ana@club.es");
        input.club_id = Some("nope".to_string());
        assert!(matches!(
            provision_user(&conn, &admin(), input),
            Err(AppError::NotFound(_))
        ));
    }
}
