use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    pub club_id: Option<String>,
    #[serde(skip_serializing)]
    pub api_token: String,
}

impl User {
    pub fn can_access_club(&self, club_id: &str) -> bool {
        self.is_admin || self.club_id.as_deref() == Some(club_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
}
