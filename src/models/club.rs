use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{CourtStatus, CourtType, OperatingHours, UserSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub timezone: String,
    pub currency: String,
    pub settings: serde_json::Value,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourtSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub court_type: CourtType,
    pub status: CourtStatus,
    pub is_available: bool,
    pub price_per_hour: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClubCounts {
    pub courts: i64,
    pub bookings: i64,
}

/// A club with the members, courts and totals shown on its dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ClubDetail {
    #[serde(flatten)]
    pub club: Club,
    pub users: Vec<UserSummary>,
    pub courts: Vec<CourtSummary>,
    #[serde(rename = "_count")]
    pub counts: ClubCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicCourt {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub court_type: CourtType,
    pub price_per_hour: f64,
    pub operating_hours: Option<OperatingHours>,
    /// e.g. `Mon: 09:00-22:00, Sun: closed`
    pub hours_summary: Option<String>,
}

/// What an anonymous visitor sees of an active club.
#[derive(Debug, Clone, Serialize)]
pub struct PublicClub {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub timezone: String,
    pub settings: serde_json::Value,
    pub courts: Vec<PublicCourt>,
}
