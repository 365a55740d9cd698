use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    BookingCreated,
    BookingUpdated,
    BookingCancelled,
    CourtCreated,
    CourtUpdated,
    CourtDeleted,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::BookingCreated => "booking_created",
            ActivityKind::BookingUpdated => "booking_updated",
            ActivityKind::BookingCancelled => "booking_cancelled",
            ActivityKind::CourtCreated => "court_created",
            ActivityKind::CourtUpdated => "court_updated",
            ActivityKind::CourtDeleted => "court_deleted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "booking_created" => Some(ActivityKind::BookingCreated),
            "booking_updated" => Some(ActivityKind::BookingUpdated),
            "booking_cancelled" => Some(ActivityKind::BookingCancelled),
            "court_created" => Some(ActivityKind::CourtCreated),
            "court_updated" => Some(ActivityKind::CourtUpdated),
            "court_deleted" => Some(ActivityKind::CourtDeleted),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: i64,
    pub club_id: String,
    pub booking_id: Option<String>,
    pub kind: ActivityKind,
    pub summary: String,
    pub created_at: String,
}
