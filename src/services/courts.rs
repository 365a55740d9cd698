use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{
    BookingStatus, Court, CourtStatus, CourtSurface, CourtType, OperatingHours, TimeOfDay, User,
};
use crate::services::access::{require_club_access, require_membership};
use crate::services::{scheduling, validate};

const UPCOMING_BOOKINGS_LIMIT: i64 = 10;

fn default_true() -> bool {
    true
}

fn default_price() -> f64 {
    25.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourt {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub court_type: CourtType,
    #[serde(default)]
    pub surface: CourtSurface,
    #[serde(default)]
    pub status: CourtStatus,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default = "default_price")]
    pub price_per_hour: f64,
    pub operating_hours: Option<OperatingHours>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourt {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub court_type: Option<CourtType>,
    pub surface: Option<CourtSurface>,
    pub status: Option<CourtStatus>,
    pub is_available: Option<bool>,
    pub price_per_hour: Option<f64>,
    pub operating_hours: Option<OperatingHours>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCourts {
    pub status: Option<CourtStatus>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingCount {
    pub bookings: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourtWithCount {
    #[serde(flatten)]
    pub court: Court,
    #[serde(rename = "_count")]
    pub count: BookingCount,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingBooking {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub status: BookingStatus,
    pub customer_name: String,
    pub total_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourtDetail {
    #[serde(flatten)]
    pub court: Court,
    pub bookings: Vec<UpcomingBooking>,
    #[serde(rename = "_count")]
    pub count: BookingCount,
}

fn validate_name(name: &str) -> Result<(), AppError> {
    validate::require_len(name, 50, "Court name is required", "Court name too long")
}

fn validate_hours(hours: &Option<OperatingHours>) -> Result<(), AppError> {
    if let Some(hours) = hours {
        hours
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
    }
    Ok(())
}

pub fn create_court(
    conn: &Connection,
    user: &User,
    club_id: &str,
    input: CreateCourt,
) -> Result<CourtWithCount, AppError> {
    validate_name(&input.name)?;
    validate::non_negative(input.price_per_hour, "Price must be positive")?;
    validate_hours(&input.operating_hours)?;

    require_club_access(conn, user, club_id)?;

    if queries::court_name_taken(conn, club_id, &input.name, None)? {
        return Err(AppError::validation("Court name already exists in this club"));
    }

    let now = Utc::now().naive_utc();
    let court = Court {
        id: uuid::Uuid::new_v4().to_string(),
        club_id: club_id.to_string(),
        name: input.name,
        description: validate::non_empty(input.description),
        court_type: input.court_type,
        surface: input.surface,
        status: input.status,
        is_available: input.is_available,
        price_per_hour: input.price_per_hour,
        operating_hours: input.operating_hours,
        created_at: now,
        updated_at: now,
    };
    queries::create_court(conn, &court)?;

    Ok(CourtWithCount {
        court,
        count: BookingCount { bookings: 0 },
    })
}

pub fn list_courts(
    conn: &Connection,
    user: &User,
    club_id: &str,
    query: ListCourts,
) -> Result<Vec<CourtWithCount>, AppError> {
    require_club_access(conn, user, club_id)?;

    let courts = queries::list_courts(conn, club_id, query.status, query.is_available)?;
    Ok(courts
        .into_iter()
        .map(|(court, bookings)| CourtWithCount {
            court,
            count: BookingCount { bookings },
        })
        .collect())
}

pub fn get_court(conn: &Connection, user: &User, id: &str) -> Result<CourtDetail, AppError> {
    let court = queries::get_court(conn, id)?
        .ok_or_else(|| AppError::not_found("Court not found"))?;

    require_membership(user, &court.club_id, "You do not have access to this court")?;

    let bookings = queries::get_upcoming_court_bookings(
        conn,
        &court.id,
        scheduling::today(),
        UPCOMING_BOOKINGS_LIMIT,
    )?
    .into_iter()
    .map(|b| UpcomingBooking {
        id: b.id,
        date: b.date,
        start_time: b.start_time,
        end_time: b.end_time,
        status: b.status,
        customer_name: b.customer_name,
        total_price: b.total_price,
    })
    .collect();
    let total = queries::count_court_bookings(conn, &court.id)?;

    Ok(CourtDetail {
        court,
        bookings,
        count: BookingCount { bookings: total },
    })
}

pub fn update_court(
    conn: &Connection,
    user: &User,
    id: &str,
    input: UpdateCourt,
) -> Result<CourtWithCount, AppError> {
    let mut court = queries::get_court(conn, id)?
        .ok_or_else(|| AppError::not_found("Court not found"))?;

    require_membership(
        user,
        &court.club_id,
        "You do not have permission to update this court",
    )?;

    if let Some(name) = input.name {
        validate_name(&name)?;
        if name != court.name && queries::court_name_taken(conn, &court.club_id, &name, Some(id))? {
            return Err(AppError::validation("Court name already exists in this club"));
        }
        court.name = name;
    }
    if input.description.is_some() {
        court.description = validate::non_empty(input.description);
    }
    if let Some(court_type) = input.court_type {
        court.court_type = court_type;
    }
    if let Some(surface) = input.surface {
        court.surface = surface;
    }
    if let Some(status) = input.status {
        court.status = status;
    }
    if let Some(is_available) = input.is_available {
        court.is_available = is_available;
    }
    if let Some(price) = input.price_per_hour {
        validate::non_negative(price, "Price must be positive")?;
        court.price_per_hour = price;
    }
    if input.operating_hours.is_some() {
        validate_hours(&input.operating_hours)?;
        court.operating_hours = input.operating_hours;
    }
    court.updated_at = Utc::now().naive_utc();

    if !queries::update_court(conn, &court)? {
        return Err(AppError::not_found("Court not found"));
    }
    let bookings = queries::count_court_bookings(conn, &court.id)?;

    Ok(CourtWithCount {
        court,
        count: BookingCount { bookings },
    })
}

/// Deletes a court that has never been booked. Returns the removed court.
pub fn delete_court(conn: &Connection, user: &User, id: &str) -> Result<Court, AppError> {
    let court = queries::get_court(conn, id)?
        .ok_or_else(|| AppError::not_found("Court not found"))?;

    require_membership(
        user,
        &court.club_id,
        "You do not have permission to delete this court",
    )?;

    if queries::count_court_bookings(conn, &court.id)? > 0 {
        return Err(AppError::validation(
            "Cannot delete court with existing bookings. Cancel or complete all bookings first.",
        ));
    }

    queries::delete_court(conn, &court.id)?;
    Ok(court)
}
