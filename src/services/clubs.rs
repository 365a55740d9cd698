use chrono::Utc;
use rusqlite::Connection;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Club, ClubCounts, ClubDetail, PublicClub, PublicCourt, User};
use crate::services::access::require_club_access;
use crate::services::validate;

fn default_country() -> String {
    "Spain".to_string()
}

fn default_timezone() -> String {
    "Europe/Madrid".to_string()
}

fn default_currency() -> String {
    "EUR".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClub {
    pub name: String,
    pub slug: String,
    pub address: Option<String>,
    pub city: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub settings: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClub {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub timezone: Option<String>,
    pub currency: Option<String>,
    pub settings: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

fn validate_name(name: &str) -> Result<(), AppError> {
    validate::require_len(name, 100, "Club name is required", "Club name too long")
}

fn validate_slug(slug: &str) -> Result<(), AppError> {
    validate::require_len(slug, 50, "Slug is required", "Slug too long")?;
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::validation(
            "Slug can only contain lowercase letters, numbers, and hyphens",
        ));
    }
    Ok(())
}

fn validate_website(website: Option<String>) -> Result<Option<String>, AppError> {
    match validate::non_empty(website) {
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
            Err(AppError::validation("Invalid website URL"))
        }
        other => Ok(other),
    }
}

fn validate_settings(settings: Option<serde_json::Value>) -> Result<Option<serde_json::Value>, AppError> {
    match settings {
        Some(value) if !value.is_object() => Err(AppError::validation("Settings must be an object")),
        other => Ok(other),
    }
}

/// Creates a club and makes the caller its member.
pub fn create_club(conn: &Connection, user: &User, input: CreateClub) -> Result<ClubDetail, AppError> {
    validate_name(&input.name)?;
    validate_slug(&input.slug)?;
    let email = validate::optional_email(input.email)?;
    let website = validate_website(input.website)?;
    let settings = validate_settings(input.settings)?;

    if queries::get_club_by_slug(conn, &input.slug)?.is_some() {
        return Err(AppError::validation("Club slug already exists"));
    }

    let now = Utc::now().naive_utc();
    let club = Club {
        id: uuid::Uuid::new_v4().to_string(),
        name: input.name,
        slug: input.slug,
        address: validate::non_empty(input.address),
        city: validate::non_empty(input.city),
        country: input.country,
        phone: validate::non_empty(input.phone),
        email,
        website,
        timezone: input.timezone,
        currency: input.currency,
        settings: settings.unwrap_or_else(|| serde_json::json!({})),
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let tx = conn.unchecked_transaction()?;
    queries::create_club(&tx, &club)?;
    queries::set_user_club(&tx, &user.id, Some(&club.id))?;
    tx.commit()?;
    tracing::info!(club_id = %club.id, user_id = %user.id, "club created");

    club_detail(conn, club)
}

fn club_detail(conn: &Connection, club: Club) -> Result<ClubDetail, AppError> {
    let users = queries::list_club_members(conn, &club.id)?;
    let courts = queries::list_court_summaries(conn, &club.id)?;
    let counts = ClubCounts {
        courts: queries::count_club_courts(conn, &club.id)?,
        bookings: queries::count_club_bookings(conn, &club.id)?,
    };

    Ok(ClubDetail {
        club,
        users,
        courts,
        counts,
    })
}

pub fn get_club(conn: &Connection, user: &User, id: &str) -> Result<ClubDetail, AppError> {
    let club = require_club_access(conn, user, id)?;
    club_detail(conn, club)
}

pub fn update_club(
    conn: &Connection,
    user: &User,
    id: &str,
    input: UpdateClub,
) -> Result<ClubDetail, AppError> {
    let mut club = require_club_access(conn, user, id)?;

    if let Some(name) = input.name {
        validate_name(&name)?;
        club.name = name;
    }
    if let Some(slug) = input.slug {
        validate_slug(&slug)?;
        if slug != club.slug && queries::get_club_by_slug(conn, &slug)?.is_some() {
            return Err(AppError::validation("Club slug already exists"));
        }
        club.slug = slug;
    }
    if input.address.is_some() {
        club.address = validate::non_empty(input.address);
    }
    if input.city.is_some() {
        club.city = validate::non_empty(input.city);
    }
    if let Some(country) = input.country {
        club.country = country;
    }
    if input.phone.is_some() {
        club.phone = validate::non_empty(input.phone);
    }
    if input.email.is_some() {
        club.email = validate::optional_email(input.email)?;
    }
    if input.website.is_some() {
        club.website = validate_website(input.website)?;
    }
    if let Some(timezone) = input.timezone {
        club.timezone = timezone;
    }
    if let Some(currency) = input.currency {
        club.currency = currency;
    }
    if let Some(settings) = validate_settings(input.settings)? {
        club.settings = settings;
    }
    if let Some(is_active) = input.is_active {
        club.is_active = is_active;
    }
    club.updated_at = Utc::now().naive_utc();

    if !queries::update_club(conn, &club)? {
        return Err(AppError::not_found("Club not found"));
    }
    club_detail(conn, club)
}

/// Public page of an active club, listing only courts that take bookings.
pub fn get_club_by_slug(conn: &Connection, slug: &str) -> Result<PublicClub, AppError> {
    let club = queries::get_club_by_slug(conn, slug)?
        .filter(|c| c.is_active)
        .ok_or_else(|| AppError::not_found("Club not found"))?;

    let courts = queries::list_courts(conn, &club.id, None, None)?
        .into_iter()
        .map(|(court, _)| court)
        .filter(|court| court.is_bookable())
        .map(|court| PublicCourt {
            id: court.id,
            name: court.name,
            court_type: court.court_type,
            price_per_hour: court.price_per_hour,
            hours_summary: court.operating_hours.as_ref().map(|h| h.to_human_readable()),
            operating_hours: court.operating_hours,
        })
        .collect();

    Ok(PublicClub {
        id: club.id,
        name: club.name,
        slug: club.slug,
        address: club.address,
        city: club.city,
        country: club.country,
        phone: club.phone,
        email: club.email,
        website: club.website,
        timezone: club.timezone,
        settings: club.settings,
        courts,
    })
}

/// The caller's own club, if they belong to one.
pub fn get_user_club(conn: &Connection, user: &User) -> Result<Option<ClubDetail>, AppError> {
    match user.club_id.as_deref() {
        Some(club_id) => get_club(conn, user, club_id).map(Some),
        None => Ok(None),
    }
}
