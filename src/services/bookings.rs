use chrono::{Datelike, NaiveDate, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::queries::{self, BookingFilter};
use crate::db::BookingStore;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, DayHours, PaymentMethod, TimeOfDay, User};
use crate::services::access::{require_club_access, require_membership};
use crate::services::scheduling::{self, SlotQuery};
use crate::services::validate;

fn default_duration() -> i32 {
    scheduling::DEFAULT_DURATION_MINUTES
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub court_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_duration")]
    pub duration: i32,
    #[serde(default)]
    pub status: BookingStatus,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
    pub total_price: f64,
    #[serde(default)]
    pub is_paid: bool,
    pub payment_method: Option<PaymentMethod>,
}

/// Partial update. Absent fields keep their stored value; court and club are fixed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBooking {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration: Option<i32>,
    pub status: Option<BookingStatus>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
    pub total_price: Option<f64>,
    pub is_paid: Option<bool>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBookings {
    pub court_id: Option<String>,
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityCourt {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub court_type: crate::models::CourtType,
    pub price_per_hour: f64,
    pub operating_hours: Option<DayHours>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TakenSlot {
    pub id: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub status: BookingStatus,
    pub customer_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourtAvailability {
    pub court: AvailabilityCourt,
    pub date: NaiveDate,
    pub bookings: Vec<TakenSlot>,
    pub is_available: bool,
}

fn validate_customer_name(name: &str) -> Result<(), AppError> {
    validate::require_len(name, 100, "Customer name is required", "Customer name too long")
}

pub fn create_booking(
    conn: &Connection,
    user: &User,
    club_id: &str,
    input: CreateBooking,
) -> Result<Booking, AppError> {
    let date = scheduling::parse_date(&input.date)?;
    scheduling::validate_booking_date(date, scheduling::today())?;
    let start_time = scheduling::parse_time(&input.start_time)?;
    let end_time = scheduling::parse_time(&input.end_time)?;
    scheduling::validate_duration(input.duration)?;
    validate_customer_name(&input.customer_name)?;
    let customer_email = validate::optional_email(input.customer_email)?;
    validate::non_negative(input.total_price, "Total price must be positive")?;
    if !input.status.is_blocking() {
        return Err(AppError::validation(
            "New bookings must be pending or confirmed",
        ));
    }

    require_club_access(conn, user, club_id)?;

    let court = queries::get_court(conn, &input.court_id)?
        .filter(|c| c.club_id == club_id)
        .ok_or_else(|| AppError::not_found("Court not found or does not belong to this club"))?;

    if !court.is_bookable() {
        return Err(AppError::validation("Court is not available for booking"));
    }

    scheduling::validate_slot(start_time, end_time, input.duration)?;

    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        club_id: club_id.to_string(),
        court_id: court.id,
        date,
        start_time,
        end_time,
        duration: input.duration,
        status: input.status,
        customer_name: input.customer_name,
        customer_phone: validate::non_empty(input.customer_phone),
        customer_email,
        notes: validate::non_empty(input.notes),
        total_price: input.total_price,
        is_paid: input.is_paid,
        payment_method: input.payment_method,
        created_by_id: user.id.clone(),
        created_at: now,
        updated_at: now,
    };

    // Check and insert under one transaction so no other write lands in between.
    let tx = conn.unchecked_transaction()?;
    let store: &Connection = &tx;
    scheduling::check_slot(store, &slot_query(&booking, None))?;
    store.insert_booking(&booking)?;
    tx.commit()?;

    Ok(booking)
}

pub fn update_booking(
    conn: &Connection,
    user: &User,
    id: &str,
    input: UpdateBooking,
) -> Result<Booking, AppError> {
    let mut booking = queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    require_membership(
        user,
        &booking.club_id,
        "You do not have permission to update this booking",
    )?;

    let was_blocking = booking.status.is_blocking();
    let times_changed =
        input.date.is_some() || input.start_time.is_some() || input.end_time.is_some();

    if let Some(date) = &input.date {
        let date = scheduling::parse_date(date)?;
        scheduling::validate_booking_date(date, scheduling::today())?;
        booking.date = date;
    }
    if let Some(start) = &input.start_time {
        booking.start_time = scheduling::parse_time(start)?;
    }
    if let Some(end) = &input.end_time {
        booking.end_time = scheduling::parse_time(end)?;
    }

    match input.duration {
        Some(duration) => booking.duration = duration,
        None if times_changed => {
            booking.duration = booking.start_time.minutes_until(booking.end_time);
        }
        None => {}
    }
    if times_changed || input.duration.is_some() {
        scheduling::validate_slot(booking.start_time, booking.end_time, booking.duration)?;
    }

    if let Some(status) = input.status {
        booking.status = status;
    }
    if let Some(name) = input.customer_name {
        validate_customer_name(&name)?;
        booking.customer_name = name;
    }
    if input.customer_phone.is_some() {
        booking.customer_phone = validate::non_empty(input.customer_phone);
    }
    if input.customer_email.is_some() {
        booking.customer_email = validate::optional_email(input.customer_email)?;
    }
    if input.notes.is_some() {
        booking.notes = validate::non_empty(input.notes);
    }
    if let Some(price) = input.total_price {
        validate::non_negative(price, "Total price must be positive")?;
        booking.total_price = price;
    }
    if let Some(is_paid) = input.is_paid {
        booking.is_paid = is_paid;
    }
    if input.payment_method.is_some() {
        booking.payment_method = input.payment_method;
    }
    booking.updated_at = Utc::now().naive_utc();

    // A booking brought back to pending/confirmed claims its slot again.
    let reactivated = !was_blocking && booking.status.is_blocking();

    let tx = conn.unchecked_transaction()?;
    let store: &Connection = &tx;
    if times_changed || reactivated {
        scheduling::check_slot(store, &slot_query(&booking, Some(id)))?;
    }
    if !store.update_booking(&booking)? {
        return Err(AppError::not_found("Booking not found"));
    }
    tx.commit()?;

    Ok(booking)
}

pub fn cancel_booking(
    conn: &Connection,
    user: &User,
    id: &str,
    reason: Option<&str>,
) -> Result<Booking, AppError> {
    let mut booking = queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    require_membership(
        user,
        &booking.club_id,
        "You do not have permission to cancel this booking",
    )?;

    match booking.status {
        BookingStatus::Cancelled => {
            return Err(AppError::validation("Booking is already cancelled"));
        }
        BookingStatus::Completed => {
            return Err(AppError::validation("Cannot cancel completed booking"));
        }
        BookingStatus::NoShow => {
            return Err(AppError::validation("Cannot cancel no-show booking"));
        }
        BookingStatus::Pending | BookingStatus::Confirmed => {}
    }

    booking.status = BookingStatus::Cancelled;
    if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
        let notes = format!(
            "{}\n\nCancellation reason: {reason}",
            booking.notes.as_deref().unwrap_or("")
        );
        booking.notes = Some(notes.trim().to_string());
    }
    booking.updated_at = Utc::now().naive_utc();

    if !BookingStore::update_booking(conn, &booking)? {
        return Err(AppError::not_found("Booking not found"));
    }

    Ok(booking)
}

pub fn get_booking(conn: &Connection, user: &User, id: &str) -> Result<Booking, AppError> {
    let booking = queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    require_membership(user, &booking.club_id, "You do not have access to this booking")?;

    Ok(booking)
}

pub fn list_bookings(
    conn: &Connection,
    user: &User,
    club_id: &str,
    query: ListBookings,
) -> Result<Vec<Booking>, AppError> {
    require_club_access(conn, user, club_id)?;

    let date = query.date.as_deref().map(scheduling::parse_date).transpose()?;
    let date_range = match (query.start_date.as_deref(), query.end_date.as_deref()) {
        (Some(start), Some(end)) => Some((scheduling::parse_date(start)?, scheduling::parse_date(end)?)),
        _ => None,
    };

    let filter = BookingFilter {
        club_id: club_id.to_string(),
        court_id: query.court_id,
        date,
        date_range,
        status: query.status,
    };

    Ok(queries::list_bookings(conn, &filter)?)
}

pub fn court_availability(
    conn: &Connection,
    user: &User,
    court_id: &str,
    date: &str,
) -> Result<CourtAvailability, AppError> {
    let date = scheduling::parse_date(date)?;

    let court = queries::get_court(conn, court_id)?
        .ok_or_else(|| AppError::not_found("Court not found"))?;

    require_membership(user, &court.club_id, "You do not have access to this court")?;

    let bookings = queries::get_blocking_bookings_on(conn, &court.id, date)?
        .into_iter()
        .map(|b| TakenSlot {
            id: b.id,
            start_time: b.start_time,
            end_time: b.end_time,
            status: b.status,
            customer_name: b.customer_name,
        })
        .collect();

    let operating_hours = court
        .operating_hours
        .as_ref()
        .and_then(|h| h.hours_for(date.weekday()))
        .cloned();
    let is_available = court.is_bookable();

    Ok(CourtAvailability {
        court: AvailabilityCourt {
            id: court.id,
            name: court.name,
            court_type: court.court_type,
            price_per_hour: court.price_per_hour,
            operating_hours,
        },
        date,
        bookings,
        is_available,
    })
}

fn slot_query<'a>(booking: &'a Booking, exclude_booking_id: Option<&'a str>) -> SlotQuery<'a> {
    SlotQuery {
        court_id: &booking.court_id,
        date: booking.date,
        start: booking.start_time,
        end: booking.end_time,
        exclude_booking_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    const DAY: &str = "2099-06-15";

    fn member() -> User {
        User {
            id: "u1".to_string(),
            email: "u1@example.com".to_string(),
            username: "u1".to_string(),
            is_admin: false,
            club_id: Some("club1".to_string()),
            api_token: "tok".to_string(),
        }
    }

    fn outsider() -> User {
        User {
            id: "u2".to_string(),
            club_id: Some("club2".to_string()),
            ..member()
        }
    }

    fn setup_db() -> Connection {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute_batch(
            "INSERT INTO clubs (id, name, slug, created_at, updated_at) VALUES
               ('club1', 'Club 1', 'club-1', '2030-01-01 00:00:00', '2030-01-01 00:00:00'),
               ('club2', 'Club 2', 'club-2', '2030-01-01 00:00:00', '2030-01-01 00:00:00');
             INSERT INTO users (id, email, username, club_id, api_token, created_at) VALUES
               ('u1', 'u1@example.com', 'u1', 'club1', 'tok', '2030-01-01 00:00:00'),
               ('u2', 'u2@example.com', 'u2', 'club2', 'tok2', '2030-01-01 00:00:00');
             INSERT INTO courts (id, club_id, name, status, is_available, operating_hours, created_at, updated_at) VALUES
               ('c1', 'club1', 'Pista 1', 'active', 1, '{\"monday\":{\"open\":\"09:00\",\"close\":\"22:00\"}}', '2030-01-01 00:00:00', '2030-01-01 00:00:00'),
               ('c2', 'club1', 'Pista 2', 'active', 1, NULL, '2030-01-01 00:00:00', '2030-01-01 00:00:00'),
               ('c3', 'club1', 'Pista 3', 'maintenance', 1, NULL, '2030-01-01 00:00:00', '2030-01-01 00:00:00'),
               ('c9', 'club2', 'Other', 'active', 1, NULL, '2030-01-01 00:00:00', '2030-01-01 00:00:00');",
        )
        .unwrap();
        conn
    }

    fn request(court: &str, start: &str, end: &str, duration: i32) -> CreateBooking {
        CreateBooking {
            court_id: court.to_string(),
            date: DAY.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            duration,
            status: BookingStatus::Pending,
            customer_name: "Marta".to_string(),
            customer_phone: None,
            customer_email: Some(String::new()),
            notes: Some("bring balls".to_string()),
            total_price: 30.0,
            is_paid: false,
            payment_method: None,
        }
    }

    #[test]
    fn test_create_booking() {
        let conn = setup_db();
        let booking = create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:30", 90)).unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.customer_email, None);
        assert_eq!(booking.created_by_id, "u1");

        let stored = queries::get_booking_by_id(&conn, &booking.id).unwrap().unwrap();
        assert_eq!(stored.start_time.to_string(), "10:00");
    }

    #[test]
    fn test_create_rejects_overlap_but_allows_adjacent() {
        let conn = setup_db();
        create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();

        let err = create_booking(&conn, &member(), "club1", request("c1", "10:30", "11:30", 60)).unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg == "Time slot conflicts with existing booking"));

        assert!(create_booking(&conn, &member(), "club1", request("c1", "11:00", "12:00", 60)).is_ok());
        // same time, other court
        assert!(create_booking(&conn, &member(), "club1", request("c2", "10:00", "11:00", 60)).is_ok());
    }

    #[test]
    fn test_create_validation_errors() {
        let conn = setup_db();
        let cases = [
            (request("c1", "10:00", "11:00", 90), "Duration does not match start and end times"),
            (request("c1", "11:00", "10:00", 60), "End time must be after start time"),
            (request("c1", "10:00", "10:15", 15), "Minimum duration is 30 minutes"),
            (request("c1", "25:00", "26:00", 60), "Invalid time format (HH:MM)"),
            (request("c3", "10:00", "11:00", 60), "Court is not available for booking"),
        ];
        for (input, expected) in cases {
            let err = create_booking(&conn, &member(), "club1", input).unwrap_err();
            assert_eq!(err.to_string(), expected);
        }

        let mut past = request("c1", "10:00", "11:00", 60);
        past.date = "2000-01-01".to_string();
        assert!(matches!(create_booking(&conn, &member(), "club1", past), Err(AppError::Validation(_))));

        let mut cancelled = request("c1", "10:00", "11:00", 60);
        cancelled.status = BookingStatus::Cancelled;
        assert!(create_booking(&conn, &member(), "club1", cancelled).is_err());
    }

    #[test]
    fn test_create_checks_club_and_court() {
        let conn = setup_db();
        let err = create_booking(&conn, &outsider(), "club1", request("c1", "10:00", "11:00", 60)).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = create_booking(&conn, &member(), "club1", request("c9", "10:00", "11:00", 60)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = create_booking(&conn, &member(), "nope", request("c1", "10:00", "11:00", 60)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Club not found"));
    }

    #[test]
    fn test_update_same_time_is_not_self_conflict() {
        let conn = setup_db();
        let booking = create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();

        let update = UpdateBooking {
            start_time: Some("10:00".to_string()),
            end_time: Some("11:00".to_string()),
            ..Default::default()
        };
        let updated = update_booking(&conn, &member(), &booking.id, update).unwrap();
        assert_eq!(updated.duration, 60);
    }

    #[test]
    fn test_update_moves_into_taken_slot() {
        let conn = setup_db();
        create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();
        let second = create_booking(&conn, &member(), "club1", request("c1", "12:00", "13:00", 60)).unwrap();

        let update = UpdateBooking {
            start_time: Some("10:30".to_string()),
            end_time: Some("12:00".to_string()),
            ..Default::default()
        };
        let err = update_booking(&conn, &member(), &second.id, update).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let update = UpdateBooking {
            start_time: Some("11:00".to_string()),
            ..Default::default()
        };
        let moved = update_booking(&conn, &member(), &second.id, update).unwrap();
        assert_eq!(moved.duration, 120);
    }

    #[test]
    fn test_update_without_time_change_skips_check() {
        let conn = setup_db();
        let booking = create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();
        let update = UpdateBooking {
            status: Some(BookingStatus::Confirmed),
            is_paid: Some(true),
            payment_method: Some(PaymentMethod::Cash),
            ..Default::default()
        };
        let updated = update_booking(&conn, &member(), &booking.id, update).unwrap();
        assert_eq!(updated.status, BookingStatus::Confirmed);
        assert!(updated.is_paid);
    }

    #[test]
    fn test_reactivating_cancelled_booking_rechecks_slot() {
        let conn = setup_db();
        let first = create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();
        cancel_booking(&conn, &member(), &first.id, None).unwrap();
        create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();

        let update = UpdateBooking {
            status: Some(BookingStatus::Pending),
            ..Default::default()
        };
        let err = update_booking(&conn, &member(), &first.id, update).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_update_requires_membership() {
        let conn = setup_db();
        let booking = create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();
        let err = update_booking(&conn, &outsider(), &booking.id, UpdateBooking::default()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let err = update_booking(&conn, &member(), "missing", UpdateBooking::default()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_cancel_frees_slot_and_appends_reason() {
        let conn = setup_db();
        let booking = create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();

        let cancelled = cancel_booking(&conn, &member(), &booking.id, Some("rain")).unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(
            cancelled.notes.as_deref(),
            Some("bring balls\n\nCancellation reason: rain")
        );

        assert!(create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).is_ok());

        let err = cancel_booking(&conn, &member(), &booking.id, None).unwrap_err();
        assert_eq!(err.to_string(), "Booking is already cancelled");
    }

    #[test]
    fn test_cannot_cancel_terminal_bookings() {
        let conn = setup_db();
        let booking = create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();
        let update = UpdateBooking {
            status: Some(BookingStatus::Completed),
            ..Default::default()
        };
        update_booking(&conn, &member(), &booking.id, update).unwrap();

        let err = cancel_booking(&conn, &member(), &booking.id, None).unwrap_err();
        assert_eq!(err.to_string(), "Cannot cancel completed booking");
    }

    #[test]
    fn test_update_start_past_end_is_rejected() {
        let conn = setup_db();
        let booking = create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();

        let update = UpdateBooking {
            start_time: Some("12:00".to_string()),
            ..Default::default()
        };
        let err = update_booking(&conn, &member(), &booking.id, update).unwrap_err();
        assert_eq!(err.to_string(), "End time must be after start time");

        let stored = queries::get_booking_by_id(&conn, &booking.id).unwrap().unwrap();
        assert_eq!(stored.start_time.to_string(), "10:00");
    }

    #[test]
    fn test_cannot_cancel_no_show_booking() {
        let conn = setup_db();
        let booking = create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();
        let update = UpdateBooking {
            status: Some(BookingStatus::NoShow),
            ..Default::default()
        };
        update_booking(&conn, &member(), &booking.id, update).unwrap();

        let err = cancel_booking(&conn, &member(), &booking.id, None).unwrap_err();
        assert_eq!(err.to_string(), "Cannot cancel no-show booking");
    }

    #[test]
    fn test_list_bookings_by_date_range() {
        let conn = setup_db();
        create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();
        let mut later = request("c1", "10:00", "11:00", 60);
        later.date = "2099-06-20".to_string();
        create_booking(&conn, &member(), "club1", later).unwrap();
        let mut outside = request("c1", "10:00", "11:00", 60);
        outside.date = "2099-07-01".to_string();
        create_booking(&conn, &member(), "club1", outside).unwrap();

        let range = ListBookings {
            start_date: Some("2099-06-15".to_string()),
            end_date: Some("2099-06-20".to_string()),
            ..Default::default()
        };
        let found = list_bookings(&conn, &member(), "club1", range).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].date.to_string(), "2099-06-15");
        assert_eq!(found[1].date.to_string(), "2099-06-20");

        // one bound alone does not filter
        let open_ended = ListBookings {
            start_date: Some("2099-06-20".to_string()),
            ..Default::default()
        };
        assert_eq!(list_bookings(&conn, &member(), "club1", open_ended).unwrap().len(), 3);
    }

    #[test]
    fn test_list_bookings_filters() {
        let conn = setup_db();
        create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();
        create_booking(&conn, &member(), "club1", request("c2", "9:00", "10:00", 60)).unwrap();

        let all = list_bookings(&conn, &member(), "club1", ListBookings::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].court_id, "c2");

        let only_c1 = ListBookings {
            court_id: Some("c1".to_string()),
            ..Default::default()
        };
        assert_eq!(list_bookings(&conn, &member(), "club1", only_c1).unwrap().len(), 1);

        let other_day = ListBookings {
            date: Some("2099-06-16".to_string()),
            ..Default::default()
        };
        assert!(list_bookings(&conn, &member(), "club1", other_day).unwrap().is_empty());

        let bad = ListBookings {
            date: Some("15/06/2099".to_string()),
            ..Default::default()
        };
        assert!(matches!(list_bookings(&conn, &member(), "club1", bad), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_court_availability() {
        let conn = setup_db();
        let kept = create_booking(&conn, &member(), "club1", request("c1", "18:00", "19:30", 90)).unwrap();
        let dropped = create_booking(&conn, &member(), "club1", request("c1", "10:00", "11:00", 60)).unwrap();
        cancel_booking(&conn, &member(), &dropped.id, None).unwrap();

        // 2099-06-15 is a Monday
        let availability = court_availability(&conn, &member(), "c1", DAY).unwrap();
        assert!(availability.is_available);
        assert_eq!(availability.bookings.len(), 1);
        assert_eq!(availability.bookings[0].id, kept.id);
        assert_eq!(availability.court.operating_hours.unwrap().close.to_string(), "22:00");

        let err = court_availability(&conn, &outsider(), "c1", DAY).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
