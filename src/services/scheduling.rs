//! Booking time rules: slot validation and the court double-booking check.
//!
//! The conflict check is a pure predicate over a snapshot of existing
//! bookings. [`check_slot`] reads that snapshot through a [`BookingStore`]
//! and turns an overlap into [`AppError::Conflict`].

use chrono::NaiveDate;

use crate::db::BookingStore;
use crate::errors::AppError;
use crate::models::{BookedSlot, TimeOfDay};

pub const MIN_DURATION_MINUTES: i32 = 30;
pub const MAX_DURATION_MINUTES: i32 = 240;
pub const DEFAULT_DURATION_MINUTES: i32 = 90;

pub const CONFLICT_MESSAGE: &str = "Time slot conflicts with existing booking";

/// A candidate reservation to test against the bookings already on a court.
#[derive(Debug, Clone, Copy)]
pub struct SlotQuery<'a> {
    pub court_id: &'a str,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    /// The booking being edited, which must not collide with itself.
    pub exclude_booking_id: Option<&'a str>,
}

/// Half-open overlap between an existing `[existing_start, existing_end)` and a
/// candidate `[start, end)`. Touching endpoints do not overlap.
pub fn overlaps(
    existing_start: TimeOfDay,
    existing_end: TimeOfDay,
    start: TimeOfDay,
    end: TimeOfDay,
) -> bool {
    // candidate starts during the existing booking, or at its start
    let starts_during = existing_start <= start && existing_end > start;
    // candidate ends during the existing booking, or at its end
    let ends_during = existing_start < end && existing_end >= end;
    // candidate swallows the existing booking
    let contains = existing_start >= start && existing_end <= end;

    starts_during || ends_during || contains
}

/// True when any blocking booking for the same court and date, other than the
/// excluded one, overlaps the candidate. Expects `query.end > query.start`.
pub fn has_conflict(existing: &[BookedSlot], query: &SlotQuery<'_>) -> bool {
    existing
        .iter()
        .filter(|b| b.court_id == query.court_id && b.date == query.date)
        .filter(|b| b.status.is_blocking())
        .filter(|b| query.exclude_booking_id != Some(b.id.as_str()))
        .any(|b| overlaps(b.start_time, b.end_time, query.start, query.end))
}

pub fn check_slot<S>(store: &S, query: &SlotQuery<'_>) -> Result<(), AppError>
where
    S: BookingStore + ?Sized,
{
    let existing =
        store.find_blocking_bookings(query.court_id, query.date, query.exclude_booking_id)?;

    if has_conflict(&existing, query) {
        tracing::info!(
            court_id = %query.court_id,
            date = %query.date,
            start = %query.start,
            end = %query.end,
            "rejected overlapping booking"
        );
        return Err(AppError::Conflict(CONFLICT_MESSAGE.to_string()));
    }

    Ok(())
}

/// Checks that `[start, end)` is a positive span matching the declared duration.
pub fn validate_slot(start: TimeOfDay, end: TimeOfDay, duration: i32) -> Result<(), AppError> {
    let actual = start.minutes_until(end);
    if actual <= 0 {
        return Err(AppError::validation("End time must be after start time"));
    }
    validate_duration(duration)?;

    if actual != duration {
        return Err(AppError::validation(
            "Duration does not match start and end times",
        ));
    }
    Ok(())
}

pub fn validate_duration(duration: i32) -> Result<(), AppError> {
    if duration < MIN_DURATION_MINUTES {
        return Err(AppError::validation("Minimum duration is 30 minutes"));
    }
    if duration > MAX_DURATION_MINUTES {
        return Err(AppError::validation("Maximum duration is 4 hours"));
    }
    Ok(())
}

pub fn validate_booking_date(date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if date < today {
        return Err(AppError::validation(
            "Booking date must be today or in the future",
        ));
    }
    Ok(())
}

pub fn parse_time(s: &str) -> Result<TimeOfDay, AppError> {
    TimeOfDay::parse(s).map_err(|e| AppError::validation(e.to_string()))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::validation("Invalid date format (YYYY-MM-DD)"))
}

/// The server's local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
