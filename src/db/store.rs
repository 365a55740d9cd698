use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{BookedSlot, Booking};

/// Data access the booking operations need: read the blocking snapshot for a
/// court and day, then write the booking that passed the check.
pub trait BookingStore {
    fn find_blocking_bookings(
        &self,
        court_id: &str,
        date: NaiveDate,
        exclude_booking_id: Option<&str>,
    ) -> anyhow::Result<Vec<BookedSlot>>;

    fn insert_booking(&self, booking: &Booking) -> anyhow::Result<()>;

    fn update_booking(&self, booking: &Booking) -> anyhow::Result<bool>;
}

impl BookingStore for Connection {
    fn find_blocking_bookings(
        &self,
        court_id: &str,
        date: NaiveDate,
        exclude_booking_id: Option<&str>,
    ) -> anyhow::Result<Vec<BookedSlot>> {
        queries::find_blocking_slots(self, court_id, date, exclude_booking_id)
    }

    fn insert_booking(&self, booking: &Booking) -> anyhow::Result<()> {
        queries::create_booking(self, booking)
    }

    fn update_booking(&self, booking: &Booking) -> anyhow::Result<bool> {
        queries::update_booking(self, booking)
    }
}
