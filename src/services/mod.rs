pub mod access;
pub mod activity;
pub mod bookings;
pub mod clubs;
pub mod courts;
pub mod dashboard;
pub mod scheduling;
pub mod users;
pub mod validate;
