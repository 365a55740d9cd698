pub mod activity;
pub mod booking;
pub mod club;
pub mod court;
pub mod time;
pub mod user;

pub use activity::{ActivityEvent, ActivityKind};
pub use booking::{BookedSlot, Booking, BookingStatus, PaymentMethod};
pub use club::{Club, ClubCounts, ClubDetail, CourtSummary, PublicClub, PublicCourt};
pub use court::{Court, CourtStatus, CourtSurface, CourtType, DayHours, OperatingHours};
pub use time::TimeOfDay;
pub use user::{User, UserSummary};
