use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use super::TimeOfDay;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    pub id: String,
    pub club_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub court_type: CourtType,
    pub surface: CourtSurface,
    pub status: CourtStatus,
    pub is_available: bool,
    pub price_per_hour: f64,
    pub operating_hours: Option<OperatingHours>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Court {
    /// A court takes new bookings only while active and switched on.
    pub fn is_bookable(&self) -> bool {
        self.status == CourtStatus::Active && self.is_available
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourtType {
    Indoor,
    #[default]
    Outdoor,
    Covered,
}

impl CourtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourtType::Indoor => "indoor",
            CourtType::Outdoor => "outdoor",
            CourtType::Covered => "covered",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "indoor" => CourtType::Indoor,
            "covered" => CourtType::Covered,
            _ => CourtType::Outdoor,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourtSurface {
    #[default]
    ArtificialGrass,
    Concrete,
    Ceramic,
}

impl CourtSurface {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourtSurface::ArtificialGrass => "artificial_grass",
            CourtSurface::Concrete => "concrete",
            CourtSurface::Ceramic => "ceramic",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "concrete" => CourtSurface::Concrete,
            "ceramic" => CourtSurface::Ceramic,
            _ => CourtSurface::ArtificialGrass,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourtStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

impl CourtStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourtStatus::Active => "active",
            CourtStatus::Maintenance => "maintenance",
            CourtStatus::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "maintenance" => CourtStatus::Maintenance,
            "inactive" => CourtStatus::Inactive,
            _ => CourtStatus::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
}

impl DayHours {
    pub fn is_closed(&self) -> bool {
        self.closed.unwrap_or(false)
    }
}

/// Weekly opening hours keyed by lowercase weekday name (`monday`..`sunday`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatingHours(pub BTreeMap<String, DayHours>);

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

impl OperatingHours {
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let hours: OperatingHours = serde_json::from_str(s)?;
        hours.validate()?;
        Ok(hours)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for day in self.0.keys() {
            parse_weekday(day)?;
        }
        Ok(())
    }

    pub fn hours_for(&self, weekday: Weekday) -> Option<&DayHours> {
        self.0.get(WEEKDAYS[weekday.num_days_from_monday() as usize])
    }

    pub fn to_human_readable(&self) -> String {
        WEEKDAYS
            .iter()
            .filter_map(|day| self.0.get(*day).map(|h| (day, h)))
            .map(|(day, h)| {
                let day = capitalize(&day[..3]);
                if h.is_closed() {
                    format!("{day}: closed")
                } else {
                    format!("{day}: {}-{}", h.open, h.close)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + c.as_str(),
    }
}

fn parse_weekday(s: &str) -> anyhow::Result<()> {
    if WEEKDAYS.contains(&s) {
        Ok(())
    } else {
        Err(anyhow::anyhow!("invalid weekday: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let json = r#"{"monday":{"open":"09:00","close":"22:00"},"sunday":{"open":"10:00","close":"14:00","closed":true}}"#;
        let hours = OperatingHours::from_json(json).unwrap();
        assert_eq!(hours.0.len(), 2);
        assert_eq!(hours.hours_for(Weekday::Mon).unwrap().open.to_string(), "09:00");
        assert!(hours.hours_for(Weekday::Sun).unwrap().is_closed());
        assert!(hours.hours_for(Weekday::Tue).is_none());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(OperatingHours::from_json("not json").is_err());
    }

    #[test]
    fn test_parse_invalid_day() {
        let json = r#"{"mon":{"open":"09:00","close":"22:00"}}"#;
        assert!(OperatingHours::from_json(json).is_err());
    }

    #[test]
    fn test_parse_invalid_time() {
        let json = r#"{"monday":{"open":"25:00","close":"22:00"}}"#;
        assert!(OperatingHours::from_json(json).is_err());
    }

    #[test]
    fn test_to_human_readable_orders_by_weekday() {
        let json = r#"{"friday":{"open":"10:00","close":"16:00"},"monday":{"open":"9:00","close":"17:00"},"sunday":{"open":"09:00","close":"10:00","closed":true}}"#;
        let hours = OperatingHours::from_json(json).unwrap();
        assert_eq!(
            hours.to_human_readable(),
            "Mon: 09:00-17:00, Fri: 10:00-16:00, Sun: closed"
        );
    }

    #[test]
    fn test_court_type_serializes_as_type() {
        let json = serde_json::to_value(CourtType::Covered).unwrap();
        assert_eq!(json, "covered");
        assert_eq!(CourtSurface::parse("ceramic"), CourtSurface::Ceramic);
        assert_eq!(CourtStatus::parse("maintenance").as_str(), "maintenance");
    }
}
