//! Event Model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::reservation::parse_reservation_time;

/// Event entity (one evening / one calendar date at a property)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    /// Calendar date the event belongs to
    pub date: NaiveDate,
    /// Doors-open time, HH:mm
    pub start_time: String,
}

impl Event {
    /// Event start as a local date-time, `None` when `start_time` is malformed
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        parse_reservation_time(&self.start_time).map(|t| self.date.and_time(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at() {
        let event = Event {
            id: "e1".into(),
            name: "Friday".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            start_time: "21:00".into(),
        };
        let start = event.starts_at().unwrap();
        assert_eq!(start.to_string(), "2024-01-15 21:00:00");

        let broken = Event {
            start_time: "9pm".into(),
            ..event
        };
        assert!(broken.starts_at().is_none());
    }
}
