//! Guest Model
//!
//! Guests are keyed by the hash of their contact and outlive single events.
//! Visit history is grouped by property, then by visit id (the event id).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One historical visit of a guest at a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    #[serde(default)]
    pub arrived: bool,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub is_vip: bool,
    /// Event date (Unix millis)
    pub date: i64,
    pub event_name: String,
}

impl Visit {
    /// Guest showed up and the reservation was not cancelled
    pub fn is_fulfilled(&self) -> bool {
        self.arrived && !self.cancelled
    }
}

/// Guest document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub hashed_contact: String,
    pub name: String,
    pub contact: Option<String>,
    /// property id -> visit id -> visit
    #[serde(default)]
    pub visited_properties: BTreeMap<String, BTreeMap<String, Visit>>,
}

impl Guest {
    pub fn new(hashed_contact: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            hashed_contact: hashed_contact.into(),
            name: name.into(),
            contact: None,
            visited_properties: BTreeMap::new(),
        }
    }

    pub fn visits_at(&self, property_id: &str) -> Option<&BTreeMap<String, Visit>> {
        self.visited_properties.get(property_id)
    }
}

/// Aggregated visit statistics of a guest at one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestSummary {
    pub total_reservations: usize,
    pub fulfilled_visits: usize,
    /// Percentage with two decimals, e.g. "33.33"
    pub visit_percentage: String,
}

impl GuestSummary {
    pub fn empty() -> Self {
        Self {
            total_reservations: 0,
            fulfilled_visits: 0,
            visit_percentage: "0.00".to_string(),
        }
    }
}

/// Summary tagged with the property it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyGuestSummary {
    pub property_id: String,
    #[serde(flatten)]
    pub summary: GuestSummary,
}
