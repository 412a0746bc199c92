//! Reservation Model

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{AppError, AppResult, ErrorCode};

/// Parse an `HH:mm` reservation time
pub fn parse_reservation_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Table label of a reservation: one table, or several linked tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableLabel {
    Single(String),
    Linked(Vec<String>),
}

impl TableLabel {
    /// Every label this reservation occupies, in order
    pub fn labels(&self) -> Vec<&str> {
        match self {
            TableLabel::Single(label) => vec![label.as_str()],
            TableLabel::Linked(labels) => labels.iter().map(String::as_str).collect(),
        }
    }

    /// First label (the one used in messages)
    pub fn primary(&self) -> &str {
        match self {
            TableLabel::Single(label) => label,
            TableLabel::Linked(labels) => labels.first().map(String::as_str).unwrap_or(""),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels().contains(&label)
    }
}

impl From<&str> for TableLabel {
    fn from(label: &str) -> Self {
        TableLabel::Single(label.to_string())
    }
}

impl From<String> for TableLabel {
    fn from(label: String) -> Self {
        TableLabel::Single(label)
    }
}

impl fmt::Display for TableLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels().join(", "))
    }
}

/// Displayable reservation state
///
/// Derived from the boolean flags; cancellation is a separate flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReservationState {
    #[default]
    Pending,
    WaitingForResponse,
    Confirmed,
    Arrived,
}

impl ReservationState {
    /// Precedence: arrived > confirmed > waiting > pending
    pub fn derive(arrived: bool, confirmed: bool, waiting_for_response: bool) -> Self {
        if arrived {
            Self::Arrived
        } else if confirmed {
            Self::Confirmed
        } else if waiting_for_response {
            Self::WaitingForResponse
        } else {
            Self::Pending
        }
    }
}

/// Lightweight user reference stored on reservations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: String,
    pub name: String,
}

impl UserRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Reservation document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub table_label: TableLabel,
    pub floor_id: String,
    pub guest_name: Option<String>,
    pub guest_contact: Option<String>,
    pub number_of_guests: u32,
    /// Expected arrival, HH:mm
    pub time: String,
    #[serde(default)]
    pub arrived: bool,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub waiting_for_response: bool,
    #[serde(default)]
    pub state: ReservationState,
    pub creator: UserRef,
    pub reserved_by: Option<UserRef>,
    pub reservation_note: Option<String>,
    #[serde(default)]
    pub consumption: Decimal,
    #[serde(default)]
    pub is_vip: bool,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub arrived_at: Option<i64>,
    pub cancelled_at: Option<i64>,
}

impl Reservation {
    /// Build a fresh document from a submitted draft
    pub fn from_draft(
        id: impl Into<String>,
        draft: ReservationDraft,
        creator: UserRef,
        now: i64,
    ) -> Self {
        Self {
            id: id.into(),
            table_label: TableLabel::Single(draft.table_label),
            floor_id: draft.floor_id,
            guest_name: draft.guest_name,
            guest_contact: draft.guest_contact,
            number_of_guests: draft.number_of_guests,
            time: draft.time,
            arrived: false,
            cancelled: false,
            confirmed: false,
            waiting_for_response: false,
            state: ReservationState::Pending,
            creator,
            reserved_by: draft.reserved_by,
            reservation_note: draft.reservation_note,
            consumption: draft.consumption,
            is_vip: draft.is_vip,
            created_at: now,
            updated_at: None,
            arrived_at: None,
            cancelled_at: None,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: &ReservationUpdate, now: i64) {
        if let Some(v) = &update.table_label {
            self.table_label = v.clone();
        }
        if let Some(v) = &update.floor_id {
            self.floor_id = v.clone();
        }
        if let Some(v) = &update.guest_name {
            self.guest_name = v.clone();
        }
        if let Some(v) = &update.guest_contact {
            self.guest_contact = v.clone();
        }
        if let Some(v) = update.number_of_guests {
            self.number_of_guests = v;
        }
        if let Some(v) = &update.time {
            self.time = v.clone();
        }
        if let Some(v) = update.arrived {
            self.arrived = v;
        }
        if let Some(v) = update.cancelled {
            self.cancelled = v;
        }
        if let Some(v) = update.confirmed {
            self.confirmed = v;
        }
        if let Some(v) = update.waiting_for_response {
            self.waiting_for_response = v;
        }
        if let Some(v) = update.state {
            self.state = v;
        }
        if let Some(v) = &update.reserved_by {
            self.reserved_by = v.clone();
        }
        if let Some(v) = &update.reservation_note {
            self.reservation_note = v.clone();
        }
        if let Some(v) = update.consumption {
            self.consumption = v;
        }
        if let Some(v) = update.is_vip {
            self.is_vip = v;
        }
        if let Some(v) = update.arrived_at {
            self.arrived_at = Some(v);
        }
        if let Some(v) = update.cancelled_at {
            self.cancelled_at = Some(v);
        }
        self.updated_at = Some(now);
    }

    /// Form values of this reservation, used to pre-fill the edit dialog
    pub fn to_draft(&self) -> ReservationDraft {
        ReservationDraft {
            floor_id: self.floor_id.clone(),
            table_label: self.table_label.primary().to_string(),
            guest_name: self.guest_name.clone(),
            guest_contact: self.guest_contact.clone(),
            number_of_guests: self.number_of_guests,
            time: self.time.clone(),
            reserved_by: self.reserved_by.clone(),
            reservation_note: self.reservation_note.clone(),
            consumption: self.consumption,
            is_vip: self.is_vip,
        }
    }
}

/// Create/edit form payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDraft {
    pub floor_id: String,
    pub table_label: String,
    pub guest_name: Option<String>,
    pub guest_contact: Option<String>,
    pub number_of_guests: u32,
    pub time: String,
    pub reserved_by: Option<UserRef>,
    pub reservation_note: Option<String>,
    #[serde(default)]
    pub consumption: Decimal,
    #[serde(default)]
    pub is_vip: bool,
}

impl ReservationDraft {
    /// Empty draft for a table
    pub fn new(
        floor_id: impl Into<String>,
        table_label: impl Into<String>,
        number_of_guests: u32,
        time: impl Into<String>,
    ) -> Self {
        Self {
            floor_id: floor_id.into(),
            table_label: table_label.into(),
            guest_name: None,
            guest_contact: None,
            number_of_guests,
            time: time.into(),
            reserved_by: None,
            reservation_note: None,
            consumption: Decimal::ZERO,
            is_vip: false,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.number_of_guests == 0 {
            return Err(AppError::validation("Number of guests must be at least 1")
                .with_detail("field", "numberOfGuests"));
        }
        if parse_reservation_time(&self.time).is_none() {
            return Err(AppError::new(ErrorCode::InvalidReservationTime)
                .with_detail("field", "time")
                .with_detail("value", self.time.clone()));
        }
        if self.consumption.is_sign_negative() {
            return Err(AppError::validation("Consumption cannot be negative")
                .with_detail("field", "consumption"));
        }
        Ok(())
    }
}

/// Present field (even `null`) -> `Some(..)`; absent fields fall back to
/// `None` through `#[serde(default)]`
fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update of a reservation document.
///
/// `None` leaves a field untouched. Clearable fields are doubly optional:
/// `Some(None)` (`null` on the wire) clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_label: Option<TableLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub guest_name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub guest_contact: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_for_response: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ReservationState>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub reserved_by: Option<Option<UserRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub reservation_note: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumption: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrived_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
}

impl ReservationUpdate {
    /// Move to another table (and floor)
    pub fn relocate(table_label: impl Into<String>, floor_id: Option<String>) -> Self {
        Self {
            table_label: Some(TableLabel::Single(table_label.into())),
            floor_id,
            ..Default::default()
        }
    }

    /// Editable form fields of a submitted edit dialog; an emptied field
    /// clears the stored value
    pub fn from_draft(draft: &ReservationDraft) -> Self {
        Self {
            guest_name: Some(draft.guest_name.clone()),
            guest_contact: Some(draft.guest_contact.clone()),
            number_of_guests: Some(draft.number_of_guests),
            time: Some(draft.time.clone()),
            reserved_by: Some(draft.reserved_by.clone()),
            reservation_note: Some(draft.reservation_note.clone()),
            consumption: Some(draft.consumption),
            is_vip: Some(draft.is_vip),
            ..Default::default()
        }
    }
}

/// Single-flag state toggles offered on a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateToggle {
    Arrived,
    Confirmed,
    Cancelled,
    WaitingForResponse,
}

impl StateToggle {
    /// Update that sets this flag to `value` and re-derives the state.
    ///
    /// Arrived and cancelled are not cleared against each other here.
    pub fn to_update(self, reservation: &Reservation, value: bool, now: i64) -> ReservationUpdate {
        let mut arrived = reservation.arrived;
        let mut confirmed = reservation.confirmed;
        let mut waiting = reservation.waiting_for_response;
        let mut update = ReservationUpdate::default();

        match self {
            StateToggle::Arrived => {
                arrived = value;
                update.arrived = Some(value);
                if value {
                    update.arrived_at = Some(now);
                }
            }
            StateToggle::Confirmed => {
                confirmed = value;
                update.confirmed = Some(value);
            }
            StateToggle::WaitingForResponse => {
                waiting = value;
                update.waiting_for_response = Some(value);
            }
            StateToggle::Cancelled => {
                update.cancelled = Some(value);
                if value {
                    update.cancelled_at = Some(now);
                }
            }
        }

        update.state = Some(ReservationState::derive(arrived, confirmed, waiting));
        update
    }
}

impl fmt::Display for StateToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateToggle::Arrived => "arrived",
            StateToggle::Confirmed => "confirmed",
            StateToggle::Cancelled => "cancelled",
            StateToggle::WaitingForResponse => "waiting_for_response",
        };
        f.write_str(name)
    }
}
