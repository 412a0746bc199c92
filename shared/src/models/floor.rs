//! Floor plan models
//!
//! [`Floor`] is the stored definition; [`FloorView`] is the in-memory view
//! model the coordinator projects reservations onto.

use serde::{Deserialize, Serialize};

use super::reservation::Reservation;

/// Floor definition (a named plan holding tables)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tables: Vec<FloorTable>,
}

/// Table definition; `label` is unique within its floor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorTable {
    pub label: String,
    pub seats: Option<u32>,
}

impl FloorTable {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            seats: None,
        }
    }
}

/// Visual fill of a table element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFill {
    #[default]
    Default,
    /// Unconfirmed reservation is overdue
    Warning,
}

/// Table element of a floor view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub label: String,
    pub seats: Option<u32>,
    pub reservation: Option<Reservation>,
    pub fill: TableFill,
}

/// Floor view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorView {
    pub id: String,
    pub name: String,
    pub tables: Vec<TableView>,
}

impl FloorView {
    pub fn table(&self, label: &str) -> Option<&TableView> {
        self.tables.iter().find(|t| t.label == label)
    }

    pub fn table_mut(&mut self, label: &str) -> Option<&mut TableView> {
        self.tables.iter_mut().find(|t| t.label == label)
    }

    /// Drop every reservation slot and reset fills
    pub fn clear(&mut self) {
        for table in &mut self.tables {
            table.reservation = None;
            table.fill = TableFill::Default;
        }
    }
}

impl From<&Floor> for FloorView {
    fn from(floor: &Floor) -> Self {
        Self {
            id: floor.id.clone(),
            name: floor.name.clone(),
            tables: floor
                .tables
                .iter()
                .map(|t| TableView {
                    label: t.label.clone(),
                    seats: t.seats,
                    reservation: None,
                    fill: TableFill::Default,
                })
                .collect(),
        }
    }
}
