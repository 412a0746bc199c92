//! Owner context (tenant path of a reservation document)

use serde::{Deserialize, Serialize};

/// Organisation → property → event path every reservation lives under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerContext {
    pub organisation_id: String,
    pub property_id: String,
    pub event_id: String,
}

impl OwnerContext {
    pub fn new(
        organisation_id: impl Into<String>,
        property_id: impl Into<String>,
        event_id: impl Into<String>,
    ) -> Self {
        Self {
            organisation_id: organisation_id.into(),
            property_id: property_id.into(),
            event_id: event_id.into(),
        }
    }
}

impl std::fmt::Display for OwnerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.organisation_id, self.property_id, self.event_id
        )
    }
}
