//! 文档存储抽象
//!
//! The realtime document database is an external collaborator; the core
//! talks to it through [`DocumentStore`] (reservations, keyed by
//! [`OwnerContext`]) and [`GuestSource`] (guest documents, keyed by
//! organisation and hashed contact).
//!
//! [`InMemoryStore`] implements both for tests, demos and offline use.

pub mod memory;

use async_trait::async_trait;
use shared::models::{
    Guest, OwnerContext, Reservation, ReservationDraft, ReservationUpdate, UserRef, Visit,
};
use tokio::sync::broadcast;

use crate::utils::AppResult;

pub use memory::InMemoryStore;

/// Change notification of a reservation collection
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Added(Reservation),
    Modified(Reservation),
    Removed(String),
    /// Initial snapshot delivered
    Ready,
    Error(String),
}

/// Open subscription: snapshot at subscribe time plus the change stream
pub struct ReservationSubscription {
    pub initial: Vec<Reservation>,
    pub events: broadcast::Receiver<StoreEvent>,
}

/// Reservation collection of one event
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn subscribe_reservations(&self, owner: &OwnerContext)
    -> AppResult<ReservationSubscription>;

    async fn list_reservations(&self, owner: &OwnerContext) -> AppResult<Vec<Reservation>>;

    async fn add_reservation(
        &self,
        owner: &OwnerContext,
        draft: ReservationDraft,
        creator: UserRef,
    ) -> AppResult<Reservation>;

    async fn update_reservation(
        &self,
        owner: &OwnerContext,
        id: &str,
        update: ReservationUpdate,
    ) -> AppResult<()>;

    async fn delete_reservation(&self, owner: &OwnerContext, id: &str) -> AppResult<()>;
}

/// Visit to merge into a guest document
#[derive(Debug, Clone)]
pub struct VisitRecord {
    pub hashed_contact: String,
    pub name: String,
    pub contact: Option<String>,
    pub property_id: String,
    pub visit_id: String,
    pub visit: Visit,
}

/// Guest collection of one organisation
#[async_trait]
pub trait GuestSource: Send + Sync {
    /// Point query by hashed contact
    async fn fetch_guest(&self, organisation_id: &str, hashed_contact: &str)
    -> AppResult<Option<Guest>>;

    async fn list_guests(&self, organisation_id: &str) -> AppResult<Vec<Guest>>;

    /// Create the guest if needed and set one visit; returns the stored guest
    async fn upsert_visit(&self, organisation_id: &str, record: VisitRecord) -> AppResult<Guest>;
}
