//! In-memory document store
//!
//! Collections live in `parking_lot` maps; every write is fanned out on a
//! per-owner `broadcast` channel the same way the realtime backend pushes
//! snapshots. Subscribing and taking the initial snapshot happen under one
//! lock, so no write can fall between them.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::error::ErrorCode;
use shared::models::{
    Guest, OwnerContext, Reservation, ReservationDraft, ReservationUpdate, UserRef,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::broadcast;

use super::{DocumentStore, GuestSource, ReservationSubscription, StoreEvent, VisitRecord};
use crate::utils::{AppError, AppResult};

const CHANNEL_CAPACITY: usize = 256;

struct Collection {
    docs: BTreeMap<String, Reservation>,
    tx: broadcast::Sender<StoreEvent>,
}

impl Collection {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            docs: BTreeMap::new(),
            tx,
        }
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.tx.send(event);
    }
}

/// Mutation counters, for asserting what reached the store
#[derive(Debug, Default)]
pub struct StoreCalls {
    pub adds: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
}

/// In-memory implementation of [`DocumentStore`] and [`GuestSource`]
#[derive(Default)]
pub struct InMemoryStore {
    reservations: Mutex<HashMap<OwnerContext, Collection>>,
    guests: Mutex<HashMap<String, BTreeMap<String, Guest>>>,
    calls: StoreCalls,
    failing_updates: Mutex<HashSet<String>>,
    fail_adds: AtomicBool,
    fail_deletes: AtomicBool,
    guest_fetches: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &StoreCalls {
        &self.calls
    }

    pub fn add_count(&self) -> usize {
        self.calls.adds.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.calls.updates.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.calls.deletes.load(Ordering::SeqCst)
    }

    /// Point queries served by [`GuestSource::fetch_guest`]
    pub fn guest_fetch_count(&self) -> usize {
        self.guest_fetches.load(Ordering::SeqCst)
    }

    /// Reject every update of this reservation id
    pub fn fail_updates_for(&self, id: impl Into<String>) {
        self.failing_updates.lock().insert(id.into());
    }

    pub fn fail_adds(&self, fail: bool) {
        self.fail_adds.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Insert a guest document directly
    pub fn seed_guest(&self, organisation_id: &str, guest: Guest) {
        self.guests
            .lock()
            .entry(organisation_id.to_string())
            .or_default()
            .insert(guest.hashed_contact.clone(), guest);
    }

    /// Current document by id
    pub fn reservation(&self, owner: &OwnerContext, id: &str) -> Option<Reservation> {
        self.reservations
            .lock()
            .get(owner)
            .and_then(|c| c.docs.get(id).cloned())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn subscribe_reservations(
        &self,
        owner: &OwnerContext,
    ) -> AppResult<ReservationSubscription> {
        let mut collections = self.reservations.lock();
        let collection = collections.entry(owner.clone()).or_insert_with(Collection::new);
        let events = collection.tx.subscribe();
        let initial = collection.docs.values().cloned().collect();
        tracing::debug!(owner = %owner, "Reservation subscription opened");
        Ok(ReservationSubscription { initial, events })
    }

    async fn list_reservations(&self, owner: &OwnerContext) -> AppResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .lock()
            .get(owner)
            .map(|c| c.docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_reservation(
        &self,
        owner: &OwnerContext,
        draft: ReservationDraft,
        creator: UserRef,
    ) -> AppResult<Reservation> {
        self.calls.adds.fetch_add(1, Ordering::SeqCst);
        if self.fail_adds.load(Ordering::SeqCst) {
            return Err(AppError::store("add rejected"));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let reservation = Reservation::from_draft(id.clone(), draft, creator, shared::util::now_millis());

        let mut collections = self.reservations.lock();
        let collection = collections.entry(owner.clone()).or_insert_with(Collection::new);
        collection.docs.insert(id, reservation.clone());
        collection.emit(StoreEvent::Added(reservation.clone()));
        Ok(reservation)
    }

    async fn update_reservation(
        &self,
        owner: &OwnerContext,
        id: &str,
        update: ReservationUpdate,
    ) -> AppResult<()> {
        self.calls.updates.fetch_add(1, Ordering::SeqCst);
        if self.failing_updates.lock().contains(id) {
            return Err(AppError::store(format!("update of {} rejected", id)));
        }

        let mut collections = self.reservations.lock();
        let collection = collections
            .get_mut(owner)
            .ok_or_else(|| AppError::reservation_not_found(id))?;
        let doc = collection
            .docs
            .get_mut(id)
            .ok_or_else(|| AppError::reservation_not_found(id))?;
        doc.apply(&update, shared::util::now_millis());
        let modified = doc.clone();
        collection.emit(StoreEvent::Modified(modified));
        Ok(())
    }

    async fn delete_reservation(&self, owner: &OwnerContext, id: &str) -> AppResult<()> {
        self.calls.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::store("delete rejected"));
        }

        let mut collections = self.reservations.lock();
        let collection = collections
            .get_mut(owner)
            .ok_or_else(|| AppError::reservation_not_found(id))?;
        if collection.docs.remove(id).is_none() {
            return Err(AppError::reservation_not_found(id));
        }
        collection.emit(StoreEvent::Removed(id.to_string()));
        Ok(())
    }
}

#[async_trait]
impl GuestSource for InMemoryStore {
    async fn fetch_guest(
        &self,
        organisation_id: &str,
        hashed_contact: &str,
    ) -> AppResult<Option<Guest>> {
        self.guest_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .guests
            .lock()
            .get(organisation_id)
            .and_then(|g| g.get(hashed_contact).cloned()))
    }

    async fn list_guests(&self, organisation_id: &str) -> AppResult<Vec<Guest>> {
        Ok(self
            .guests
            .lock()
            .get(organisation_id)
            .map(|g| g.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert_visit(&self, organisation_id: &str, record: VisitRecord) -> AppResult<Guest> {
        if record.hashed_contact.is_empty() {
            return Err(AppError::new(ErrorCode::GuestContactMissing));
        }

        let mut guests = self.guests.lock();
        let guest = guests
            .entry(organisation_id.to_string())
            .or_default()
            .entry(record.hashed_contact.clone())
            .or_insert_with(|| Guest::new(record.hashed_contact.clone(), record.name.clone()));

        if guest.contact.is_none() {
            guest.contact = record.contact;
        }
        guest
            .visited_properties
            .entry(record.property_id)
            .or_default()
            .insert(record.visit_id, record.visit);
        Ok(guest.clone())
    }
}
