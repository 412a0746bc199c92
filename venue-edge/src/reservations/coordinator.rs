//! Reservation coordinator
//!
//! One instance per open event view. It owns the floor projection, the
//! latest reservation snapshot, the pending create dialog and the pending
//! transfer selection. State sits behind a `parking_lot::Mutex` that is
//! never held across an `.await`; every store write goes through
//! [`run_guarded`].

use chrono::{Duration, NaiveDateTime};
use parking_lot::Mutex;
use shared::error::ErrorCode;
use shared::models::{
    Event, Floor, FloorView, OwnerContext, Reservation, ReservationUpdate, StateToggle, TableView,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use super::transfer::{PlannedMove, TransferPlan, plan_transfer};
use super::{TableRef, expiry, projection};
use crate::auth::{CurrentUser, permissions};
use crate::core::Config;
use crate::guests::GuestStore;
use crate::store::{DocumentStore, StoreEvent};
use crate::ui::{
    ConfirmPrompt, DialogId, DialogKind, DialogOutcome, DialogPresenter, DialogRequest, Notifier,
    run_guarded,
};
use crate::utils::time::{Clock, SystemClock, format_hhmm};
use crate::utils::{AppError, AppResult};

/// Result of one user interaction, mostly for callers that want to log it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing offered (no permission, unknown table, dialog closed)
    Ignored,
    Created,
    Updated,
    Deleted,
    StateChanged,
    /// Reservation selected as transfer source
    TransferSelected,
    /// Source clicked again
    TransferCancelled,
    Transferred,
    /// Confirmation declined
    Declined,
    /// Create dialog force-closed because the table got reserved meanwhile
    Preempted,
    /// Mutation failed; already surfaced to the user
    Failed,
}

struct PendingCreate {
    table: TableRef,
    dialog: DialogId,
}

#[derive(Default)]
struct CoordinatorState {
    floors: Vec<FloorView>,
    reservations: BTreeMap<String, Reservation>,
    pending_create: Option<PendingCreate>,
    pending_transfer: Option<TableRef>,
}

pub struct ReservationCoordinator {
    owner: OwnerContext,
    event: Event,
    user: CurrentUser,
    store: Arc<dyn DocumentStore>,
    dialogs: Arc<dyn DialogPresenter>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    guests: Option<Arc<GuestStore>>,
    default_party_size: u32,
    expiry_threshold: Duration,
    state: Mutex<CoordinatorState>,
}

impl ReservationCoordinator {
    pub fn new(
        owner: OwnerContext,
        event: Event,
        user: CurrentUser,
        store: Arc<dyn DocumentStore>,
        dialogs: Arc<dyn DialogPresenter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let config = Config::default();
        Self {
            owner,
            event,
            user,
            store,
            dialogs,
            notifier,
            clock: Arc::new(SystemClock),
            guests: None,
            default_party_size: config.default_party_size,
            expiry_threshold: Duration::minutes(config.expiry_threshold_minutes),
            state: Mutex::new(CoordinatorState::default()),
        }
    }

    pub fn with_config(mut self, config: &Config) -> Self {
        self.default_party_size = config.default_party_size;
        self.expiry_threshold = Duration::minutes(config.expiry_threshold_minutes);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Record arrivals/cancellations as guest visits
    pub fn with_guest_store(mut self, guests: Arc<GuestStore>) -> Self {
        self.guests = Some(guests);
        self
    }

    pub fn owner(&self) -> &OwnerContext {
        &self.owner
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    // ========================================================================
    // Projection
    // ========================================================================

    /// Replace the floor set and rebuild the projection
    pub fn set_floors(&self, floors: &[Floor]) {
        let mut state = self.state.lock();
        state.floors = floors.iter().map(FloorView::from).collect();
        tracing::debug!(floors = floors.len(), "Floor set replaced");
        drop(state);
        self.reindex();
    }

    /// Replace the whole reservation snapshot
    pub fn load_snapshot(&self, reservations: Vec<Reservation>) {
        {
            let mut state = self.state.lock();
            state.reservations = reservations.into_iter().map(|r| (r.id.clone(), r)).collect();
        }
        self.reindex();
    }

    /// Fold one realtime change into the snapshot and rebuild the projection
    pub fn apply_store_event(&self, event: StoreEvent) {
        match event {
            StoreEvent::Added(r) | StoreEvent::Modified(r) => {
                self.state.lock().reservations.insert(r.id.clone(), r);
            }
            StoreEvent::Removed(id) => {
                self.state.lock().reservations.remove(&id);
            }
            StoreEvent::Ready => {
                tracing::debug!(owner = %self.owner, "Reservation snapshot ready");
                return;
            }
            StoreEvent::Error(message) => {
                tracing::error!(owner = %self.owner, error = %message, "Reservation subscription error");
                self.notifier.error(&message);
                return;
            }
        }
        self.reindex();
    }

    /// Rebuild every table slot from the current snapshot.
    ///
    /// Also re-evaluates table fills, and force-closes the pending create
    /// dialog if its table got reserved meanwhile.
    pub fn reindex(&self) {
        let now = self.clock.now();
        let preempted = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let placed = projection::reindex(&mut state.floors, state.reservations.values());
            expiry::mark_overdue_tables(
                &mut state.floors,
                self.event.date,
                now,
                self.expiry_threshold,
            );
            tracing::trace!(placed, total = state.reservations.len(), "Reindexed");

            let taken = state.pending_create.as_ref().is_some_and(|pending| {
                Self::table_in(&state.floors, &pending.table)
                    .is_some_and(|t| t.reservation.is_some())
            });
            if taken { state.pending_create.take() } else { None }
        };

        if let Some(pending) = preempted {
            tracing::info!(
                table = %pending.table,
                dialog = %pending.dialog,
                "Table reserved by another operator while create dialog was open"
            );
            self.dialogs.dismiss(pending.dialog);
            self.notifier
                .error(&AppError::table_already_reserved(&pending.table.table_label).message);
        }
    }

    /// Re-read the collection from the store
    pub async fn refresh(&self) -> AppResult<()> {
        let reservations = self.store.list_reservations(&self.owner).await?;
        self.load_snapshot(reservations);
        Ok(())
    }

    /// Follow the realtime collection until cancelled
    pub async fn run_subscription(&self, shutdown: CancellationToken) {
        let mut subscription = match self.store.subscribe_reservations(&self.owner).await {
            Ok(sub) => sub,
            Err(e) => {
                tracing::error!(owner = %self.owner, error = %e, "Failed to subscribe to reservations");
                self.notifier.error(&e.message);
                return;
            }
        };
        self.load_snapshot(std::mem::take(&mut subscription.initial));
        tracing::info!(owner = %self.owner, "Reservation subscription started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                received = subscription.events.recv() => match received {
                    Ok(event) => self.apply_store_event(event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Reservation subscription lagged, reloading");
                        if let Err(e) = self.refresh().await {
                            tracing::error!(error = %e, "Reload after lag failed");
                        }
                    }
                    Err(RecvError::Closed) => {
                        tracing::warn!(owner = %self.owner, "Reservation subscription closed");
                        break;
                    }
                },
            }
        }

        tracing::info!(owner = %self.owner, "Reservation subscription stopped");
    }

    // ========================================================================
    // Read side
    // ========================================================================

    pub fn floors(&self) -> Vec<FloorView> {
        self.state.lock().floors.clone()
    }

    pub fn table(&self, floor_id: &str, table_label: &str) -> Option<TableView> {
        let state = self.state.lock();
        Self::table_in(&state.floors, &TableRef::new(floor_id, table_label)).cloned()
    }

    pub fn reservation_at(&self, floor_id: &str, table_label: &str) -> Option<Reservation> {
        self.table(floor_id, table_label).and_then(|t| t.reservation)
    }

    pub fn pending_transfer(&self) -> Option<TableRef> {
        self.state.lock().pending_transfer.clone()
    }

    /// Table of the open create dialog, if any
    pub fn pending_create(&self) -> Option<TableRef> {
        self.state.lock().pending_create.as_ref().map(|p| p.table.clone())
    }

    fn table_in<'a>(floors: &'a [FloorView], table: &TableRef) -> Option<&'a TableView> {
        floors
            .iter()
            .find(|f| f.id == table.floor_id)
            .and_then(|f| f.table(&table.table_label))
    }

    // ========================================================================
    // Click dispatch
    // ========================================================================

    /// Entry point for a click on a table.
    ///
    /// With a pending transfer: the source itself cancels it, any other
    /// table becomes the target (the selection is cleared either way).
    /// Without one: a reserved table opens its card, a free table opens the
    /// create dialog when the user may reserve.
    pub async fn table_click_handler(&self, floor_id: &str, table_label: &str) -> ClickOutcome {
        let target = TableRef::new(floor_id, table_label);

        let pending = self.state.lock().pending_transfer.take();
        if let Some(source) = pending {
            if source == target {
                tracing::debug!(table = %target, "Transfer selection cancelled");
                return ClickOutcome::TransferCancelled;
            }
            return self.transfer(&source, &target).await;
        }

        let Some(table) = self.table(floor_id, table_label) else {
            tracing::warn!(table = %target, "Click on unknown table");
            return ClickOutcome::Ignored;
        };

        match table.reservation {
            Some(_) => self.open_reservation(floor_id, table_label).await,
            None if permissions::can_reserve(&self.user) => {
                self.handle_reservation_creation(floor_id, table_label).await
            }
            None => ClickOutcome::Ignored,
        }
    }

    // ========================================================================
    // Create / show / edit
    // ========================================================================

    /// Open the create dialog for a free table and add the submitted draft
    pub async fn handle_reservation_creation(
        &self,
        floor_id: &str,
        table_label: &str,
    ) -> ClickOutcome {
        if !permissions::can_reserve(&self.user) {
            return ClickOutcome::Ignored;
        }
        let table = TableRef::new(floor_id, table_label);
        match self.table(floor_id, table_label) {
            Some(t) if t.reservation.is_none() => {}
            Some(_) => {
                self.notifier
                    .error(&AppError::table_already_reserved(table_label).message);
                return ClickOutcome::Ignored;
            }
            None => return ClickOutcome::Ignored,
        }

        let draft = shared::models::ReservationDraft::new(
            floor_id,
            table_label,
            self.default_party_size,
            initial_reservation_time(&self.event, self.clock.now()),
        );
        let dialog = self.dialogs.present(DialogRequest {
            kind: DialogKind::Create,
            floor_id: floor_id.to_string(),
            table_label: table_label.to_string(),
            draft,
            reservation: None,
        });
        let dialog_id = dialog.id;
        self.state.lock().pending_create = Some(PendingCreate {
            table: table.clone(),
            dialog: dialog_id,
        });

        let outcome = dialog.outcome().await;

        let still_ours = {
            let mut state = self.state.lock();
            let ours = state
                .pending_create
                .as_ref()
                .is_some_and(|p| p.dialog == dialog_id);
            if ours {
                state.pending_create = None;
            }
            ours
        };

        // Force-closed by a reindex: the table went to another operator
        // first, even if the form was submitted in the same instant.
        if !still_ours {
            tracing::debug!(table = %table, dialog = %dialog_id, "Create dialog preempted");
            return ClickOutcome::Preempted;
        }

        match outcome {
            DialogOutcome::Create(submitted) => {
                if self.reservation_at(floor_id, table_label).is_some() {
                    self.notifier
                        .error(&AppError::table_already_reserved(table_label).message);
                    return ClickOutcome::Preempted;
                }
                let created = run_guarded(self.notifier.as_ref(), "add_reservation", async {
                    submitted.validate()?;
                    self.store
                        .add_reservation(&self.owner, submitted, self.user.as_user_ref())
                        .await
                })
                .await;
                match created {
                    Some(reservation) => {
                        tracing::info!(
                            reservation_id = %reservation.id,
                            table = %table,
                            "Reservation created"
                        );
                        self.notifier
                            .success(&format!("Reservation created for table {}", table_label));
                        ClickOutcome::Created
                    }
                    None => ClickOutcome::Failed,
                }
            }
            _ => ClickOutcome::Ignored,
        }
    }

    /// Show the card of a reserved table and run the chosen action
    pub async fn open_reservation(&self, floor_id: &str, table_label: &str) -> ClickOutcome {
        let Some(reservation) = self.reservation_at(floor_id, table_label) else {
            return ClickOutcome::Ignored;
        };

        let dialog = self.dialogs.present(DialogRequest {
            kind: DialogKind::Show,
            floor_id: floor_id.to_string(),
            table_label: table_label.to_string(),
            draft: reservation.to_draft(),
            reservation: Some(reservation.clone()),
        });

        match dialog.outcome().await {
            DialogOutcome::Edit => self.edit_reservation(floor_id, table_label).await,
            DialogOutcome::Update(draft) => self.submit_edit(&reservation, draft).await,
            DialogOutcome::Delete => self.on_delete_reservation(&reservation).await,
            DialogOutcome::Transfer => {
                if self.begin_transfer(floor_id, table_label) {
                    ClickOutcome::TransferSelected
                } else {
                    ClickOutcome::Ignored
                }
            }
            DialogOutcome::Toggle(toggle, value) => {
                self.toggle_state(&reservation, toggle, value).await
            }
            DialogOutcome::Create(_) | DialogOutcome::Dismissed => ClickOutcome::Ignored,
        }
    }

    /// Open the edit form of a reserved table and write the submitted fields
    pub async fn edit_reservation(&self, floor_id: &str, table_label: &str) -> ClickOutcome {
        let Some(reservation) = self.reservation_at(floor_id, table_label) else {
            return ClickOutcome::Ignored;
        };
        if !permissions::can_edit(&self.user, &reservation) {
            return ClickOutcome::Ignored;
        }

        let dialog = self.dialogs.present(DialogRequest {
            kind: DialogKind::Edit,
            floor_id: floor_id.to_string(),
            table_label: table_label.to_string(),
            draft: reservation.to_draft(),
            reservation: Some(reservation.clone()),
        });

        match dialog.outcome().await {
            DialogOutcome::Update(draft) => self.submit_edit(&reservation, draft).await,
            _ => ClickOutcome::Ignored,
        }
    }

    async fn submit_edit(
        &self,
        reservation: &Reservation,
        draft: shared::models::ReservationDraft,
    ) -> ClickOutcome {
        if !permissions::can_edit(&self.user, reservation) {
            return ClickOutcome::Ignored;
        }
        let written = run_guarded(self.notifier.as_ref(), "update_reservation", async {
            draft.validate()?;
            self.store
                .update_reservation(&self.owner, &reservation.id, ReservationUpdate::from_draft(&draft))
                .await
        })
        .await;

        match written {
            Some(()) => {
                tracing::info!(reservation_id = %reservation.id, "Reservation updated");
                self.notifier.success("Reservation updated");
                ClickOutcome::Updated
            }
            None => ClickOutcome::Failed,
        }
    }

    // ========================================================================
    // Delete / state toggles
    // ========================================================================

    /// Delete after an explicit yes; a "no" issues no store call
    pub async fn on_delete_reservation(&self, reservation: &Reservation) -> ClickOutcome {
        if !permissions::can_delete(&self.user, reservation) {
            return ClickOutcome::Ignored;
        }

        let prompt = ConfirmPrompt::new(
            "Delete reservation",
            format!(
                "Delete the reservation on table {}?",
                reservation.table_label
            ),
        );
        if !self.dialogs.confirm(prompt).await {
            tracing::debug!(reservation_id = %reservation.id, "Delete declined");
            return ClickOutcome::Declined;
        }

        let deleted = run_guarded(
            self.notifier.as_ref(),
            "delete_reservation",
            self.store.delete_reservation(&self.owner, &reservation.id),
        )
        .await;

        match deleted {
            Some(()) => {
                tracing::info!(reservation_id = %reservation.id, "Reservation deleted");
                self.notifier.success("Reservation deleted");
                ClickOutcome::Deleted
            }
            None => ClickOutcome::Failed,
        }
    }

    /// Set one flag (arrived / confirmed / cancelled / waiting for response)
    pub async fn toggle_state(
        &self,
        reservation: &Reservation,
        toggle: StateToggle,
        value: bool,
    ) -> ClickOutcome {
        if !permissions::can_edit(&self.user, reservation) {
            return ClickOutcome::Ignored;
        }

        let now = self.clock.now_millis();
        let update = toggle.to_update(reservation, value, now);
        let written = run_guarded(
            self.notifier.as_ref(),
            "toggle_reservation_state",
            self.store
                .update_reservation(&self.owner, &reservation.id, update.clone()),
        )
        .await;
        if written.is_none() {
            return ClickOutcome::Failed;
        }
        tracing::info!(reservation_id = %reservation.id, %toggle, value, "Reservation state changed");

        if matches!(toggle, StateToggle::Arrived | StateToggle::Cancelled)
            && let Some(guests) = &self.guests
        {
            let mut updated = reservation.clone();
            updated.apply(&update, now);
            if let Err(e) = guests
                .record_visit(&self.owner.property_id, &self.event, &updated)
                .await
            {
                tracing::warn!(reservation_id = %reservation.id, error = %e, "Failed to record guest visit");
            }
        }
        ClickOutcome::StateChanged
    }

    // ========================================================================
    // Transfer / swap
    // ========================================================================

    /// Select a reserved table as the source of the next transfer
    pub fn begin_transfer(&self, floor_id: &str, table_label: &str) -> bool {
        let Some(reservation) = self.reservation_at(floor_id, table_label) else {
            return false;
        };
        if !permissions::can_edit(&self.user, &reservation) {
            return false;
        }
        let source = TableRef::new(floor_id, table_label);
        tracing::debug!(table = %source, reservation_id = %reservation.id, "Transfer source selected");
        self.state.lock().pending_transfer = Some(source);
        true
    }

    /// Move (or swap) the reservation on `source` onto `target` after
    /// confirmation. Same-floor and cross-floor moves share this path.
    pub async fn transfer(&self, source: &TableRef, target: &TableRef) -> ClickOutcome {
        if source == target {
            return ClickOutcome::TransferCancelled;
        }

        let plan = {
            let state = self.state.lock();
            plan_transfer(&state.floors, source, target)
        };
        let plan = match plan {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(source = %source, target = %target, error = %e, "Transfer not possible");
                self.notifier.error(&e.message);
                return ClickOutcome::Failed;
            }
        };

        let allowed = permissions::can_edit(&self.user, &plan.moved.reservation)
            && plan
                .counterpart
                .as_ref()
                .is_none_or(|c| permissions::can_edit(&self.user, &c.reservation));
        if !allowed {
            return ClickOutcome::Ignored;
        }

        if !self.dialogs.confirm(plan.prompt.clone()).await {
            tracing::debug!(source = %source, target = %target, "Transfer declined");
            return ClickOutcome::Declined;
        }

        let done = run_guarded(
            self.notifier.as_ref(),
            "transfer_reservation",
            self.apply_transfer(&plan),
        )
        .await;

        match done {
            Some(()) => {
                tracing::info!(
                    source = %source,
                    target = %target,
                    swap = plan.is_swap(),
                    cross_floor = plan.is_cross_floor(),
                    "Reservation transferred"
                );
                self.notifier.success("Reservation transferred");
                ClickOutcome::Transferred
            }
            None => ClickOutcome::Failed,
        }
    }

    /// Issue the writes of a plan; both sides of a swap run concurrently.
    ///
    /// A half-applied swap is not compensated; it is reported as
    /// [`ErrorCode::SwapPartiallyApplied`] naming the side that was written.
    async fn apply_transfer(&self, plan: &TransferPlan) -> AppResult<()> {
        let Some(counterpart) = &plan.counterpart else {
            return self.write_move(&plan.moved).await;
        };

        let (moved, swapped) =
            futures::join!(self.write_move(&plan.moved), self.write_move(counterpart));

        match (moved, swapped) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), Err(_)) => Err(e),
            (Ok(()), Err(e)) => Err(partial_swap(&plan.moved, counterpart, e)),
            (Err(e), Ok(())) => Err(partial_swap(counterpart, &plan.moved, e)),
        }
    }

    async fn write_move(&self, planned: &PlannedMove) -> AppResult<()> {
        self.store
            .update_reservation(&self.owner, &planned.reservation.id, planned.update.clone())
            .await
    }

    // ========================================================================
    // Expiry
    // ========================================================================

    /// Flag tables of unconfirmed reservations that are overdue at `now`.
    ///
    /// Only table fills change; returns the number of flagged tables.
    pub fn check_reservations_for_time_and_mark_table_if_needed(&self, now: NaiveDateTime) -> usize {
        let mut state = self.state.lock();
        expiry::mark_overdue_tables(&mut state.floors, self.event.date, now, self.expiry_threshold)
    }

    /// Sweep with the coordinator's clock
    pub fn sweep_now(&self) -> usize {
        self.check_reservations_for_time_and_mark_table_if_needed(self.clock.now())
    }
}

fn partial_swap(applied: &PlannedMove, failed: &PlannedMove, cause: AppError) -> AppError {
    tracing::warn!(
        applied = %applied.reservation.id,
        failed = %failed.reservation.id,
        error = %cause,
        "Swap partially applied, no compensation issued"
    );
    AppError::with_message(
        ErrorCode::SwapPartiallyApplied,
        format!("Swap was only partially applied: {}", cause.message),
    )
    .with_detail("applied", applied.reservation.id.clone())
    .with_detail("failed", failed.reservation.id.clone())
}

/// Pre-filled time of a new reservation: the event start while the event
/// has not started yet, otherwise the current time.
pub fn initial_reservation_time(event: &Event, now: NaiveDateTime) -> String {
    match event.starts_at() {
        Some(start) if now < start => format_hhmm(start.time()),
        _ => format_hhmm(now.time()),
    }
}
