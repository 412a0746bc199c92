//! 换桌 / 对调
//!
//! A transfer moves the source reservation onto the target table. If the
//! target already holds a reservation, that one moves to the source table
//! (a swap, never an overwrite). Across floors the floor id is rewritten too.

use shared::error::ErrorCode;
use shared::models::{FloorView, Reservation, ReservationUpdate};

use super::TableRef;
use crate::ui::ConfirmPrompt;
use crate::utils::{AppError, AppResult};

/// One document write of a transfer
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMove {
    pub reservation: Reservation,
    pub update: ReservationUpdate,
}

/// Writes and confirmation text of a transfer, computed before asking
#[derive(Debug, Clone)]
pub struct TransferPlan {
    pub source: TableRef,
    pub target: TableRef,
    pub moved: PlannedMove,
    /// Reservation that was sitting on the target table
    pub counterpart: Option<PlannedMove>,
    pub prompt: ConfirmPrompt,
}

impl TransferPlan {
    pub fn is_swap(&self) -> bool {
        self.counterpart.is_some()
    }

    pub fn is_cross_floor(&self) -> bool {
        self.source.floor_id != self.target.floor_id
    }
}

fn find_floor<'a>(floors: &'a [FloorView], floor_id: &str) -> AppResult<&'a FloorView> {
    floors.iter().find(|f| f.id == floor_id).ok_or_else(|| {
        AppError::with_message(ErrorCode::FloorNotFound, format!("Floor {} not found", floor_id))
            .with_detail("floor_id", floor_id)
    })
}

/// Build the plan for moving `source` onto `target`
pub fn plan_transfer(
    floors: &[FloorView],
    source: &TableRef,
    target: &TableRef,
) -> AppResult<TransferPlan> {
    let source_floor = find_floor(floors, &source.floor_id)?;
    let target_floor = find_floor(floors, &target.floor_id)?;

    let source_table = source_floor
        .table(&source.table_label)
        .ok_or_else(|| AppError::table_not_found(&source.floor_id, &source.table_label))?;
    let target_table = target_floor
        .table(&target.table_label)
        .ok_or_else(|| AppError::table_not_found(&target.floor_id, &target.table_label))?;

    let moving = source_table.reservation.clone().ok_or_else(|| {
        AppError::new(ErrorCode::TransferSourceMissing).with_detail("table", source.to_string())
    })?;

    let cross_floor = source.floor_id != target.floor_id;
    let floor_rewrite = |floor_id: &str| cross_floor.then(|| floor_id.to_string());

    let moved = PlannedMove {
        update: ReservationUpdate::relocate(
            target.table_label.clone(),
            floor_rewrite(&target.floor_id),
        ),
        reservation: moving,
    };

    let counterpart = target_table
        .reservation
        .clone()
        .filter(|r| r.id != moved.reservation.id)
        .map(|reservation| PlannedMove {
            update: ReservationUpdate::relocate(
                source.table_label.clone(),
                floor_rewrite(&source.floor_id),
            ),
            reservation,
        });

    let prompt = transfer_prompt(
        &source.table_label,
        &source_floor.name,
        &target.table_label,
        &target_floor.name,
        cross_floor,
        counterpart.is_some(),
    );

    Ok(TransferPlan {
        source: source.clone(),
        target: target.clone(),
        moved,
        counterpart,
        prompt,
    })
}

/// Confirmation text naming both tables (and both floors across floors)
pub fn transfer_prompt(
    source_label: &str,
    source_floor: &str,
    target_label: &str,
    target_floor: &str,
    cross_floor: bool,
    swap: bool,
) -> ConfirmPrompt {
    let from = if cross_floor {
        format!("table {} ({})", source_label, source_floor)
    } else {
        format!("table {}", source_label)
    };
    let to = if cross_floor {
        format!("table {} ({})", target_label, target_floor)
    } else {
        format!("table {}", target_label)
    };

    if swap {
        ConfirmPrompt::new(
            "Swap reservations",
            format!("Swap the reservations of {} and {}?", from, to),
        )
    } else {
        ConfirmPrompt::new(
            "Transfer reservation",
            format!("Move the reservation from {} to {}?", from, to),
        )
    }
}
