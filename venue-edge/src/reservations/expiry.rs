//! 超时未确认预订检查
//!
//! An unconfirmed reservation whose expected arrival lies more than the
//! threshold in the past paints its table with [`TableFill::Warning`]. The
//! reservation document itself is never touched.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use shared::models::{FloorView, Reservation, TableFill, parse_reservation_time};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::ReservationCoordinator;

/// After-midnight rule: a time starting with "0" belongs to the next
/// calendar day of the event (a 01:30 booking on a Friday night is Saturday).
pub fn rolls_over_to_next_day(time: &str) -> bool {
    time.trim_start().starts_with('0')
}

/// Expected arrival as a date-time, applying the after-midnight rule
pub fn scheduled_arrival(event_date: NaiveDate, time: &str) -> Option<NaiveDateTime> {
    let at = parse_reservation_time(time)?;
    let date = if rolls_over_to_next_day(time) {
        event_date.succ_opt()?
    } else {
        event_date
    };
    Some(date.and_time(at))
}

/// Unconfirmed and more than `threshold` past its arrival time
pub fn is_overdue(
    reservation: &Reservation,
    event_date: NaiveDate,
    now: NaiveDateTime,
    threshold: Duration,
) -> bool {
    if reservation.confirmed {
        return false;
    }
    match scheduled_arrival(event_date, &reservation.time) {
        Some(arrival) => now - arrival > threshold,
        None => {
            tracing::debug!(
                reservation_id = %reservation.id,
                time = %reservation.time,
                "Unparseable reservation time, skipping expiry check"
            );
            false
        }
    }
}

/// Recompute every table fill; returns the number of flagged tables
pub fn mark_overdue_tables(
    floors: &mut [FloorView],
    event_date: NaiveDate,
    now: NaiveDateTime,
    threshold: Duration,
) -> usize {
    let mut flagged = 0;
    for table in floors.iter_mut().flat_map(|f| f.tables.iter_mut()) {
        let overdue = table
            .reservation
            .as_ref()
            .is_some_and(|r| is_overdue(r, event_date, now, threshold));
        table.fill = if overdue {
            flagged += 1;
            TableFill::Warning
        } else {
            TableFill::Default
        };
    }
    flagged
}

/// 超时检查定时任务
///
/// 注册为 `TaskKind::Periodic`，按固定周期调用协调器的检查。
pub struct ExpirySweeper {
    coordinator: Arc<ReservationCoordinator>,
    interval: std::time::Duration,
    shutdown: CancellationToken,
}

impl ExpirySweeper {
    pub fn new(
        coordinator: Arc<ReservationCoordinator>,
        interval: std::time::Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            coordinator,
            interval,
            shutdown,
        }
    }

    /// 主循环
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Expiry sweeper started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let flagged = self.coordinator.sweep_now();
                    if flagged > 0 {
                        tracing::info!(flagged, "Overdue unconfirmed reservations");
                    }
                }
            }
        }

        tracing::info!("Expiry sweeper stopped");
    }
}
