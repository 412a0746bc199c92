//! Reservation → floor view projection

use shared::models::{FloorView, Reservation};

/// Rebuild every table slot from the reservation list.
///
/// All slots are cleared first, then each reservation is attached to the
/// table(s) its label names on its floor. Reservations whose floor or table
/// is unknown are skipped. Returns how many were placed.
pub fn reindex<'a>(
    floors: &mut [FloorView],
    reservations: impl IntoIterator<Item = &'a Reservation>,
) -> usize {
    for floor in floors.iter_mut() {
        floor.clear();
    }

    let mut placed = 0;
    for reservation in reservations {
        let Some(floor) = floors.iter_mut().find(|f| f.id == reservation.floor_id) else {
            tracing::debug!(
                reservation_id = %reservation.id,
                floor_id = %reservation.floor_id,
                "Reservation on unknown floor"
            );
            continue;
        };

        let mut attached = false;
        for label in reservation.table_label.labels() {
            match floor.table_mut(label) {
                Some(table) => {
                    table.reservation = Some(reservation.clone());
                    attached = true;
                }
                None => {
                    tracing::debug!(
                        reservation_id = %reservation.id,
                        floor_id = %reservation.floor_id,
                        table = %label,
                        "Reservation on unknown table"
                    );
                }
            }
        }
        if attached {
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Floor, FloorTable, ReservationDraft, TableLabel, UserRef};

    fn floors() -> Vec<FloorView> {
        let main = Floor {
            id: "f1".into(),
            name: "Main".into(),
            tables: vec![FloorTable::new("T1"), FloorTable::new("T2"), FloorTable::new("T3")],
        };
        let terrace = Floor {
            id: "f2".into(),
            name: "Terrace".into(),
            tables: vec![FloorTable::new("T1")],
        };
        vec![FloorView::from(&main), FloorView::from(&terrace)]
    }

    fn reservation(id: &str, floor: &str, label: &str) -> Reservation {
        Reservation::from_draft(
            id,
            ReservationDraft::new(floor, label, 2, "21:00"),
            UserRef::new("u1", "Ana"),
            0,
        )
    }

    fn holders(floors: &[FloorView], id: &str) -> Vec<(String, String)> {
        floors
            .iter()
            .flat_map(|f| {
                f.tables
                    .iter()
                    .filter(|t| t.reservation.as_ref().is_some_and(|r| r.id == id))
                    .map(|t| (f.id.clone(), t.label.clone()))
            })
            .collect()
    }

    #[test]
    fn test_each_reservation_lands_on_exactly_its_table() {
        let mut floors = floors();
        let list = vec![
            reservation("a", "f1", "T1"),
            reservation("b", "f2", "T1"),
            reservation("c", "f1", "T3"),
        ];
        assert_eq!(reindex(&mut floors, &list), 3);

        assert_eq!(holders(&floors, "a"), vec![("f1".into(), "T1".into())]);
        assert_eq!(holders(&floors, "b"), vec![("f2".into(), "T1".into())]);
        assert_eq!(holders(&floors, "c"), vec![("f1".into(), "T3".into())]);
        assert!(floors[0].table("T2").unwrap().reservation.is_none());
    }

    #[test]
    fn test_reindex_drops_stale_slots() {
        let mut floors = floors();
        reindex(&mut floors, &[reservation("a", "f1", "T1")]);
        reindex(&mut floors, &[reservation("a", "f1", "T2")]);
        assert_eq!(holders(&floors, "a"), vec![("f1".into(), "T2".into())]);
    }

    #[test]
    fn test_unknown_floor_or_table_is_skipped() {
        let mut floors = floors();
        let list = vec![reservation("a", "f9", "T1"), reservation("b", "f1", "T9")];
        assert_eq!(reindex(&mut floors, &list), 0);
        assert!(holders(&floors, "a").is_empty());
    }

    #[test]
    fn test_linked_tables_all_hold_the_reservation() {
        let mut floors = floors();
        let mut linked = reservation("a", "f1", "T1");
        linked.table_label = TableLabel::Linked(vec!["T1".into(), "T2".into()]);
        reindex(&mut floors, &[linked]);
        assert_eq!(holders(&floors, "a").len(), 2);
    }
}
