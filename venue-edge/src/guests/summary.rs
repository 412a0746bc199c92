//! Visit statistics

use shared::models::{GuestSummary, Visit};

/// Aggregate already-filtered visits
pub fn summarize<'a>(visits: impl IntoIterator<Item = &'a Visit>) -> GuestSummary {
    let (total, fulfilled) = visits.into_iter().fold((0usize, 0usize), |(t, f), v| {
        (t + 1, f + usize::from(v.is_fulfilled()))
    });
    GuestSummary {
        total_reservations: total,
        fulfilled_visits: fulfilled,
        visit_percentage: visit_percentage(fulfilled, total),
    }
}

/// `fulfilled / total` as a percentage with two decimals, "0.00" for no visits
pub fn visit_percentage(fulfilled: usize, total: usize) -> String {
    if total == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", fulfilled as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(arrived: bool, cancelled: bool) -> Visit {
        Visit {
            arrived,
            cancelled,
            is_vip: false,
            date: 0,
            event_name: "Friday".into(),
        }
    }

    #[test]
    fn test_summarize_counts_fulfilled() {
        let visits = [visit(true, false), visit(false, false), visit(true, true)];
        let summary = summarize(&visits);
        assert_eq!(summary.total_reservations, 3);
        assert_eq!(summary.fulfilled_visits, 1);
        assert_eq!(summary.visit_percentage, "33.33");
    }

    #[test]
    fn test_visit_percentage() {
        assert_eq!(visit_percentage(0, 0), "0.00");
        assert_eq!(visit_percentage(2, 2), "100.00");
        assert_eq!(visit_percentage(2, 3), "66.67");
        assert_eq!(summarize(std::iter::empty::<&Visit>()), GuestSummary::empty());
    }
}
