//! 客人缓存
//!
//! Guest documents of one organisation, cached by hashed contact. The cache
//! is warmed from a full listing when one was loaded and otherwise filled by
//! point queries.

use dashmap::DashMap;
use shared::models::{
    Event, Guest, GuestSummary, PropertyGuestSummary, Reservation, Visit,
};
use shared::util::hash_contact;
use std::sync::Arc;

use super::summary::summarize;
use crate::auth::{CurrentUser, permissions};
use crate::store::{GuestSource, VisitRecord};
use crate::utils::{AppError, AppResult};

pub struct GuestStore {
    organisation_id: String,
    source: Arc<dyn GuestSource>,
    cache: DashMap<String, Guest>,
}

impl GuestStore {
    pub fn new(organisation_id: impl Into<String>, source: Arc<dyn GuestSource>) -> Self {
        Self {
            organisation_id: organisation_id.into(),
            source,
            cache: DashMap::new(),
        }
    }

    pub fn organisation_id(&self) -> &str {
        &self.organisation_id
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Load every guest of the organisation into the cache
    pub async fn load_all(&self) -> AppResult<usize> {
        let guests = self.source.list_guests(&self.organisation_id).await?;
        let count = guests.len();
        for guest in guests {
            self.cache.insert(guest.hashed_contact.clone(), guest);
        }
        tracing::debug!(organisation = %self.organisation_id, count, "Guest cache warmed");
        Ok(count)
    }

    /// Cached guest, or a point query whose hit is cached
    pub async fn get_guest(&self, hashed_contact: &str) -> AppResult<Option<Guest>> {
        if let Some(guest) = self.cache.get(hashed_contact) {
            return Ok(Some(guest.clone()));
        }
        let fetched = self
            .source
            .fetch_guest(&self.organisation_id, hashed_contact)
            .await?;
        if let Some(guest) = &fetched {
            self.cache.insert(hashed_contact.to_string(), guest.clone());
        }
        Ok(fetched)
    }

    /// History of a guest at one property, leaving out `event_id` and any
    /// visit dated after `now_millis`.
    ///
    /// `PermissionDenied` without `guests:view`. `None` when the caller may
    /// not see the property, the guest is unknown, or the guest never visited
    /// the property. History that is excluded down to nothing yields a zero
    /// summary instead.
    pub async fn get_guest_summary_for_property_excluding_event(
        &self,
        user: &CurrentUser,
        hashed_contact: &str,
        property_id: &str,
        event_id: &str,
        now_millis: i64,
    ) -> AppResult<Option<GuestSummary>> {
        self.require_guest_view(user)?;
        if !user.can_access_property(property_id) {
            tracing::debug!(user = %user.username, property_id, "Guest summary denied");
            return Ok(None);
        }
        let Some(guest) = self.get_guest(hashed_contact).await? else {
            return Ok(None);
        };
        let Some(visits) = guest.visits_at(property_id) else {
            return Ok(None);
        };

        let remaining = visits
            .iter()
            .filter(|(visit_id, visit)| visit_id.as_str() != event_id && visit.date <= now_millis)
            .map(|(_, visit)| visit);
        Ok(Some(summarize(remaining)))
    }

    /// One summary per accessible property the guest visited
    pub async fn guest_reservations_summary(
        &self,
        user: &CurrentUser,
        hashed_contact: &str,
        now_millis: i64,
    ) -> AppResult<Vec<PropertyGuestSummary>> {
        self.require_guest_view(user)?;
        let Some(guest) = self.get_guest(hashed_contact).await? else {
            return Ok(Vec::new());
        };

        Ok(guest
            .visited_properties
            .iter()
            .filter(|(property_id, visits)| {
                !visits.is_empty() && user.can_access_property(property_id)
            })
            .map(|(property_id, visits)| PropertyGuestSummary {
                property_id: property_id.clone(),
                summary: summarize(visits.values().filter(|v| v.date <= now_millis)),
            })
            .collect())
    }

    /// Guest history is only readable with `guests:view`
    fn require_guest_view(&self, user: &CurrentUser) -> AppResult<()> {
        if user.has_permission(permissions::GUESTS_VIEW) {
            return Ok(());
        }
        tracing::warn!(user = %user.username, "Guest history requested without permission");
        Err(AppError::permission_denied(format!(
            "Missing permission {}",
            permissions::GUESTS_VIEW
        ))
        .with_detail("permission", permissions::GUESTS_VIEW))
    }

    /// Upsert the visit of `reservation` at this event into the guest document.
    ///
    /// Reservations without a contact are skipped (`Ok(None)`).
    pub async fn record_visit(
        &self,
        property_id: &str,
        event: &Event,
        reservation: &Reservation,
    ) -> AppResult<Option<Guest>> {
        let Some(contact) = reservation
            .guest_contact
            .as_deref()
            .filter(|c| !c.trim().is_empty())
        else {
            return Ok(None);
        };

        let record = VisitRecord {
            hashed_contact: hash_contact(contact),
            name: reservation.guest_name.clone().unwrap_or_default(),
            contact: Some(contact.to_string()),
            property_id: property_id.to_string(),
            visit_id: event.id.clone(),
            visit: Visit {
                arrived: reservation.arrived,
                cancelled: reservation.cancelled,
                is_vip: reservation.is_vip,
                date: event.date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis(),
                event_name: event.name.clone(),
            },
        };

        let guest = self.source.upsert_visit(&self.organisation_id, record).await?;
        tracing::debug!(
            reservation_id = %reservation.id,
            event_id = %event.id,
            property_id,
            "Guest visit recorded"
        );
        self.cache.insert(guest.hashed_contact.clone(), guest.clone());
        Ok(Some(guest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::utils::ErrorCode;
    use chrono::NaiveDate;
    use shared::models::{ReservationDraft, UserRef};
    use std::collections::BTreeMap;

    fn visit(arrived: bool, cancelled: bool, date: i64) -> Visit {
        Visit {
            arrived,
            cancelled,
            is_vip: false,
            date,
            event_name: "Friday".into(),
        }
    }

    fn seeded(visits: BTreeMap<String, Visit>) -> (Arc<InMemoryStore>, GuestStore) {
        let source = Arc::new(InMemoryStore::new());
        let mut guest = Guest::new("h1", "Ana");
        guest.visited_properties.insert("p1".into(), visits);
        guest.visited_properties.insert("p2".into(), BTreeMap::from([("e9".to_string(), visit(true, false, 10))]));
        source.seed_guest("org", guest);
        let store = GuestStore::new("org", source.clone());
        (source, store)
    }

    fn three_visits() -> BTreeMap<String, Visit> {
        BTreeMap::from([
            ("v1".to_string(), visit(true, false, 100)),
            ("v2".to_string(), visit(false, false, 200)),
            ("v3".to_string(), visit(true, true, 300)),
        ])
    }

    fn manager(properties: &[&str]) -> CurrentUser {
        CurrentUser {
            id: "u1".into(),
            username: "ana".into(),
            role: "manager".into(),
            permissions: permissions::get_default_permissions("manager"),
            related_property_ids: properties.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_summary_for_property() {
        let (_, store) = seeded(three_visits());
        let summary = store
            .get_guest_summary_for_property_excluding_event(&manager(&["p1"]), "h1", "p1", "current", 1_000)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.total_reservations, 3);
        assert_eq!(summary.fulfilled_visits, 1);
        assert_eq!(summary.visit_percentage, "33.33");
    }

    #[tokio::test]
    async fn test_excluded_to_zero_is_not_none() {
        let visits = BTreeMap::from([("e1".to_string(), visit(true, false, 100))]);
        let (_, store) = seeded(visits);
        let summary = store
            .get_guest_summary_for_property_excluding_event(&manager(&["p1"]), "h1", "p1", "e1", 1_000)
            .await
            .unwrap();
        assert_eq!(summary, Some(GuestSummary::empty()));
    }

    #[tokio::test]
    async fn test_future_visits_are_excluded() {
        let (_, store) = seeded(three_visits());
        let summary = store
            .get_guest_summary_for_property_excluding_event(&manager(&["p1"]), "h1", "p1", "x", 150)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.total_reservations, 1);
        assert_eq!(summary.visit_percentage, "100.00");
    }

    #[tokio::test]
    async fn test_inaccessible_property_is_none() {
        let (_, store) = seeded(three_visits());
        let summary = store
            .get_guest_summary_for_property_excluding_event(&manager(&["p2"]), "h1", "p1", "x", 1_000)
            .await
            .unwrap();
        assert!(summary.is_none());

        let missing = store
            .get_guest_summary_for_property_excluding_event(&manager(&["p1"]), "nobody", "p1", "x", 1_000)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_summary_across_properties() {
        let (_, store) = seeded(three_visits());
        let restricted = store
            .guest_reservations_summary(&manager(&["p2"]), "h1", 1_000)
            .await
            .unwrap();
        assert_eq!(restricted.len(), 1);
        assert_eq!(restricted[0].property_id, "p2");

        let mut admin = manager(&[]);
        admin.role = "admin".into();
        let all = store.guest_reservations_summary(&admin, "h1", 1_000).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_guest_history_requires_view_permission() {
        let (source, store) = seeded(three_visits());
        let mut staff = manager(&["p1"]);
        staff.role = "staff".into();
        staff.permissions = permissions::get_default_permissions("staff");

        let err = store
            .get_guest_summary_for_property_excluding_event(&staff, "h1", "p1", "x", 1_000)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        let err = store.guest_reservations_summary(&staff, "h1", 1_000).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        // 拒绝时不查询数据源
        assert_eq!(source.guest_fetch_count(), 0);

        staff.permissions.push("guests:*".into());
        assert_eq!(
            store.guest_reservations_summary(&staff, "h1", 1_000).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_point_query_is_cached() {
        let (source, store) = seeded(three_visits());
        store.get_guest("h1").await.unwrap();
        store.get_guest("h1").await.unwrap();
        assert_eq!(source.guest_fetch_count(), 1);

        let (source, store) = seeded(three_visits());
        assert_eq!(store.load_all().await.unwrap(), 1);
        store.get_guest("h1").await.unwrap();
        assert_eq!(source.guest_fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_record_visit() {
        let source = Arc::new(InMemoryStore::new());
        let store = GuestStore::new("org", source.clone());
        let event = Event {
            id: "e1".into(),
            name: "Friday".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            start_time: "21:00".into(),
        };
        let mut draft = ReservationDraft::new("f1", "T1", 2, "21:00");
        draft.guest_name = Some("Ana".into());
        draft.guest_contact = Some(" Ana@Example.com ".into());
        let mut reservation = Reservation::from_draft("r1", draft, UserRef::new("u1", "Ana"), 0);
        reservation.arrived = true;

        let guest = store.record_visit("p1", &event, &reservation).await.unwrap().unwrap();
        assert_eq!(guest.hashed_contact, hash_contact("ana@example.com"));
        assert!(guest.visits_at("p1").unwrap()["e1"].is_fulfilled());
        assert_eq!(store.cached(), 1);

        reservation.guest_contact = None;
        assert!(store.record_visit("p1", &event, &reservation).await.unwrap().is_none());
    }
}
