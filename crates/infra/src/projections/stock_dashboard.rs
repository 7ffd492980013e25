use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use carestock_core::{DomainResult, ItemId, TenantId};
use carestock_forecast::TenantRegistry;
use carestock_inventory::{Category, DaysRemaining, InventoryItem, Urgency};

/// Item row as last persisted by a refresh or an on-demand recompute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardItem {
    pub item_id: ItemId,
    pub name: String,
    pub category: Category,
    pub quantity: u32,
    pub unit: String,
    pub avg_daily_consumption: f64,
    pub days_remaining: DaysRemaining,
    pub urgency: Urgency,
    pub last_updated: Option<DateTime<Utc>>,
    pub needs_recompute: bool,
}

impl From<&InventoryItem> for DashboardItem {
    fn from(item: &InventoryItem) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            category: item.category,
            quantity: item.quantity,
            unit: item.unit.clone(),
            avg_daily_consumption: item.avg_daily_consumption,
            days_remaining: item.days_remaining,
            urgency: item.urgency,
            last_updated: item.last_updated,
            needs_recompute: item.needs_recompute,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UrgencyCounts {
    pub ok: usize,
    pub low: usize,
    pub critical: usize,
    pub emergency: usize,
}

impl UrgencyCounts {
    pub fn add(&mut self, urgency: Urgency) {
        match urgency {
            Urgency::Ok => self.ok += 1,
            Urgency::Low => self.low += 1,
            Urgency::Critical => self.critical += 1,
            Urgency::Emergency => self.emergency += 1,
        }
    }

    pub fn merge(&mut self, other: &UrgencyCounts) {
        self.ok += other.ok;
        self.low += other.low;
        self.critical += other.critical;
        self.emergency += other.emergency;
    }

    pub fn total(&self) -> usize {
        self.ok + self.low + self.critical + self.emergency
    }

    pub fn alerting(&self) -> usize {
        self.low + self.critical + self.emergency
    }
}

/// Tenant dashboard (`getDashboard`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub tenant_id: TenantId,
    pub school_name: String,
    pub generated_at: DateTime<Utc>,
    /// Most recent derived-field write across the tenant's items.
    pub last_updated: Option<DateTime<Utc>>,
    pub counts: UrgencyCounts,
    pub by_category: BTreeMap<Category, Vec<DashboardItem>>,
    /// Highest average daily consumption first.
    pub top_consumed: Vec<DashboardItem>,
    /// Items never computed or deferred by a timed-out refresh.
    pub stale_items: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolSummary {
    pub tenant_id: TenantId,
    pub school_name: String,
    pub counts: UrgencyCounts,
    pub stale_items: usize,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Read-only network rollup. Not an input to alert dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub generated_at: DateTime<Utc>,
    pub totals: UrgencyCounts,
    pub schools: Vec<SchoolSummary>,
}

/// Dashboard projector.
///
/// Pure read over persisted derived state: it never recomputes, so a
/// dashboard can lag behind consumption by at most one refresh cadence.
#[derive(Debug)]
pub struct StockDashboardProjector<R> {
    registry: R,
    top_n: usize,
}

impl<R> StockDashboardProjector<R>
where
    R: TenantRegistry,
{
    pub fn new(registry: R, top_n: usize) -> Self {
        Self { registry, top_n }
    }

    pub fn dashboard(&self, tenant_id: TenantId, now: DateTime<Utc>) -> DomainResult<DashboardView> {
        let school = self.registry.tenant(tenant_id)?;
        let items: Vec<InventoryItem> = self
            .registry
            .items(tenant_id)?
            .into_iter()
            .filter(|i| i.tenant_id == tenant_id)
            .collect();

        let mut counts = UrgencyCounts::default();
        let mut by_category: BTreeMap<Category, Vec<DashboardItem>> = BTreeMap::new();
        for item in &items {
            counts.add(item.urgency);
            by_category.entry(item.category).or_default().push(item.into());
        }
        for rows in by_category.values_mut() {
            rows.sort_by(|a, b| b.urgency.cmp(&a.urgency).then_with(|| a.name.cmp(&b.name)));
        }

        let mut top_consumed: Vec<DashboardItem> = items.iter().map(DashboardItem::from).collect();
        top_consumed.sort_by(|a, b| {
            b.avg_daily_consumption
                .total_cmp(&a.avg_daily_consumption)
                .then_with(|| a.name.cmp(&b.name))
        });
        top_consumed.truncate(self.top_n);

        Ok(DashboardView {
            tenant_id,
            school_name: school.name,
            generated_at: now,
            last_updated: items.iter().filter_map(|i| i.last_updated).max(),
            counts,
            by_category,
            top_consumed,
            stale_items: items.iter().filter(|i| i.is_stale()).map(|i| i.id).collect(),
        })
    }

    /// Urgency counts per active school plus network totals.
    pub fn network_summary(&self, now: DateTime<Utc>) -> DomainResult<NetworkSummary> {
        let mut totals = UrgencyCounts::default();
        let mut schools = Vec::new();

        for school in self.registry.active_tenants()? {
            let items = self.registry.items(school.id)?;
            let mut counts = UrgencyCounts::default();
            for item in &items {
                counts.add(item.urgency);
            }
            totals.merge(&counts);
            schools.push(SchoolSummary {
                tenant_id: school.id,
                school_name: school.name,
                counts,
                stale_items: items.iter().filter(|i| i.is_stale()).count(),
                last_updated: items.iter().filter_map(|i| i.last_updated).max(),
            });
        }

        Ok(NetworkSummary {
            generated_at: now,
            totals,
            schools,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use carestock_core::DomainError;
    use carestock_inventory::{ForecastUpdate, School};

    use crate::read_model::InMemoryInventoryStore;

    use super::*;

    fn now() -> DateTime<Utc> {
        "2026-03-01T02:00:00Z".parse().unwrap()
    }

    fn computed(
        store: &InMemoryInventoryStore,
        school: &School,
        name: &str,
        category: Category,
        rate: f64,
        urgency: Urgency,
    ) -> InventoryItem {
        let item = InventoryItem::new(school.id, name, category, 10, "unit");
        store.upsert_item(item.clone()).unwrap();
        store
            .update_forecast(
                school.id,
                item.id,
                &ForecastUpdate {
                    avg_daily_consumption: rate,
                    days_remaining: DaysRemaining::Days(3),
                    urgency,
                    last_updated: now() - Duration::hours(1),
                },
            )
            .unwrap();
        item
    }

    #[test]
    fn dashboard_counts_groups_and_ranks() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let school = School::new("Creche Pelicano");
        store.upsert_school(school.clone());

        computed(&store, &school, "Diapers", Category::DignityCritical, 10.0, Urgency::Critical);
        computed(&store, &school, "Wipes", Category::DignityCritical, 4.0, Urgency::Low);
        computed(&store, &school, "Rice", Category::Food, 12.0, Urgency::Ok);
        let never = InventoryItem::new(school.id, "Crayons", Category::Pedagogical, 50, "box");
        store.upsert_item(never.clone()).unwrap();

        let projector = StockDashboardProjector::new(Arc::clone(&store), 2);
        let view = projector.dashboard(school.id, now()).unwrap();

        assert_eq!(view.counts.critical, 1);
        assert_eq!(view.counts.low, 1);
        assert_eq!(view.counts.ok, 2);
        assert_eq!(view.counts.total(), 4);
        assert_eq!(view.by_category[&Category::DignityCritical].len(), 2);
        assert_eq!(view.by_category[&Category::DignityCritical][0].name, "Diapers");

        let top: Vec<_> = view.top_consumed.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(top, vec!["Rice", "Diapers"]);

        assert_eq!(view.stale_items, vec![never.id]);
        assert_eq!(view.last_updated, Some(now() - Duration::hours(1)));
    }

    #[test]
    fn dashboard_never_recomputes() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let school = School::new("Creche Rouxinol");
        store.upsert_school(school.clone());
        let item = InventoryItem::new(school.id, "Soap", Category::Hygiene, 0, "bar");
        store.upsert_item(item.clone()).unwrap();

        let projector = StockDashboardProjector::new(Arc::clone(&store), 5);
        let view = projector.dashboard(school.id, now()).unwrap();

        assert_eq!(view.counts.ok, 1);
        assert_eq!(store.item(school.id, item.id).unwrap().last_updated, None);
    }

    #[test]
    fn unknown_tenant_is_not_found() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let projector = StockDashboardProjector::new(store, 5);
        assert!(matches!(
            projector.dashboard(TenantId::new(), now()),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn network_summary_rolls_up_per_school() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let a = School::new("A");
        let b = School::new("B");
        store.upsert_school(a.clone());
        store.upsert_school(b.clone());
        computed(&store, &a, "Diapers", Category::DignityCritical, 10.0, Urgency::Emergency);
        computed(&store, &b, "Diapers", Category::DignityCritical, 1.0, Urgency::Ok);

        let summary = StockDashboardProjector::new(Arc::clone(&store), 5)
            .network_summary(now())
            .unwrap();

        assert_eq!(summary.schools.len(), 2);
        assert_eq!(summary.schools[0].counts.emergency, 1);
        assert_eq!(summary.schools[1].counts.ok, 1);
        assert_eq!(summary.totals.total(), 2);
        assert_eq!(summary.totals.alerting(), 1);
    }
}
