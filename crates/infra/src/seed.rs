//! Demo data for local runs.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use carestock_core::DomainResult;
use carestock_inventory::{Category, ConsumptionRecord, InventoryItem, RequisitionStatus, School};

use crate::read_model::InMemoryInventoryStore;

struct DemoItem {
    name: &'static str,
    category: Category,
    quantity: u32,
    unit: &'static str,
    /// Units delivered per day over the seeded history; 0 leaves no history.
    daily_delivery: u32,
}

const DEMO_ITEMS: &[DemoItem] = &[
    DemoItem { name: "Diapers (size M)", category: Category::DignityCritical, quantity: 10, unit: "unit", daily_delivery: 10 },
    DemoItem { name: "Infant formula", category: Category::DignityCritical, quantity: 24, unit: "can", daily_delivery: 4 },
    DemoItem { name: "Wet wipes", category: Category::Hygiene, quantity: 60, unit: "pack", daily_delivery: 6 },
    DemoItem { name: "Toothpaste", category: Category::Hygiene, quantity: 40, unit: "tube", daily_delivery: 0 },
    DemoItem { name: "Rice", category: Category::Food, quantity: 80, unit: "kg", daily_delivery: 12 },
    DemoItem { name: "Printer paper", category: Category::Pedagogical, quantity: 100, unit: "ream", daily_delivery: 0 },
    DemoItem { name: "Crayons", category: Category::Pedagogical, quantity: 12, unit: "box", daily_delivery: 1 },
    DemoItem { name: "Bleach", category: Category::Cleaning, quantity: 30, unit: "l", daily_delivery: 2 },
    DemoItem { name: "Saline solution", category: Category::Medicine, quantity: 5, unit: "bottle", daily_delivery: 0 },
];

const DEMO_SCHOOLS: &[&str] = &["Creche Pelicano", "Creche Rouxinol", "CEPI Sabiá do Campo"];

/// Seed three schools with the same catalogue and 15 days of deliveries.
///
/// Each school gets a different delivery multiplier, so identical item names
/// end up with different forecasts per tenant. One rejected requisition per
/// item is mixed in; it never counts towards consumption.
pub fn seed_demo(store: &InMemoryInventoryStore, now: DateTime<Utc>) -> DomainResult<Vec<School>> {
    let mut schools = Vec::with_capacity(DEMO_SCHOOLS.len());

    for (multiplier, name) in (1u32..).zip(DEMO_SCHOOLS.iter()) {
        let school = School::new(*name);
        store.upsert_school(school.clone());

        for demo in DEMO_ITEMS {
            let item = InventoryItem::new(school.id, demo.name, demo.category, demo.quantity, demo.unit);
            store.upsert_item(item.clone())?;

            if demo.daily_delivery == 0 {
                continue;
            }
            for day in 1..=15 {
                store.append_record(ConsumptionRecord::delivered(
                    school.id,
                    item.id,
                    demo.daily_delivery * multiplier,
                    now - Duration::days(day),
                ))?;
            }
            store.append_record(
                ConsumptionRecord::delivered(school.id, item.id, 500, now - Duration::days(2))
                    .with_status(RequisitionStatus::Rejected),
            )?;
        }

        info!(tenant = %school.id, school = %school.name, items = DEMO_ITEMS.len(), "seeded demo school");
        schools.push(school);
    }

    Ok(schools)
}

#[cfg(test)]
mod tests {
    use carestock_forecast::TenantRegistry;

    use super::*;

    #[test]
    fn seeds_isolated_schools_with_identical_catalogues() {
        let store = InMemoryInventoryStore::new();
        let schools = seed_demo(&store, Utc::now()).unwrap();

        assert_eq!(schools.len(), 3);
        for school in &schools {
            let items = store.items(school.id).unwrap();
            assert_eq!(items.len(), DEMO_ITEMS.len());
            assert!(items.iter().all(|i| i.tenant_id == school.id));
        }
    }
}
