use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use carestock_core::{DomainError, DomainResult, ItemId, RecordId, TenantId};
use carestock_forecast::{ConsumptionHistory, TenantRegistry};
use carestock_inventory::{ConsumptionRecord, ForecastUpdate, InventoryItem, School, Urgency};

use super::tenant_store::{InMemoryTenantStore, TenantStore};

/// In-memory registry + history source for tests/dev.
///
/// Items and records live in tenant-keyed stores, so a lookup under the wrong
/// tenant is indistinguishable from a missing row.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    schools: RwLock<BTreeMap<TenantId, School>>,
    items: InMemoryTenantStore<ItemId, InventoryItem>,
    records: InMemoryTenantStore<RecordId, ConsumptionRecord>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_school(&self, school: School) {
        if let Ok(mut schools) = self.schools.write() {
            schools.insert(school.id, school);
        }
    }

    /// Insert or replace an item (inventory-management workflow).
    pub fn upsert_item(&self, item: InventoryItem) -> DomainResult<()> {
        self.ensure_school(item.tenant_id)?;
        self.items.upsert(item.tenant_id, item.id, item);
        Ok(())
    }

    /// Change on-hand quantity without touching derived fields.
    pub fn set_quantity(&self, tenant_id: TenantId, item_id: ItemId, quantity: u32) -> DomainResult<()> {
        self.update_item(tenant_id, item_id, |item| item.quantity = quantity)
    }

    /// Append a requisition record (append-only).
    pub fn append_record(&self, record: ConsumptionRecord) -> DomainResult<()> {
        if self.items.get(record.tenant_id, &record.item_id).is_none() {
            return Err(DomainError::not_found(format!(
                "item {} in tenant {}",
                record.item_id, record.tenant_id
            )));
        }
        self.records.upsert(record.tenant_id, record.id, record);
        Ok(())
    }

    fn ensure_school(&self, tenant_id: TenantId) -> DomainResult<()> {
        let known = self
            .schools
            .read()
            .map(|s| s.contains_key(&tenant_id))
            .unwrap_or(false);
        if known {
            Ok(())
        } else {
            Err(DomainError::not_found(format!("tenant {tenant_id}")))
        }
    }

    fn update_item(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        mut f: impl FnMut(&mut InventoryItem),
    ) -> DomainResult<()> {
        if self.items.update(tenant_id, &item_id, &mut f) {
            Ok(())
        } else {
            Err(DomainError::not_found(format!("item {item_id} in tenant {tenant_id}")))
        }
    }
}

impl TenantRegistry for InMemoryInventoryStore {
    fn active_tenants(&self) -> DomainResult<Vec<School>> {
        let schools = self
            .schools
            .read()
            .map_err(|_| DomainError::transient("school registry lock poisoned"))?;
        let mut active: Vec<School> = schools.values().filter(|s| s.active).cloned().collect();
        active.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(active)
    }

    fn tenant(&self, tenant_id: TenantId) -> DomainResult<School> {
        let schools = self
            .schools
            .read()
            .map_err(|_| DomainError::transient("school registry lock poisoned"))?;
        schools
            .get(&tenant_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("tenant {tenant_id}")))
    }

    fn items(&self, tenant_id: TenantId) -> DomainResult<Vec<InventoryItem>> {
        self.ensure_school(tenant_id)?;
        let mut items = self.items.list(tenant_id);
        items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    fn item(&self, tenant_id: TenantId, item_id: ItemId) -> DomainResult<InventoryItem> {
        self.items
            .get(tenant_id, &item_id)
            .ok_or_else(|| DomainError::not_found(format!("item {item_id} in tenant {tenant_id}")))
    }

    fn update_forecast(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        update: &ForecastUpdate,
    ) -> DomainResult<()> {
        self.update_item(tenant_id, item_id, |item| item.apply_forecast(update))
    }

    fn record_alert(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        urgency: Urgency,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.update_item(tenant_id, item_id, |item| {
            item.record_alert(urgency, at);
        })
    }

    fn mark_needs_recompute(&self, tenant_id: TenantId, item_id: ItemId) -> DomainResult<()> {
        self.update_item(tenant_id, item_id, |item| item.mark_needs_recompute())
    }
}

impl ConsumptionHistory for InMemoryInventoryStore {
    fn list_fulfilled(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<ConsumptionRecord>> {
        let mut records: Vec<ConsumptionRecord> = self
            .records
            .list(tenant_id)
            .into_iter()
            .filter(|r| r.item_id == item_id && r.is_fulfilled() && r.fulfilled_at >= since)
            .collect();
        records.sort_by_key(|r| r.fulfilled_at);
        Ok(records)
    }
}
