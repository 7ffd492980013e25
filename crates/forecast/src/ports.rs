//! Collaborator boundaries.
//!
//! The engine never owns storage or transport: registry, history and
//! notification are injected by callers (infra/API), so every component can
//! be exercised against in-memory fakes.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use carestock_core::{DomainResult, ItemId, TenantId};
use carestock_inventory::{ConsumptionRecord, ForecastUpdate, InventoryItem, School, Urgency};

use crate::alerts::AlertBatch;

/// Tenant and item registry.
///
/// Every item operation is addressed by `(tenant_id, item_id)`; an item that
/// exists under another tenant is `NotFound`.
pub trait TenantRegistry: Send + Sync {
    fn active_tenants(&self) -> DomainResult<Vec<School>>;
    fn tenant(&self, tenant_id: TenantId) -> DomainResult<School>;
    fn items(&self, tenant_id: TenantId) -> DomainResult<Vec<InventoryItem>>;
    fn item(&self, tenant_id: TenantId, item_id: ItemId) -> DomainResult<InventoryItem>;

    /// Persist derived forecast fields (also clears `needs_recompute`).
    fn update_forecast(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        update: &ForecastUpdate,
    ) -> DomainResult<()>;

    /// Stamp the dedup fields after a delivered notification.
    fn record_alert(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        urgency: Urgency,
        at: DateTime<Utc>,
    ) -> DomainResult<()>;

    fn mark_needs_recompute(&self, tenant_id: TenantId, item_id: ItemId) -> DomainResult<()>;
}

/// Source of delivered requisitions.
pub trait ConsumptionHistory: Send + Sync {
    /// Delivered records for one item fulfilled at or after `since`.
    fn list_fulfilled(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<ConsumptionRecord>>;
}

/// Outcome of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    TransientFailure(String),
}

/// Outbound notification channel (one call per tenant batch).
pub trait NotificationChannel: Send + Sync {
    fn dispatch(&self, tenant_id: TenantId, batch: &AlertBatch) -> DispatchOutcome;
}

impl<S> TenantRegistry for Arc<S>
where
    S: TenantRegistry + ?Sized,
{
    fn active_tenants(&self) -> DomainResult<Vec<School>> {
        (**self).active_tenants()
    }

    fn tenant(&self, tenant_id: TenantId) -> DomainResult<School> {
        (**self).tenant(tenant_id)
    }

    fn items(&self, tenant_id: TenantId) -> DomainResult<Vec<InventoryItem>> {
        (**self).items(tenant_id)
    }

    fn item(&self, tenant_id: TenantId, item_id: ItemId) -> DomainResult<InventoryItem> {
        (**self).item(tenant_id, item_id)
    }

    fn update_forecast(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        update: &ForecastUpdate,
    ) -> DomainResult<()> {
        (**self).update_forecast(tenant_id, item_id, update)
    }

    fn record_alert(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        urgency: Urgency,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        (**self).record_alert(tenant_id, item_id, urgency, at)
    }

    fn mark_needs_recompute(&self, tenant_id: TenantId, item_id: ItemId) -> DomainResult<()> {
        (**self).mark_needs_recompute(tenant_id, item_id)
    }
}

impl<S> ConsumptionHistory for Arc<S>
where
    S: ConsumptionHistory + ?Sized,
{
    fn list_fulfilled(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<ConsumptionRecord>> {
        (**self).list_fulfilled(tenant_id, item_id, since)
    }
}

impl<S> NotificationChannel for Arc<S>
where
    S: NotificationChannel + ?Sized,
{
    fn dispatch(&self, tenant_id: TenantId, batch: &AlertBatch) -> DispatchOutcome {
        (**self).dispatch(tenant_id, batch)
    }
}
