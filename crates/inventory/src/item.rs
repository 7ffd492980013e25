use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carestock_core::{DomainError, DomainResult, ItemId, TenantId};

use crate::{Category, DaysRemaining, Urgency};

/// A supply item held by one school.
///
/// Identity, name, category, quantity and unit are owned by the inventory
/// workflows. The remaining fields are derived and written only by the
/// forecasting engine (scheduled refresh or on-demand recompute).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub tenant_id: TenantId,
    pub name: String,
    pub category: Category,
    pub quantity: u32,
    pub unit: String,

    pub avg_daily_consumption: f64,
    pub days_remaining: DaysRemaining,
    pub urgency: Urgency,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_alert_sent: Option<DateTime<Utc>>,
    /// Urgency carried by the last delivered alert (re-alert on change).
    pub last_alert_urgency: Option<Urgency>,
    /// Set when a refresh skipped this item; cleared by the next recompute.
    pub needs_recompute: bool,
}

/// Derived forecast fields persisted after a recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastUpdate {
    pub avg_daily_consumption: f64,
    pub days_remaining: DaysRemaining,
    pub urgency: Urgency,
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    pub fn new(
        tenant_id: TenantId,
        name: impl Into<String>,
        category: Category,
        quantity: u32,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: ItemId::new(),
            tenant_id,
            name: name.into(),
            category,
            quantity,
            unit: unit.into(),
            avg_daily_consumption: 0.0,
            days_remaining: DaysRemaining::Unbounded,
            urgency: Urgency::Ok,
            last_updated: None,
            last_alert_sent: None,
            last_alert_urgency: None,
            needs_recompute: false,
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    /// Guard against cross-tenant access; a foreign item is reported as missing.
    pub fn ensure_tenant(&self, tenant_id: TenantId) -> DomainResult<()> {
        if self.tenant_id != tenant_id {
            return Err(DomainError::not_found(format!(
                "item {} in tenant {}",
                self.id, tenant_id
            )));
        }
        Ok(())
    }

    pub fn apply_forecast(&mut self, update: &ForecastUpdate) {
        self.avg_daily_consumption = update.avg_daily_consumption;
        self.days_remaining = update.days_remaining;
        self.urgency = update.urgency;
        self.last_updated = Some(update.last_updated);
        self.needs_recompute = false;
    }

    /// Stamp the dedup fields. A stamp never moves backwards; returns `false`
    /// when a newer stamp is already in place.
    pub fn record_alert(&mut self, urgency: Urgency, at: DateTime<Utc>) -> bool {
        if self.last_alert_sent.is_some_and(|prev| prev > at) {
            return false;
        }
        self.last_alert_sent = Some(at);
        self.last_alert_urgency = Some(urgency);
        true
    }

    pub fn mark_needs_recompute(&mut self) {
        self.needs_recompute = true;
    }

    /// Never recomputed, or flagged by a skipped refresh.
    pub fn is_stale(&self) -> bool {
        self.needs_recompute || self.last_updated.is_none()
    }
}
