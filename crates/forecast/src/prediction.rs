use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carestock_core::{DomainResult, ItemId, TenantId};
use carestock_inventory::{Category, DaysRemaining, ForecastUpdate, InventoryItem, Urgency};

use crate::forecast::forecast;
use crate::policy::ForecastPolicy;
use crate::replenishment::ReplenishmentPlanner;

/// Full forecast for one item, as returned by `recomputeItem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPrediction {
    pub tenant_id: TenantId,
    pub item_id: ItemId,
    pub item_name: String,
    pub category: Category,
    pub current_quantity: u32,
    pub unit: String,
    pub avg_daily_consumption: f64,
    pub days_remaining: DaysRemaining,
    pub urgency: Urgency,
    pub recommended_order: u32,
    pub computed_at: DateTime<Utc>,
}

impl StockPrediction {
    /// Run forecast + replenishment for an item given its estimated rate.
    pub fn compute(
        item: &InventoryItem,
        avg_daily_consumption: f64,
        policy: &ForecastPolicy,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let f = forecast(item.quantity, avg_daily_consumption, item.category, policy)?;
        let recommended_order = ReplenishmentPlanner::from_policy(policy)
            .recommended_order(avg_daily_consumption, item.quantity);

        Ok(Self {
            tenant_id: item.tenant_id,
            item_id: item.id,
            item_name: item.name.clone(),
            category: item.category,
            current_quantity: item.quantity,
            unit: item.unit.clone(),
            avg_daily_consumption,
            days_remaining: f.days_remaining,
            urgency: f.urgency,
            recommended_order,
            computed_at: now,
        })
    }

    /// Rebuild from the persisted derived fields (no re-estimation).
    ///
    /// Items never recomputed carry the Unix epoch as `computed_at`.
    pub fn from_persisted(item: &InventoryItem, policy: &ForecastPolicy) -> Self {
        let recommended_order = ReplenishmentPlanner::from_policy(policy)
            .recommended_order(item.avg_daily_consumption, item.quantity);

        Self {
            tenant_id: item.tenant_id,
            item_id: item.id,
            item_name: item.name.clone(),
            category: item.category,
            current_quantity: item.quantity,
            unit: item.unit.clone(),
            avg_daily_consumption: item.avg_daily_consumption,
            days_remaining: item.days_remaining,
            urgency: item.urgency,
            recommended_order,
            computed_at: item.last_updated.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    pub fn forecast_update(&self) -> ForecastUpdate {
        ForecastUpdate {
            avg_daily_consumption: self.avg_daily_consumption,
            days_remaining: self.days_remaining,
            urgency: self.urgency,
            last_updated: self.computed_at,
        }
    }
}
