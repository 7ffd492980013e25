//! Tenant-scoped alert aggregation and re-alert deduplication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use carestock_core::{ItemId, TenantId};
use carestock_inventory::{Category, DaysRemaining, InventoryItem, School, Urgency};

use crate::prediction::StockPrediction;

/// One item crossing an urgency threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAlert {
    pub item_id: ItemId,
    pub item_name: String,
    pub category: Category,
    pub urgency: Urgency,
    pub days_remaining: DaysRemaining,
    pub current_quantity: u32,
    pub unit: String,
    pub avg_daily_consumption: f64,
    pub recommended_order: u32,
    pub message: String,
    pub recommended_action: String,
}

impl StockAlert {
    pub fn from_prediction(p: &StockPrediction) -> Self {
        let (message, recommended_action) = wording(p);
        Self {
            item_id: p.item_id,
            item_name: p.item_name.clone(),
            category: p.category,
            urgency: p.urgency,
            days_remaining: p.days_remaining,
            current_quantity: p.current_quantity,
            unit: p.unit.clone(),
            avg_daily_consumption: p.avg_daily_consumption,
            recommended_order: p.recommended_order,
            message,
            recommended_action,
        }
    }
}

fn wording(p: &StockPrediction) -> (String, String) {
    let name = &p.item_name;
    if p.current_quantity == 0 {
        return (
            format!("{name} is out of stock"),
            "Request an urgent purchase or transfer stock from another unit".to_string(),
        );
    }

    let when = match p.days_remaining {
        DaysRemaining::Days(0) => "runs out today".to_string(),
        DaysRemaining::Days(1) => "runs out tomorrow".to_string(),
        DaysRemaining::Days(d) => format!("runs out in {d} days"),
        DaysRemaining::Unbounded => "is not being consumed".to_string(),
    };

    let action = match p.urgency {
        Urgency::Emergency => "Request an urgent purchase immediately",
        Urgency::Critical => "Request a purchase with high priority",
        Urgency::Low => "Plan a purchase this week",
        Urgency::Ok => "No action needed",
    };

    (format!("{name} {when}"), action.to_string())
}

/// Alert set for one tenant, partitioned by severity.
///
/// Each partition is ordered by days remaining ascending (then name), so
/// iterating the batch surfaces the most urgent items first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertBatch {
    pub tenant_id: TenantId,
    pub school_name: String,
    pub generated_at: DateTime<Utc>,
    pub emergency: Vec<StockAlert>,
    pub critical: Vec<StockAlert>,
    pub low: Vec<StockAlert>,
}

impl AlertBatch {
    pub fn empty(school: &School, generated_at: DateTime<Utc>) -> Self {
        Self {
            tenant_id: school.id,
            school_name: school.name.clone(),
            generated_at,
            emergency: Vec::new(),
            critical: Vec::new(),
            low: Vec::new(),
        }
    }

    /// Build from predictions; `OK` items are dropped.
    pub fn from_predictions<'a>(
        school: &School,
        predictions: impl IntoIterator<Item = &'a StockPrediction>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut batch = Self::empty(school, generated_at);
        for p in predictions {
            if p.tenant_id != school.id {
                continue;
            }
            let alert = StockAlert::from_prediction(p);
            match p.urgency {
                Urgency::Emergency => batch.emergency.push(alert),
                Urgency::Critical => batch.critical.push(alert),
                Urgency::Low => batch.low.push(alert),
                Urgency::Ok => {}
            }
        }
        for part in [&mut batch.emergency, &mut batch.critical, &mut batch.low] {
            part.sort_by(|a, b| {
                a.days_remaining
                    .cmp(&b.days_remaining)
                    .then_with(|| a.item_name.cmp(&b.item_name))
            });
        }
        batch
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.emergency.len() + self.critical.len() + self.low.len()
    }

    /// Severity descending, then days remaining ascending.
    pub fn iter(&self) -> impl Iterator<Item = &StockAlert> {
        self.emergency
            .iter()
            .chain(self.critical.iter())
            .chain(self.low.iter())
    }
}

/// Builds alert batches and decides which items need (re-)dispatch.
#[derive(Debug, Copy, Clone)]
pub struct AlertAggregator {
    re_alert_interval: Duration,
}

impl AlertAggregator {
    pub fn new(re_alert_interval: Duration) -> Self {
        Self { re_alert_interval }
    }

    pub fn re_alert_interval(&self) -> Duration {
        self.re_alert_interval
    }

    /// An alerting item is (re-)sent when it was never alerted, its urgency
    /// changed since the last delivered alert, or the re-alert interval elapsed.
    pub fn should_dispatch(&self, item: &InventoryItem, urgency: Urgency, now: DateTime<Utc>) -> bool {
        if !urgency.is_alerting() {
            return false;
        }
        let Some(sent) = item.last_alert_sent else {
            return true;
        };
        if item.last_alert_urgency != Some(urgency) {
            return true;
        }
        now - sent >= self.re_alert_interval
    }

    /// Every alerting item, regardless of dispatch history (`listAlerts`).
    pub fn snapshot(
        &self,
        school: &School,
        predictions: &[StockPrediction],
        now: DateTime<Utc>,
    ) -> AlertBatch {
        AlertBatch::from_predictions(school, predictions, now)
    }

    /// Items due for dispatch after a recompute. `recomputed` pairs the item as
    /// stored before this run's alert stamping with its fresh prediction.
    pub fn dispatch_batch(
        &self,
        school: &School,
        recomputed: &[(InventoryItem, StockPrediction)],
        now: DateTime<Utc>,
    ) -> AlertBatch {
        let due = recomputed
            .iter()
            .filter(|(item, p)| item.tenant_id == school.id && self.should_dispatch(item, p.urgency, now))
            .map(|(_, p)| p);
        AlertBatch::from_predictions(school, due, now)
    }
}
