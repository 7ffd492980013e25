//! Average daily consumption from delivered requisitions.

use chrono::{DateTime, Duration, Utc};

use carestock_core::{DomainError, DomainResult, TenantId};
use carestock_inventory::{ConsumptionRecord, InventoryItem};

use crate::policy::ForecastPolicy;
use crate::ports::ConsumptionHistory;

const SECONDS_PER_DAY: i64 = 86_400;

/// Average daily consumption over a trailing window.
///
/// Model:
/// - Sum delivered quantities fulfilled within `[now - window_days, now]`.
/// - Divide by the days elapsed since the oldest qualifying record (at least
///   one), not by the nominal window, so sparse history is not diluted.
/// - Round up to a whole unit; under-estimating would under-trigger alerts.
///
/// Returns `None` when nothing qualifies (the caller falls back to the
/// category default).
pub fn average_daily_consumption(
    records: &[ConsumptionRecord],
    window_days: u32,
    now: DateTime<Utc>,
) -> Option<f64> {
    let since = now
        .checked_sub_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut total: u64 = 0;
    let mut oldest: Option<DateTime<Utc>> = None;
    for record in records
        .iter()
        .filter(|r| r.is_fulfilled() && r.fulfilled_at >= since && r.fulfilled_at <= now)
    {
        total += u64::from(record.quantity);
        oldest = Some(match oldest {
            Some(o) => o.min(record.fulfilled_at),
            None => record.fulfilled_at,
        });
    }

    let oldest = oldest?;
    let elapsed_secs = (now - oldest).num_seconds().max(0);
    let elapsed_days = ((elapsed_secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY).max(1);

    Some((total as f64 / elapsed_days as f64).ceil())
}

/// Consumption estimator bound to a history source and policy.
#[derive(Debug)]
pub struct ConsumptionEstimator<'a, H> {
    history: &'a H,
    policy: &'a ForecastPolicy,
}

impl<'a, H> ConsumptionEstimator<'a, H>
where
    H: ConsumptionHistory,
{
    pub fn new(history: &'a H, policy: &'a ForecastPolicy) -> Self {
        Self { history, policy }
    }

    /// Estimate with the policy's window.
    pub fn estimate(&self, tenant_id: TenantId, item: &InventoryItem, now: DateTime<Utc>) -> DomainResult<f64> {
        self.estimate_with_window(tenant_id, item, self.policy.window_days, now)
    }

    pub fn estimate_with_window(
        &self,
        tenant_id: TenantId,
        item: &InventoryItem,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<f64> {
        if window_days == 0 {
            return Err(DomainError::validation("window length must be > 0 days"));
        }
        item.ensure_tenant(tenant_id)?;
        let default_rate = self.policy.category(item.category)?.default_daily_rate;

        let since = now
            .checked_sub_signed(Duration::days(i64::from(window_days)))
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "a {window_days}-day window reaches before the earliest representable date"
                ))
            })?;
        let mut records = self.history.list_fulfilled(tenant_id, item.id, since)?;
        // Records of other tenants or items never count toward this item.
        records.retain(|r| r.tenant_id == tenant_id && r.item_id == item.id);

        Ok(average_daily_consumption(&records, window_days, now).unwrap_or(default_rate))
    }
}
