//! `StockWatch`: the one entry point both the scheduled refresh and the
//! on-demand API use, so both converge on the same computation.

use chrono::{DateTime, Utc};
use tracing::debug;

use carestock_core::{DomainResult, ItemId, TenantId};
use carestock_inventory::InventoryItem;

use crate::alerts::{AlertAggregator, AlertBatch};
use crate::estimator::ConsumptionEstimator;
use crate::policy::ForecastPolicy;
use crate::ports::{ConsumptionHistory, TenantRegistry};
use crate::prediction::StockPrediction;

#[derive(Debug)]
pub struct StockWatch<R, H> {
    registry: R,
    history: H,
    policy: ForecastPolicy,
    aggregator: AlertAggregator,
}

impl<R, H> StockWatch<R, H>
where
    R: TenantRegistry,
    H: ConsumptionHistory,
{
    /// Validates the policy up front; a broken table never reaches a run.
    pub fn new(policy: ForecastPolicy, registry: R, history: H) -> DomainResult<Self> {
        policy.validate()?;
        let aggregator = AlertAggregator::new(policy.re_alert_interval());
        Ok(Self {
            registry,
            history,
            policy,
            aggregator,
        })
    }

    pub fn policy(&self) -> &ForecastPolicy {
        &self.policy
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn aggregator(&self) -> &AlertAggregator {
        &self.aggregator
    }

    /// Estimate, forecast and plan for an already-loaded item. Pure read.
    pub fn predict(
        &self,
        tenant_id: TenantId,
        item: &InventoryItem,
        now: DateTime<Utc>,
    ) -> DomainResult<StockPrediction> {
        let rate = ConsumptionEstimator::new(&self.history, &self.policy).estimate(tenant_id, item, now)?;
        StockPrediction::compute(item, rate, &self.policy, now)
    }

    /// Recompute and persist one item's derived fields (`recomputeItem`).
    pub fn recompute_item(
        &self,
        tenant_id: TenantId,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> DomainResult<StockPrediction> {
        let item = self.registry.item(tenant_id, item_id)?;
        self.recompute_loaded(tenant_id, &item, now)
    }

    /// Same as [`recompute_item`](Self::recompute_item) for an item the caller
    /// already loaded (the refresh loop lists a tenant's items once).
    pub fn recompute_loaded(
        &self,
        tenant_id: TenantId,
        item: &InventoryItem,
        now: DateTime<Utc>,
    ) -> DomainResult<StockPrediction> {
        let prediction = self.predict(tenant_id, item, now)?;
        self.registry
            .update_forecast(tenant_id, item.id, &prediction.forecast_update())?;

        debug!(
            tenant = %tenant_id,
            item = %item.id,
            urgency = %prediction.urgency,
            days_remaining = %prediction.days_remaining,
            "item forecast recomputed"
        );
        Ok(prediction)
    }

    /// Current alert set from persisted state (`listAlerts`). Never recomputes.
    pub fn list_alerts(&self, tenant_id: TenantId, now: DateTime<Utc>) -> DomainResult<AlertBatch> {
        let school = self.registry.tenant(tenant_id)?;
        let predictions: Vec<StockPrediction> = self
            .registry
            .items(tenant_id)?
            .iter()
            .filter(|item| item.tenant_id == tenant_id)
            .map(|item| StockPrediction::from_persisted(item, &self.policy))
            .collect();
        Ok(self.aggregator.snapshot(&school, &predictions, now))
    }
}
