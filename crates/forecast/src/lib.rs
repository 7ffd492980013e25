//! `carestock-forecast`
//!
//! **Responsibility:** the canonical stock-watchdog engine.
//!
//! - Estimates average daily consumption from delivered requisitions.
//! - Forecasts days remaining and classifies urgency per category.
//! - Recommends replenishment quantities.
//! - Aggregates tenant-scoped alert batches with re-alert deduplication.
//!
//! The crate stays storage-agnostic: collaborators are injected through the
//! traits in [`ports`]. Policy lives in one validated [`ForecastPolicy`] table.

pub mod alerts;
pub mod estimator;
pub mod forecast;
pub mod policy;
pub mod ports;
pub mod prediction;
pub mod replenishment;
pub mod scope;
pub mod service;

pub use alerts::{AlertAggregator, AlertBatch, StockAlert};
pub use estimator::{ConsumptionEstimator, average_daily_consumption};
pub use forecast::{Forecast, days_remaining, forecast};
pub use policy::{CategoryPolicy, ForecastPolicy, UrgencyThresholds};
pub use ports::{ConsumptionHistory, DispatchOutcome, NotificationChannel, TenantRegistry};
pub use prediction::StockPrediction;
pub use replenishment::ReplenishmentPlanner;
pub use scope::TenantScope;
pub use service::StockWatch;
