//! Days-remaining and urgency classification. Pure; no I/O.

use serde::{Deserialize, Serialize};

use carestock_core::DomainResult;
use carestock_inventory::{Category, DaysRemaining, Urgency};

use crate::policy::ForecastPolicy;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub days_remaining: DaysRemaining,
    pub urgency: Urgency,
}

/// `floor(quantity / rate)`; zero stock is always zero days, and a zero rate
/// with stock on hand is `Unbounded`.
pub fn days_remaining(quantity: u32, avg_daily_consumption: f64) -> DaysRemaining {
    if quantity == 0 {
        return DaysRemaining::Days(0);
    }
    if !(avg_daily_consumption > 0.0) {
        return DaysRemaining::Unbounded;
    }
    let days = (f64::from(quantity) / avg_daily_consumption).floor();
    DaysRemaining::Days(days.min(f64::from(u32::MAX)) as u32)
}

/// Forecast for one item using the category's threshold table.
pub fn forecast(
    quantity: u32,
    avg_daily_consumption: f64,
    category: Category,
    policy: &ForecastPolicy,
) -> DomainResult<Forecast> {
    let thresholds = policy.category(category)?.thresholds;
    let days_remaining = days_remaining(quantity, avg_daily_consumption);
    Ok(Forecast {
        days_remaining,
        urgency: thresholds.classify(days_remaining),
    })
}
