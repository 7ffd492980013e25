//! Recommended replenishment order.

use serde::{Deserialize, Serialize};

use crate::policy::ForecastPolicy;

/// Restore `horizon_days` of consumption plus a safety margin.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentPlanner {
    pub horizon_days: u32,
    pub safety_margin: f64,
}

impl Default for ReplenishmentPlanner {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            safety_margin: 0.2,
        }
    }
}

impl ReplenishmentPlanner {
    pub fn from_policy(policy: &ForecastPolicy) -> Self {
        Self {
            horizon_days: policy.horizon_days,
            safety_margin: policy.safety_margin,
        }
    }

    pub fn target_quantity(&self, avg_daily_consumption: f64) -> f64 {
        avg_daily_consumption.max(0.0) * f64::from(self.horizon_days) * (1.0 + self.safety_margin)
    }

    /// `max(0, ceil(rate * horizon * (1 + margin) - quantity))`.
    pub fn recommended_order(&self, avg_daily_consumption: f64, current_quantity: u32) -> u32 {
        let target = self.target_quantity(avg_daily_consumption);
        let shortfall = target - f64::from(current_quantity);
        if !(shortfall > 0.0) {
            return 0;
        }
        // Only rounding noise of the product (1.2 is not exact in binary) is
        // snapped to the nearest whole unit; any real fraction rounds up.
        let noise = target * 8.0 * f64::EPSILON;
        let nearest = shortfall.round();
        let order = if (shortfall - nearest).abs() <= noise {
            nearest
        } else {
            shortfall.ceil()
        };
        order.clamp(0.0, f64::from(u32::MAX)) as u32
    }
}
