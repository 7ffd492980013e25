//! Forecast policy: one versioned, validated table keyed by category.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use carestock_core::{DomainError, DomainResult};
use carestock_inventory::{Category, DaysRemaining, Urgency};

/// Half-open urgency boundaries in days (`days < emergency_below` is EMERGENCY).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyThresholds {
    pub emergency_below: u32,
    pub critical_below: u32,
    pub low_below: u32,
}

impl UrgencyThresholds {
    /// Table for dignity-critical consumables.
    pub const STRICT: UrgencyThresholds = UrgencyThresholds {
        emergency_below: 1,
        critical_below: 3,
        low_below: 7,
    };

    /// Table for every other category.
    pub const STANDARD: UrgencyThresholds = UrgencyThresholds {
        emergency_below: 2,
        critical_below: 5,
        low_below: 10,
    };

    /// Classify, testing the most severe level first.
    pub fn classify(&self, days: DaysRemaining) -> Urgency {
        let Some(days) = days.days() else {
            return Urgency::Ok;
        };
        if days < self.emergency_below {
            Urgency::Emergency
        } else if days < self.critical_below {
            Urgency::Critical
        } else if days < self.low_below {
            Urgency::Low
        } else {
            Urgency::Ok
        }
    }

    fn validate(&self, category: Category) -> DomainResult<()> {
        if self.emergency_below > self.critical_below || self.critical_below > self.low_below {
            return Err(DomainError::configuration(format!(
                "thresholds for {category} must satisfy emergency_below <= critical_below <= low_below (got {}/{}/{})",
                self.emergency_below, self.critical_below, self.low_below
            )));
        }
        Ok(())
    }
}

/// Per-category policy row.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPolicy {
    /// Units per day assumed when an item has no delivery history.
    pub default_daily_rate: f64,
    pub thresholds: UrgencyThresholds,
}

/// The complete forecasting policy.
///
/// Category defaults and thresholds are data, not code: deployments that
/// disagree on them ship a different table (and bump `version`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPolicy {
    pub version: String,
    pub categories: BTreeMap<Category, CategoryPolicy>,
    /// Trailing window of delivered requisitions used for estimation.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// Days of stock a replenishment order should restore.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Fractional buffer on top of the horizon target (0.2 = 20%).
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f64,
    /// Minimum time between repeat alerts for an item whose urgency is unchanged.
    #[serde(default = "default_re_alert_interval_hours")]
    pub re_alert_interval_hours: u32,
    /// Size of the dashboard's top-consumption list.
    #[serde(default = "default_top_consumed")]
    pub top_consumed: usize,
}

/// Upper bound for `window_days` and `horizon_days` (ten years).
pub const MAX_PERIOD_DAYS: u32 = 3_660;
/// Upper bound for `re_alert_interval_hours` (one year).
pub const MAX_RE_ALERT_INTERVAL_HOURS: u32 = 24 * 366;

fn default_window_days() -> u32 {
    30
}

fn default_horizon_days() -> u32 {
    30
}

fn default_safety_margin() -> f64 {
    0.2
}

fn default_re_alert_interval_hours() -> u32 {
    72
}

fn default_top_consumed() -> usize {
    5
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self::canonical()
    }
}

impl ForecastPolicy {
    pub const CANONICAL_VERSION: &'static str = "canonical-v1";
    pub const LEGACY_PER_CHILD_VERSION: &'static str = "legacy-per-child-v0";

    /// Canonical table: flat per-unit daily defaults.
    pub fn canonical() -> Self {
        let rates = [
            (Category::DignityCritical, 50.0),
            (Category::Hygiene, 20.0),
            (Category::Food, 30.0),
            (Category::Pedagogical, 5.0),
            (Category::Cleaning, 10.0),
            (Category::Medicine, 2.0),
        ];
        Self::from_rates(Self::CANONICAL_VERSION, rates)
    }

    /// Older per-child table scaled by the expected number of children per unit.
    pub fn legacy_per_child(children: u32) -> Self {
        let per_child = [
            (Category::DignityCritical, 5.0),
            (Category::Hygiene, 2.0),
            (Category::Food, 0.5),
            (Category::Pedagogical, 0.1),
            (Category::Cleaning, 0.05),
            (Category::Medicine, 0.01),
        ];
        let scaled = per_child.map(|(c, r)| (c, r * f64::from(children)));
        Self::from_rates(Self::LEGACY_PER_CHILD_VERSION, scaled)
    }

    fn from_rates(version: &str, rates: [(Category, f64); 6]) -> Self {
        let categories = rates
            .into_iter()
            .map(|(category, default_daily_rate)| {
                let thresholds = if category == Category::DignityCritical {
                    UrgencyThresholds::STRICT
                } else {
                    UrgencyThresholds::STANDARD
                };
                (
                    category,
                    CategoryPolicy {
                        default_daily_rate,
                        thresholds,
                    },
                )
            })
            .collect();

        Self {
            version: version.to_string(),
            categories,
            window_days: default_window_days(),
            horizon_days: default_horizon_days(),
            safety_margin: default_safety_margin(),
            re_alert_interval_hours: default_re_alert_interval_hours(),
            top_consumed: default_top_consumed(),
        }
    }

    /// Parse and validate a JSON policy document.
    pub fn from_json(json: &str) -> DomainResult<Self> {
        let policy: ForecastPolicy = serde_json::from_str(json)
            .map_err(|e| DomainError::configuration(format!("malformed policy: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Fail fast on any missing or inconsistent entry.
    pub fn validate(&self) -> DomainResult<()> {
        if self.version.trim().is_empty() {
            return Err(DomainError::configuration("policy version must not be empty"));
        }
        for category in Category::ALL {
            let row = self.categories.get(&category).ok_or_else(|| {
                DomainError::configuration(format!("no policy entry for category {category}"))
            })?;
            if !(row.default_daily_rate.is_finite() && row.default_daily_rate >= 0.0) {
                return Err(DomainError::configuration(format!(
                    "default_daily_rate for {category} must be a finite non-negative number"
                )));
            }
            row.thresholds.validate(category)?;
        }
        for (name, days) in [("window_days", self.window_days), ("horizon_days", self.horizon_days)] {
            if days == 0 || days > MAX_PERIOD_DAYS {
                return Err(DomainError::configuration(format!(
                    "{name} must be between 1 and {MAX_PERIOD_DAYS} (got {days})"
                )));
            }
        }
        if self.re_alert_interval_hours > MAX_RE_ALERT_INTERVAL_HOURS {
            return Err(DomainError::configuration(format!(
                "re_alert_interval_hours must be at most {MAX_RE_ALERT_INTERVAL_HOURS} (got {})",
                self.re_alert_interval_hours
            )));
        }
        if !(self.safety_margin.is_finite() && self.safety_margin >= 0.0) {
            return Err(DomainError::configuration(
                "safety_margin must be a finite non-negative number",
            ));
        }
        Ok(())
    }

    /// Policy row for a category. A missing row is reported as `InvalidCategory`.
    pub fn category(&self, category: Category) -> DomainResult<&CategoryPolicy> {
        self.categories.get(&category).ok_or_else(|| {
            DomainError::invalid_category(format!("{category} (policy {})", self.version))
        })
    }

    pub fn re_alert_interval(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.re_alert_interval_hours))
    }
}
