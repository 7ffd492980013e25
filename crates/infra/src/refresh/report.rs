//! Outcome of one refresh run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use carestock_core::{ItemId, RunId, TenantId};

/// Phases of a run, used as a structured log field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Started,
    PerTenantLoop,
    PerItemRecompute,
    AlertDispatch,
    PartialFailure,
    Completed,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Started => "started",
            RunPhase::PerTenantLoop => "per_tenant_loop",
            RunPhase::PerItemRecompute => "per_item_recompute",
            RunPhase::AlertDispatch => "alert_dispatch",
            RunPhase::PartialFailure => "partial_failure",
            RunPhase::Completed => "completed",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    /// Reached completion with item failures, timeouts or undelivered batches.
    CompletedWithFailures,
    /// Stopped between tenants; unvisited tenants were left untouched.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub tenant_id: TenantId,
    pub item_id: Option<ItemId>,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Delivery {
    NothingToSend,
    Delivered { alerts: usize, attempts: u32 },
    /// Retries exhausted; dedup timestamps were not stamped.
    Undelivered { alerts: usize, attempts: u32, error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantReport {
    pub tenant_id: TenantId,
    pub school_name: String,
    pub items_total: usize,
    pub items_recomputed: usize,
    pub items_skipped: usize,
    pub timed_out: bool,
    pub failures: Vec<ItemFailure>,
    pub delivery: Delivery,
}

impl TenantReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
            && !self.timed_out
            && !matches!(self.delivery, Delivery::Undelivered { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    pub tenants: Vec<TenantReport>,
    pub tenants_not_started: usize,
}

impl RefreshReport {
    pub fn items_recomputed(&self) -> usize {
        self.tenants.iter().map(|t| t.items_recomputed).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
        self.tenants.iter().flat_map(|t| t.failures.iter())
    }

    pub fn tenant(&self, tenant_id: TenantId) -> Option<&TenantReport> {
        self.tenants.iter().find(|t| t.tenant_id == tenant_id)
    }

    pub fn undelivered_tenants(&self) -> Vec<TenantId> {
        self.tenants
            .iter()
            .filter(|t| matches!(t.delivery, Delivery::Undelivered { .. }))
            .map(|t| t.tenant_id)
            .collect()
    }
}
