use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carestock_core::{ItemId, RecordId, TenantId};

/// Requisition lifecycle status. Only `Delivered` counts as consumption.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequisitionStatus {
    Pending,
    Approved,
    Delivered,
    Rejected,
}

/// A fulfilled (or in-flight) requisition for one item.
///
/// Append-only; created by the requisition workflow and read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub id: RecordId,
    pub tenant_id: TenantId,
    pub item_id: ItemId,
    pub quantity: u32,
    pub fulfilled_at: DateTime<Utc>,
    pub status: RequisitionStatus,
}

impl ConsumptionRecord {
    /// Convenience constructor for a delivered record.
    pub fn delivered(
        tenant_id: TenantId,
        item_id: ItemId,
        quantity: u32,
        fulfilled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            tenant_id,
            item_id,
            quantity,
            fulfilled_at,
            status: RequisitionStatus::Delivered,
        }
    }

    pub fn with_status(mut self, status: RequisitionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_fulfilled(&self) -> bool {
        self.status == RequisitionStatus::Delivered
    }
}
