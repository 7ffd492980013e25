use tracing::{info, warn};

use carestock_core::TenantId;
use carestock_forecast::{AlertBatch, DispatchOutcome, NotificationChannel};

/// Writes each alert batch to the structured log and reports it delivered.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationChannel;

impl TracingNotificationChannel {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationChannel for TracingNotificationChannel {
    fn dispatch(&self, tenant_id: TenantId, batch: &AlertBatch) -> DispatchOutcome {
        info!(
            tenant = %tenant_id,
            school = %batch.school_name,
            emergency = batch.emergency.len(),
            critical = batch.critical.len(),
            low = batch.low.len(),
            "stock alert batch"
        );
        for alert in batch.iter() {
            warn!(
                tenant = %tenant_id,
                item = %alert.item_id,
                urgency = %alert.urgency,
                days_remaining = %alert.days_remaining,
                quantity = alert.current_quantity,
                recommended_order = alert.recommended_order,
                action = %alert.recommended_action,
                "{}",
                alert.message
            );
        }
        DispatchOutcome::Delivered
    }
}
