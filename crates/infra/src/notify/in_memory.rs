use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use carestock_core::TenantId;
use carestock_forecast::{AlertBatch, DispatchOutcome, NotificationChannel};

/// Records delivered batches; failures can be scripted for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryNotificationChannel {
    delivered: Mutex<Vec<(TenantId, AlertBatch)>>,
    attempts: AtomicU32,
    fail_next: AtomicU32,
    fail_always: AtomicBool,
}

impl InMemoryNotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `n` dispatch attempts report a transient failure.
    pub fn fail_next(&self, n: u32) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    pub fn fail_always(&self, on: bool) {
        self.fail_always.store(on, Ordering::SeqCst);
    }

    /// Delivered batches, in delivery order.
    pub fn delivered(&self) -> Vec<(TenantId, AlertBatch)> {
        self.delivered.lock().map(|d| d.clone()).unwrap_or_default()
    }

    pub fn delivered_for(&self, tenant_id: TenantId) -> Vec<AlertBatch> {
        self.delivered()
            .into_iter()
            .filter(|(t, _)| *t == tenant_id)
            .map(|(_, b)| b)
            .collect()
    }

    /// Dispatch calls received, failed ones included.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl NotificationChannel for InMemoryNotificationChannel {
    fn dispatch(&self, tenant_id: TenantId, batch: &AlertBatch) -> DispatchOutcome {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail_always.load(Ordering::SeqCst) {
            return DispatchOutcome::TransientFailure("channel unavailable".to_string());
        }
        let scripted = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if scripted {
            return DispatchOutcome::TransientFailure("scripted failure".to_string());
        }

        match self.delivered.lock() {
            Ok(mut d) => {
                d.push((tenant_id, batch.clone()));
                DispatchOutcome::Delivered
            }
            Err(_) => DispatchOutcome::TransientFailure("delivery log poisoned".to_string()),
        }
    }
}
