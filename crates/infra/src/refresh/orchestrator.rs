//! Batch refresh across tenants.
//!
//! Run shape: `Started → PerTenantLoop → (PerItemRecompute)* → AlertDispatch →
//! Completed`. Tenants are claimed by a bounded pool of scoped worker threads;
//! the items of one tenant are recomputed in sequence, and that tenant's batch
//! is only built once every item has been handled.
//!
//! Runs on one orchestrator never overlap: a second caller waits until the
//! first has stamped its deliveries, then sees them when it reloads items.

use std::sync::Arc;
use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use carestock_core::{DomainError, DomainResult, RunId};
use carestock_forecast::{
    AlertBatch, ConsumptionHistory, DispatchOutcome, NotificationChannel, StockPrediction,
    StockWatch, TenantRegistry, TenantScope,
};
use carestock_inventory::{InventoryItem, School};

use super::cancel::CancellationToken;
use super::report::{
    Delivery, ItemFailure, RefreshReport, RunOutcome, RunPhase, TenantReport,
};
use super::retry::DispatchRetry;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound on tenants processed at once.
    pub workers: usize,
    /// Elapsed time after which a tenant's remaining items are skipped.
    pub tenant_soft_timeout: Duration,
    pub dispatch_retry: DispatchRetry,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            tenant_soft_timeout: Duration::from_secs(300),
            dispatch_retry: DispatchRetry::default(),
        }
    }
}

pub struct RefreshOrchestrator<R, H, N> {
    watch: Arc<StockWatch<R, H>>,
    notifier: N,
    config: OrchestratorConfig,
    run_guard: Mutex<()>,
}

impl<R, H, N> RefreshOrchestrator<R, H, N>
where
    R: TenantRegistry,
    H: ConsumptionHistory,
    N: NotificationChannel,
{
    pub fn new(watch: Arc<StockWatch<R, H>>, notifier: N, config: OrchestratorConfig) -> Self {
        Self {
            watch,
            notifier,
            config,
            run_guard: Mutex::new(()),
        }
    }

    pub fn watch(&self) -> &Arc<StockWatch<R, H>> {
        &self.watch
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Refresh every active tenant as of the current wall clock.
    pub fn run(&self, cancel: &CancellationToken) -> DomainResult<RefreshReport> {
        self.run_at(TenantScope::Any, Utc::now(), cancel)
    }

    /// Refresh the tenants allowed by `scope` as of `now`.
    ///
    /// Only configuration defects and a failing tenant listing abort the run;
    /// everything below tenant level is recorded in the report instead.
    pub fn run_at(
        &self,
        scope: TenantScope,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> DomainResult<RefreshReport> {
        // Guards no data; a panicked run must not block later runs.
        let _running = self.run_guard.lock().unwrap_or_else(PoisonError::into_inner);
        let run_id = RunId::new();
        let started_at = Utc::now();

        self.watch.policy().validate()?;

        let tenants: Vec<School> = self
            .watch
            .registry()
            .active_tenants()?
            .into_iter()
            .filter(|s| s.active && scope.allows(s.id))
            .collect();

        info!(
            run = %run_id,
            phase = RunPhase::Started.as_str(),
            tenants = tenants.len(),
            policy = %self.watch.policy().version,
            "stock refresh started"
        );

        let next = AtomicUsize::new(0);
        let reports: Mutex<Vec<(usize, TenantReport)>> = Mutex::new(Vec::with_capacity(tenants.len()));
        let workers = self.config.workers.max(1).min(tenants.len().max(1));

        thread::scope(|s| {
            for _ in 0..workers {
                s.spawn(|| {
                    loop {
                        if cancel.is_cancelled() {
                            break;
                        }
                        let idx = next.fetch_add(1, Ordering::SeqCst);
                        let Some(school) = tenants.get(idx) else {
                            break;
                        };
                        let report = self.refresh_tenant(run_id, school, now);
                        if let Ok(mut r) = reports.lock() {
                            r.push((idx, report));
                        }
                    }
                });
            }
        });

        let mut reports = reports
            .into_inner()
            .map_err(|_| DomainError::transient("refresh report collector poisoned"))?;
        reports.sort_by_key(|(idx, _)| *idx);
        let tenant_reports: Vec<TenantReport> = reports.into_iter().map(|(_, r)| r).collect();

        let tenants_not_started = tenants.len().saturating_sub(tenant_reports.len());
        let outcome = if tenants_not_started > 0 {
            RunOutcome::Cancelled
        } else if tenant_reports.iter().all(TenantReport::is_clean) {
            RunOutcome::Completed
        } else {
            RunOutcome::CompletedWithFailures
        };

        let report = RefreshReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            outcome,
            tenants: tenant_reports,
            tenants_not_started,
        };

        match outcome {
            RunOutcome::Completed => info!(
                run = %run_id,
                phase = RunPhase::Completed.as_str(),
                items = report.items_recomputed(),
                "stock refresh completed"
            ),
            RunOutcome::CompletedWithFailures => warn!(
                run = %run_id,
                phase = RunPhase::PartialFailure.as_str(),
                items = report.items_recomputed(),
                failures = report.failures().count(),
                undelivered = report.undelivered_tenants().len(),
                "stock refresh completed with failures"
            ),
            RunOutcome::Cancelled => warn!(
                run = %run_id,
                tenants_not_started,
                "stock refresh cancelled"
            ),
        }

        Ok(report)
    }

    fn refresh_tenant(&self, run_id: RunId, school: &School, now: DateTime<Utc>) -> TenantReport {
        let tenant_id = school.id;
        let registry = self.watch.registry();
        let started = Instant::now();

        debug!(run = %run_id, tenant = %tenant_id, phase = RunPhase::PerTenantLoop.as_str(), "refreshing tenant");

        let mut report = TenantReport {
            tenant_id,
            school_name: school.name.clone(),
            items_total: 0,
            items_recomputed: 0,
            items_skipped: 0,
            timed_out: false,
            failures: Vec::new(),
            delivery: Delivery::NothingToSend,
        };

        let items = match registry.items(tenant_id) {
            Ok(items) => items,
            Err(e) => {
                warn!(run = %run_id, tenant = %tenant_id, error = %e, "failed to list tenant items");
                report.failures.push(ItemFailure {
                    tenant_id,
                    item_id: None,
                    code: e.code().to_string(),
                    message: e.to_string(),
                });
                return report;
            }
        };
        report.items_total = items.len();

        let mut recomputed: Vec<(InventoryItem, StockPrediction)> = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if started.elapsed() >= self.config.tenant_soft_timeout {
                report.timed_out = true;
                for skipped in &items[idx..] {
                    if let Err(e) = registry.mark_needs_recompute(tenant_id, skipped.id) {
                        warn!(run = %run_id, tenant = %tenant_id, item = %skipped.id, error = %e, "failed to mark item for recompute");
                    }
                    report.items_skipped += 1;
                }
                warn!(
                    run = %run_id,
                    tenant = %tenant_id,
                    skipped = report.items_skipped,
                    "tenant soft timeout reached; remaining items deferred to next run"
                );
                break;
            }

            match self.watch.recompute_loaded(tenant_id, item, now) {
                Ok(prediction) => {
                    report.items_recomputed += 1;
                    recomputed.push((item.clone(), prediction));
                }
                Err(e) => {
                    warn!(
                        run = %run_id,
                        tenant = %tenant_id,
                        item = %item.id,
                        phase = RunPhase::PerItemRecompute.as_str(),
                        code = e.code(),
                        error = %e,
                        "item recompute failed"
                    );
                    report.failures.push(ItemFailure {
                        tenant_id,
                        item_id: Some(item.id),
                        code: e.code().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let batch = self.watch.aggregator().dispatch_batch(school, &recomputed, now);
        report.delivery = self.dispatch(run_id, &batch, now);
        report
    }

    /// One dispatch call per tenant, retried on transient failure. Dedup
    /// fields are stamped only after the channel confirms delivery.
    fn dispatch(&self, run_id: RunId, batch: &AlertBatch, now: DateTime<Utc>) -> Delivery {
        if batch.is_empty() {
            return Delivery::NothingToSend;
        }
        let tenant_id = batch.tenant_id;
        let retry = &self.config.dispatch_retry;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.notifier.dispatch(tenant_id, batch) {
                DispatchOutcome::Delivered => {
                    for alert in batch.iter() {
                        if let Err(e) = self
                            .watch
                            .registry()
                            .record_alert(tenant_id, alert.item_id, alert.urgency, now)
                        {
                            warn!(run = %run_id, tenant = %tenant_id, item = %alert.item_id, error = %e, "failed to stamp alert");
                        }
                    }
                    info!(
                        run = %run_id,
                        tenant = %tenant_id,
                        phase = RunPhase::AlertDispatch.as_str(),
                        alerts = batch.len(),
                        attempts = attempt,
                        "alert batch delivered"
                    );
                    return Delivery::Delivered {
                        alerts: batch.len(),
                        attempts: attempt,
                    };
                }
                DispatchOutcome::TransientFailure(reason) => {
                    if !retry.may_retry(attempt) {
                        warn!(
                            run = %run_id,
                            tenant = %tenant_id,
                            attempts = attempt,
                            error = %reason,
                            "alert batch undelivered; retries exhausted"
                        );
                        return Delivery::Undelivered {
                            alerts: batch.len(),
                            attempts: attempt,
                            error: reason,
                        };
                    }
                    let delay = retry.backoff_after(attempt);
                    warn!(
                        run = %run_id,
                        tenant = %tenant_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %reason,
                        "alert dispatch failed; retrying"
                    );
                    thread::sleep(delay);
                }
            }
        }
    }
}
