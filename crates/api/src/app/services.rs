//! Service wiring: store, engine, projector and the scheduled refresh.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use carestock_core::{DomainResult, TenantId};
use carestock_forecast::{ForecastPolicy, NotificationChannel, StockWatch, TenantScope};
use carestock_infra::{
    config::RefreshConfig,
    notify::TracingNotificationChannel,
    projections::StockDashboardProjector,
    read_model::InMemoryInventoryStore,
    refresh::{CancellationToken, RefreshOrchestrator, RefreshReport, RefreshRunnerHandle},
};

pub type Store = Arc<InMemoryInventoryStore>;
pub type Notifier = Arc<dyn NotificationChannel>;
pub type Watch = StockWatch<Store, Store>;
pub type Orchestrator = RefreshOrchestrator<Store, Store, Notifier>;

/// Everything the HTTP handlers need, built once per process.
pub struct AppServices {
    store: Store,
    watch: Arc<Watch>,
    dashboards: StockDashboardProjector<Store>,
    orchestrator: Arc<Orchestrator>,
    runner: Option<RefreshRunnerHandle>,
}

impl AppServices {
    /// Wire the engine against `store`. Fails fast on an invalid policy.
    pub fn new(
        store: Store,
        policy: ForecastPolicy,
        refresh: &RefreshConfig,
        notifier: Notifier,
    ) -> DomainResult<Self> {
        let top_n = policy.top_consumed;
        let watch = Arc::new(StockWatch::new(policy, Arc::clone(&store), Arc::clone(&store))?);
        let orchestrator = Arc::new(RefreshOrchestrator::new(
            Arc::clone(&watch),
            notifier,
            refresh.orchestrator(),
        ));
        Ok(Self {
            dashboards: StockDashboardProjector::new(Arc::clone(&store), top_n),
            store,
            watch,
            orchestrator,
            runner: None,
        })
    }

    /// In-memory wiring with the tracing channel and default refresh settings.
    pub fn in_memory(store: Store, policy: ForecastPolicy) -> DomainResult<Self> {
        Self::new(
            store,
            policy,
            &RefreshConfig::default(),
            Arc::new(TracingNotificationChannel::new()),
        )
    }

    /// Start the scheduled refresh; it runs once immediately.
    pub fn start_runner(&mut self, refresh: &RefreshConfig) -> std::io::Result<()> {
        let handle = refresh.runner().spawn(Arc::clone(&self.orchestrator))?;
        self.runner = Some(handle);
        Ok(())
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn watch(&self) -> &Watch {
        &self.watch
    }

    pub fn dashboards(&self) -> &StockDashboardProjector<Store> {
        &self.dashboards
    }

    /// Queue a scheduled-runner pass. `false` when no runner is running.
    pub fn trigger_refresh(&self) -> bool {
        match &self.runner {
            Some(runner) => {
                runner.trigger();
                true
            }
            None => false,
        }
    }

    /// Blocking refresh, for callers that want the report back.
    pub fn refresh_now(
        &self,
        school: Option<TenantId>,
        now: DateTime<Utc>,
    ) -> DomainResult<RefreshReport> {
        let scope = school.map_or(TenantScope::Any, TenantScope::Tenant);
        self.orchestrator.run_at(scope, now, &CancellationToken::new())
    }

    pub fn last_refresh(&self) -> Option<RefreshReport> {
        self.runner.as_ref().and_then(RefreshRunnerHandle::last_report)
    }

    pub fn shutdown(&self) {
        if let Some(runner) = &self.runner {
            runner.shutdown();
        }
    }
}
