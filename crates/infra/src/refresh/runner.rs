use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use carestock_forecast::{ConsumptionHistory, NotificationChannel, TenantRegistry};

use super::cancel::CancellationToken;
use super::orchestrator::RefreshOrchestrator;
use super::report::RefreshReport;

/// Config for the scheduled stock refresh.
#[derive(Debug, Clone)]
pub struct RefreshRunner {
    /// Cadence between scheduled runs (daily in production).
    pub interval: Duration,
    /// Retries after a run that failed outright (e.g. the tenant listing).
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for RefreshRunner {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(24 * 60 * 60),
            max_retries: 5,
            base_backoff: Duration::from_millis(250),
        }
    }
}

/// Handle for the running refresh thread (trigger, shutdown, last report).
#[derive(Debug)]
pub struct RefreshRunnerHandle {
    shutdown: mpsc::Sender<()>,
    trigger: mpsc::SyncSender<()>,
    cancel: CancellationToken,
    state: Arc<RunnerState>,
    join: Mutex<Option<thread::JoinHandle<()>>>,
}

#[derive(Debug, Default)]
struct RunnerState {
    last_report: Mutex<Option<RefreshReport>>,
    runs: AtomicU64,
}

impl RefreshRunnerHandle {
    /// Request a run as soon as possible.
    ///
    /// Triggers are coalesced: while a run is already pending this is a no-op.
    pub fn trigger(&self) {
        let _ = self.trigger.try_send(());
    }

    /// Report of the most recent finished run.
    pub fn last_report(&self) -> Option<RefreshReport> {
        self.state.last_report.lock().ok().and_then(|r| r.clone())
    }

    /// Runs finished since spawn (failed ones excluded).
    pub fn runs_completed(&self) -> u64 {
        self.state.runs.load(Ordering::SeqCst)
    }

    /// Stop the runner. A run in progress stops at the next tenant boundary.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        let _ = self.shutdown.send(());
        let join = self.join.lock().ok().and_then(|mut j| j.take());
        if let Some(j) = join {
            let _ = j.join();
        }
    }
}

impl RefreshRunner {
    /// Spawn the scheduled refresh.
    ///
    /// - Schedule: runs once on startup, then every `interval`
    /// - On demand: `handle.trigger()`
    /// - Failures: logged + retried with bounded exponential backoff; never propagate
    pub fn spawn<R, H, N>(
        &self,
        orchestrator: Arc<RefreshOrchestrator<R, H, N>>,
    ) -> io::Result<RefreshRunnerHandle>
    where
        R: TenantRegistry + 'static,
        H: ConsumptionHistory + 'static,
        N: NotificationChannel + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let (trigger_tx, trigger_rx) = mpsc::sync_channel::<()>(1);
        let cancel = CancellationToken::new();
        let state = Arc::new(RunnerState::default());

        let cfg = self.clone();
        let loop_cancel = cancel.clone();
        let loop_state = Arc::clone(&state);
        let join = thread::Builder::new()
            .name("stock-refresh".to_string())
            .spawn(move || {
                runner_loop(cfg, shutdown_rx, trigger_rx, loop_cancel, loop_state, orchestrator)
            })?;

        Ok(RefreshRunnerHandle {
            shutdown: shutdown_tx,
            trigger: trigger_tx,
            cancel,
            state,
            join: Mutex::new(Some(join)),
        })
    }
}

fn runner_loop<R, H, N>(
    cfg: RefreshRunner,
    shutdown_rx: mpsc::Receiver<()>,
    trigger_rx: mpsc::Receiver<()>,
    cancel: CancellationToken,
    state: Arc<RunnerState>,
    orchestrator: Arc<RefreshOrchestrator<R, H, N>>,
) where
    R: TenantRegistry,
    H: ConsumptionHistory,
    N: NotificationChannel,
{
    info!(interval_secs = cfg.interval.as_secs(), "stock refresh runner started");

    let mut next_tick = Instant::now() + cfg.interval;
    let mut pending = true; // run once on startup
    let mut failures: u32 = 0;
    let mut backoff_until: Option<Instant> = None;

    loop {
        // Shutdown has priority.
        if shutdown_rx.try_recv().is_ok() || cancel.is_cancelled() {
            break;
        }

        let now = Instant::now();
        if now >= next_tick {
            pending = true;
            // Keep a stable cadence even if we were delayed.
            while next_tick <= now {
                next_tick += cfg.interval;
            }
        }

        while trigger_rx.try_recv().is_ok() {
            pending = true;
        }

        if let Some(until) = backoff_until {
            if Instant::now() < until {
                thread::sleep(Duration::from_millis(50));
                continue;
            }
            backoff_until = None;
        }

        if !pending {
            let sleep_for = next_tick
                .saturating_duration_since(Instant::now())
                .min(Duration::from_millis(250));
            thread::sleep(sleep_for);
            continue;
        }

        pending = false;

        match orchestrator.run(&cancel) {
            Ok(report) => {
                failures = 0;
                state.runs.fetch_add(1, Ordering::SeqCst);
                if let Ok(mut last) = state.last_report.lock() {
                    *last = Some(report);
                }
            }
            Err(e) => {
                warn!(error = %e, code = e.code(), "stock refresh run failed");
                failures += 1;
                if failures <= cfg.max_retries {
                    pending = true;
                    backoff_until = Some(Instant::now() + backoff(cfg.base_backoff, failures));
                } else {
                    failures = 0;
                }
            }
        }
    }

    info!("stock refresh runner stopped");
}

fn backoff(base: Duration, attempt: u32) -> Duration {
    // base * 2^(attempt-1), capped at 10s.
    let pow = 1u32 << attempt.saturating_sub(1).min(10);
    let ms = base.as_millis().saturating_mul(u128::from(pow));
    Duration::from_millis(ms.min(10_000) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let base = Duration::from_millis(250);
        assert_eq!(backoff(base, 1), Duration::from_millis(250));
        assert_eq!(backoff(base, 2), Duration::from_millis(500));
        assert_eq!(backoff(base, 3), Duration::from_millis(1000));
        assert_eq!(backoff(base, 30), Duration::from_secs(10));
    }
}
