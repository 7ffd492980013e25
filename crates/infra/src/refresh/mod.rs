//! Scheduled and on-demand stock refresh.

mod cancel;
mod orchestrator;
mod report;
mod retry;
mod runner;

pub use cancel::CancellationToken;
pub use orchestrator::{OrchestratorConfig, RefreshOrchestrator};
pub use report::{Delivery, ItemFailure, RefreshReport, RunOutcome, RunPhase, TenantReport};
pub use retry::DispatchRetry;
pub use runner::{RefreshRunner, RefreshRunnerHandle};
