//! Environment configuration for the refresh pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use carestock_core::DomainError;
use carestock_forecast::ForecastPolicy;

use crate::refresh::{DispatchRetry, OrchestratorConfig, RefreshRunner};

pub const POLICY_PATH_VAR: &str = "CARESTOCK_POLICY_PATH";
pub const REFRESH_INTERVAL_VAR: &str = "CARESTOCK_REFRESH_INTERVAL_SECS";
pub const WORKERS_VAR: &str = "CARESTOCK_WORKERS";
pub const TENANT_TIMEOUT_VAR: &str = "CARESTOCK_TENANT_TIMEOUT_SECS";
pub const DISPATCH_ATTEMPTS_VAR: &str = "CARESTOCK_DISPATCH_ATTEMPTS";
pub const DISPATCH_BACKOFF_VAR: &str = "CARESTOCK_DISPATCH_BACKOFF_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read policy file {path}: {source}")]
    PolicyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Policy(#[from] DomainError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    pub policy_path: Option<PathBuf>,
    pub interval: Duration,
    pub workers: usize,
    pub tenant_soft_timeout: Duration,
    pub dispatch_attempts: u32,
    pub dispatch_backoff: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            policy_path: None,
            interval: Duration::from_secs(86_400),
            workers: 4,
            tenant_soft_timeout: Duration::from_secs(300),
            dispatch_attempts: 3,
            dispatch_backoff: Duration::from_millis(500),
        }
    }
}

impl RefreshConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let policy_path = lookup(POLICY_PATH_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let interval_secs = parse_positive(&lookup, REFRESH_INTERVAL_VAR, defaults.interval.as_secs())?;
        let workers = parse_positive(&lookup, WORKERS_VAR, defaults.workers as u64)?;
        let timeout_secs =
            parse_positive(&lookup, TENANT_TIMEOUT_VAR, defaults.tenant_soft_timeout.as_secs())?;
        let attempts = parse_positive(&lookup, DISPATCH_ATTEMPTS_VAR, u64::from(defaults.dispatch_attempts))?;
        let backoff_ms = parse_u64(&lookup, DISPATCH_BACKOFF_VAR, defaults.dispatch_backoff.as_millis() as u64)?;

        Ok(Self {
            policy_path,
            interval: Duration::from_secs(interval_secs),
            workers: usize::try_from(workers).unwrap_or(usize::MAX),
            tenant_soft_timeout: Duration::from_secs(timeout_secs),
            dispatch_attempts: u32::try_from(attempts).unwrap_or(u32::MAX),
            dispatch_backoff: Duration::from_millis(backoff_ms),
        })
    }

    /// The configured policy file, or the built-in canonical table.
    pub fn load_policy(&self) -> Result<ForecastPolicy, ConfigError> {
        let policy = match &self.policy_path {
            Some(path) => load_policy_file(path)?,
            None => ForecastPolicy::canonical(),
        };
        if !self.re_alert_outlasts_cadence(&policy) {
            warn!(
                re_alert_interval_hours = policy.re_alert_interval_hours,
                refresh_interval_secs = self.interval.as_secs(),
                "re-alert interval does not exceed the refresh cadence; unchanged alerts will repeat every run"
            );
        }
        Ok(policy)
    }

    /// Whether an unchanged alert survives at least one scheduled run unsent.
    pub fn re_alert_outlasts_cadence(&self, policy: &ForecastPolicy) -> bool {
        policy
            .re_alert_interval()
            .to_std()
            .is_ok_and(|re_alert| re_alert > self.interval)
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            workers: self.workers,
            tenant_soft_timeout: self.tenant_soft_timeout,
            dispatch_retry: DispatchRetry::new(self.dispatch_attempts, self.dispatch_backoff),
        }
    }

    pub fn runner(&self) -> RefreshRunner {
        RefreshRunner {
            interval: self.interval,
            ..RefreshRunner::default()
        }
    }
}

pub fn load_policy_file(path: &Path) -> Result<ForecastPolicy, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::PolicyFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ForecastPolicy::from_json(&raw)?)
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn parse_positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    let value = parse_u64(lookup, var, default)?;
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            var,
            value: "0".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = RefreshConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, RefreshConfig::default());
        assert_eq!(cfg.load_policy().unwrap(), ForecastPolicy::canonical());
    }

    #[test]
    fn default_policy_does_not_repeat_alerts_every_daily_run() {
        let cfg = RefreshConfig::default();
        assert!(cfg.re_alert_outlasts_cadence(&cfg.load_policy().unwrap()));

        let mut policy = ForecastPolicy::canonical();
        policy.re_alert_interval_hours = 24;
        assert!(!cfg.re_alert_outlasts_cadence(&policy));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = RefreshConfig::from_lookup(lookup(&[
            (REFRESH_INTERVAL_VAR, "3600"),
            (WORKERS_VAR, "8"),
            (DISPATCH_ATTEMPTS_VAR, "5"),
            (DISPATCH_BACKOFF_VAR, "0"),
        ]))
        .unwrap();

        assert_eq!(cfg.interval, Duration::from_secs(3600));
        assert_eq!(cfg.workers, 8);
        let orchestrator = cfg.orchestrator();
        assert_eq!(orchestrator.dispatch_retry.attempts, 5);
        assert_eq!(orchestrator.dispatch_retry.first_backoff, Duration::ZERO);
    }

    #[test]
    fn zero_and_garbage_are_rejected() {
        let err = RefreshConfig::from_lookup(lookup(&[(WORKERS_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: WORKERS_VAR, .. }));

        let err = RefreshConfig::from_lookup(lookup(&[(REFRESH_INTERVAL_VAR, "daily")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn missing_policy_file_is_reported() {
        let cfg = RefreshConfig::from_lookup(lookup(&[(POLICY_PATH_VAR, "/nonexistent/policy.json")]))
            .unwrap();
        assert!(matches!(cfg.load_policy(), Err(ConfigError::PolicyFile { .. })));
    }
}
