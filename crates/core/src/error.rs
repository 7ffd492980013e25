//! Error taxonomy shared by the engine, the infrastructure and the API.

use thiserror::Error;

/// Result type used across the stock watchdog.
pub type DomainResult<T> = Result<T, DomainError>;

/// Stock-watchdog error.
///
/// Per-item kinds (`NotFound`, `InvalidCategory`) are recoverable at the
/// orchestrator's item boundary. `Configuration` is fatal at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Tenant, item or record is missing (or belongs to another tenant).
    #[error("not found: {0}")]
    NotFound(String),

    /// Category value not recognised, or absent from the policy table.
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    /// Tenant-scope violation, raised by the access-control boundary.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Retryable failure of a downstream collaborator (notification, store).
    #[error("transient failure: {0}")]
    TransientFailure(String),

    /// Missing or inconsistent policy table. Deployment defect.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A caller-supplied value failed validation.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_category(msg: impl Into<String>) -> Self {
        Self::InvalidCategory(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn transient(msg: impl Into<String>) -> Self {
        Self::TransientFailure(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable machine-readable code (used in logs and API bodies).
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "not_found",
            DomainError::InvalidCategory(_) => "invalid_category",
            DomainError::Forbidden(_) => "forbidden",
            DomainError::TransientFailure(_) => "transient_failure",
            DomainError::Configuration(_) => "configuration_error",
            DomainError::Validation(_) => "validation_error",
        }
    }

    /// Whether the orchestrator may skip the failing item and continue.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            DomainError::NotFound(_) | DomainError::InvalidCategory(_) | DomainError::Validation(_)
        )
    }
}
