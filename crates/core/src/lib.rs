//! `carestock-core`: shared building blocks for the stock watchdog.
//!
//! This crate contains **pure** primitives (no infrastructure concerns):
//! typed identifiers and the error taxonomy every other crate speaks.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{ItemId, RecordId, RunId, TenantId};
