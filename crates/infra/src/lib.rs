//! Infrastructure layer: in-memory stores, notification channels, the
//! refresh pipeline and environment configuration.

pub mod config;
pub mod notify;
pub mod projections;
pub mod read_model;
pub mod refresh;
pub mod seed;
