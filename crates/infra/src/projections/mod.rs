//! Read-only projections over persisted derived stock state.
//!
//! Projections never recompute: what they show is the last snapshot written
//! by a refresh or an on-demand recompute, with its timestamp.

pub mod stock_dashboard;

pub use stock_dashboard::{
    DashboardItem, DashboardView, NetworkSummary, SchoolSummary, StockDashboardProjector, UrgencyCounts,
};
