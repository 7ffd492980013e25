//! Operator routes for the stock refresh.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{info, warn};

use carestock_auth::StockAction;

use crate::app::dto::{RefreshRequest, RefreshResponse};
use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

/// Queue a runner pass, or run inline with `?wait=true` (also the fallback
/// when no runner is running, and for single-school runs).
pub async fn trigger_refresh(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(req): Query<RefreshRequest>,
) -> axum::response::Response {
    if let Err(e) = authz::require_network(&principal, StockAction::TriggerRefresh) {
        return errors::authz_error_to_response(e);
    }

    if !req.wait && req.school_id.is_none() && services.trigger_refresh() {
        info!(principal = %principal.principal_id(), "stock refresh triggered");
        return (StatusCode::ACCEPTED, Json(RefreshResponse::Triggered)).into_response();
    }

    let school = req.school_id;
    let run = tokio::task::spawn_blocking(move || services.refresh_now(school, Utc::now())).await;
    match run {
        Ok(Ok(report)) => Json(RefreshResponse::Finished { report }).into_response(),
        Ok(Err(e)) => errors::domain_error_to_response(e),
        Err(e) => {
            warn!(error = %e, "refresh task failed");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "refresh_failed", e.to_string())
        }
    }
}

/// Report of the runner's most recent pass.
pub async fn last_refresh(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_network(&principal, StockAction::TriggerRefresh) {
        return errors::authz_error_to_response(e);
    }

    match services.last_refresh() {
        Some(report) => Json(report).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "no refresh has finished yet"),
    }
}
