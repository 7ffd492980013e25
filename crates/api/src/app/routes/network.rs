use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};
use chrono::Utc;

use carestock_auth::StockAction;

use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

/// Read-only rollup across schools. Never feeds alert dispatch.
pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = authz::require_network(&principal, StockAction::ViewNetwork) {
        return errors::authz_error_to_response(e);
    }

    match services.dashboards().network_summary(Utc::now()) {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
