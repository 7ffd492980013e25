//! School-scoped stock routes: `recomputeItem`, `getDashboard`, `listAlerts`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use tracing::info;

use carestock_auth::StockAction;
use carestock_core::{ItemId, TenantId};

use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/items/:item_id/recompute", post(recompute_item))
        .route("/dashboard", get(get_dashboard))
        .route("/alerts", get(list_alerts))
}

pub async fn recompute_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((school_id, item_id)): Path<(String, String)>,
) -> axum::response::Response {
    let school_id: TenantId = match errors::parse_id(&school_id, "school") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let item_id: ItemId = match errors::parse_id(&item_id, "item") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Err(e) = authz::require_school(&principal, school_id, StockAction::RecomputeItem) {
        return errors::authz_error_to_response(e);
    }

    match services.watch().recompute_item(school_id, item_id, Utc::now()) {
        Ok(prediction) => {
            info!(
                principal = %principal.principal_id(),
                tenant = %school_id,
                item = %item_id,
                urgency = %prediction.urgency,
                "on-demand recompute"
            );
            Json(prediction).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(school_id): Path<String>,
) -> axum::response::Response {
    let school_id: TenantId = match errors::parse_id(&school_id, "school") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Err(e) = authz::require_school(&principal, school_id, StockAction::ReadStock) {
        return errors::authz_error_to_response(e);
    }

    match services.dashboards().dashboard(school_id, Utc::now()) {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_alerts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(school_id): Path<String>,
) -> axum::response::Response {
    let school_id: TenantId = match errors::parse_id(&school_id, "school") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if let Err(e) = authz::require_school(&principal, school_id, StockAction::ReadStock) {
        return errors::authz_error_to_response(e);
    }

    match services.watch().list_alerts(school_id, Utc::now()) {
        Ok(batch) => Json(batch).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
