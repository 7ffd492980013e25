use axum::{Json, extract::Extension, http::StatusCode};

use crate::app::dto::WhoAmIResponse;
use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        principal_id: principal.principal_id(),
        role: principal.role(),
        school_id: principal.school_id(),
        network: principal.role().is_network(),
    })
}
