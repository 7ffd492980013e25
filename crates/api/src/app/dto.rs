use serde::{Deserialize, Serialize};

use carestock_auth::{PrincipalId, SchoolRole};
use carestock_core::TenantId;
use carestock_infra::refresh::RefreshReport;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    /// Limit the run to one school.
    pub school_id: Option<TenantId>,
    /// Run inline and return the report instead of queueing a runner pass.
    #[serde(default)]
    pub wait: bool,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub principal_id: PrincipalId,
    pub role: SchoolRole,
    pub school_id: Option<TenantId>,
    pub network: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshResponse {
    Triggered,
    Finished { report: RefreshReport },
}
