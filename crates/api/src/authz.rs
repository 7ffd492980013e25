//! API-side school-scope guard.
//!
//! Checked before any handler reaches the engine; the engine itself trusts
//! the tenant id it is given.

use tracing::warn;

use carestock_auth::{AuthzError, StockAction, authorize_network, authorize_school};
use carestock_core::TenantId;

use crate::context::PrincipalContext;

pub fn require_school(
    principal: &PrincipalContext,
    school_id: TenantId,
    action: StockAction,
) -> Result<(), AuthzError> {
    authorize_school(principal.principal(), school_id, action).inspect_err(|e| {
        warn!(
            principal = %principal.principal_id(),
            tenant = %school_id,
            action = action.as_str(),
            error = %e,
            "school access denied"
        );
    })
}

pub fn require_network(principal: &PrincipalContext, action: StockAction) -> Result<(), AuthzError> {
    authorize_network(principal.principal(), action).inspect_err(|e| {
        warn!(
            principal = %principal.principal_id(),
            action = action.as_str(),
            error = %e,
            "network access denied"
        );
    })
}
