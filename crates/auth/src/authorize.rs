use serde::Serialize;
use thiserror::Error;

use carestock_core::TenantId;

use crate::{Principal, SchoolRole};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("forbidden: {0}")]
    Forbidden(String),
}

/// Operations guarded at the API boundary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockAction {
    /// Dashboard and alert reads.
    ReadStock,
    /// On-demand single-item recompute.
    RecomputeItem,
    /// Network-wide summary.
    ViewNetwork,
    /// Manual refresh trigger.
    TriggerRefresh,
}

impl StockAction {
    /// Minimum role level the action requires.
    pub fn minimum_role(&self) -> SchoolRole {
        match self {
            StockAction::ReadStock => SchoolRole::Teacher,
            StockAction::RecomputeItem => SchoolRole::UnitSecretary,
            StockAction::ViewNetwork => SchoolRole::NetworkPsychologist,
            StockAction::TriggerRefresh => SchoolRole::NetworkAdmin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockAction::ReadStock => "read_stock",
            StockAction::RecomputeItem => "recompute_item",
            StockAction::ViewNetwork => "view_network",
            StockAction::TriggerRefresh => "trigger_refresh",
        }
    }
}

/// Authorize a school-scoped action.
///
/// - No IO
/// - No panics
/// - Affiliation is checked before role level, so a foreign school always
///   reads as a tenant mismatch
pub fn authorize_school(
    principal: &Principal,
    school_id: TenantId,
    action: StockAction,
) -> Result<(), AuthzError> {
    if !principal.is_affiliated_with(school_id) {
        return Err(AuthzError::TenantMismatch);
    }
    require_level(principal, action)
}

/// Authorize an action that spans the whole network.
pub fn authorize_network(principal: &Principal, action: StockAction) -> Result<(), AuthzError> {
    if !principal.role.is_network() {
        return Err(AuthzError::Forbidden(format!(
            "{} requires a network role",
            action.as_str()
        )));
    }
    require_level(principal, action)
}

fn require_level(principal: &Principal, action: StockAction) -> Result<(), AuthzError> {
    let minimum = action.minimum_role();
    if principal.role.at_least(minimum) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(format!(
            "{} requires {} or above",
            action.as_str(),
            minimum
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrincipalId;

    fn unit(role: SchoolRole, school: TenantId) -> Principal {
        Principal::new(PrincipalId::new(), role, Some(school))
    }

    fn network(role: SchoolRole) -> Principal {
        Principal::new(PrincipalId::new(), role, None)
    }

    #[test]
    fn unit_staff_read_only_their_school() {
        let school = TenantId::new();
        let teacher = unit(SchoolRole::Teacher, school);

        assert!(authorize_school(&teacher, school, StockAction::ReadStock).is_ok());
        assert_eq!(
            authorize_school(&teacher, TenantId::new(), StockAction::ReadStock),
            Err(AuthzError::TenantMismatch)
        );
    }

    #[test]
    fn recompute_needs_secretary_or_above() {
        let school = TenantId::new();
        assert!(matches!(
            authorize_school(&unit(SchoolRole::Teacher, school), school, StockAction::RecomputeItem),
            Err(AuthzError::Forbidden(_))
        ));
        assert!(authorize_school(&unit(SchoolRole::UnitSecretary, school), school, StockAction::RecomputeItem).is_ok());
        assert!(authorize_school(&network(SchoolRole::NetworkNutritionist), school, StockAction::RecomputeItem).is_ok());
    }

    #[test]
    fn network_roles_see_every_school() {
        let nutritionist = network(SchoolRole::NetworkNutritionist);
        assert!(authorize_school(&nutritionist, TenantId::new(), StockAction::ReadStock).is_ok());
        assert!(authorize_network(&nutritionist, StockAction::ViewNetwork).is_ok());
    }

    #[test]
    fn refresh_trigger_is_admin_only() {
        assert!(authorize_network(&network(SchoolRole::NetworkAdmin), StockAction::TriggerRefresh).is_ok());
        assert!(authorize_network(&network(SchoolRole::NetworkPsychologist), StockAction::TriggerRefresh).is_err());
        let director = unit(SchoolRole::UnitDirector, TenantId::new());
        assert!(authorize_network(&director, StockAction::ViewNetwork).is_err());
    }
}
