use carestock_auth::{Principal, PrincipalId, SchoolRole};
use carestock_core::TenantId;

/// Principal context for a request (authenticated identity, role, school).
///
/// Immutable; present on every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal.principal_id
    }

    pub fn role(&self) -> SchoolRole {
        self.principal.role
    }

    pub fn school_id(&self) -> Option<TenantId> {
        self.principal.school_id
    }
}
