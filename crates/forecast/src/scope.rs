use carestock_core::TenantId;

/// Tenant scope for a refresh.
///
/// - `Any`: every active tenant (the scheduled daily run).
/// - `Tenant`: only the given tenant (operator-triggered single-school refresh).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TenantScope {
    Any,
    Tenant(TenantId),
}

impl TenantScope {
    pub fn allows(&self, tenant_id: TenantId) -> bool {
        match self {
            TenantScope::Any => true,
            TenantScope::Tenant(t) => *t == tenant_id,
        }
    }
}
