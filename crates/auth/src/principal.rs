use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use carestock_core::TenantId;

use crate::SchoolRole;

/// Identity of an authenticated principal (staff member, service account).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for PrincipalId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A fully resolved principal for authorization decisions.
///
/// `school_id` is the affiliated school; network roles may carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub role: SchoolRole,
    pub school_id: Option<TenantId>,
}

impl Principal {
    pub fn new(principal_id: PrincipalId, role: SchoolRole, school_id: Option<TenantId>) -> Self {
        Self {
            principal_id,
            role,
            school_id,
        }
    }

    pub fn is_affiliated_with(&self, school_id: TenantId) -> bool {
        self.role.is_network() || self.school_id == Some(school_id)
    }
}
