use serde::{Deserialize, Serialize};

use carestock_core::TenantId;

/// A school (tenant). All inventory and forecast data is partitioned by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: TenantId,
    pub name: String,
    pub active: bool,
}

impl School {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TenantId::new(),
            name: name.into(),
            active: true,
        }
    }

    pub fn with_id(mut self, id: TenantId) -> Self {
        self.id = id;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
