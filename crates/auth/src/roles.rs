use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role of a principal within the school network.
///
/// Network roles act across every school; unit roles are bound to the
/// school named in their token.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchoolRole {
    NetworkAdmin,
    NetworkNutritionist,
    NetworkPsychologist,
    UnitDirector,
    UnitSecretary,
    Teacher,
}

impl SchoolRole {
    /// Hierarchy level; higher includes the capabilities of lower.
    pub fn level(&self) -> u8 {
        match self {
            SchoolRole::NetworkAdmin => 100,
            SchoolRole::NetworkNutritionist | SchoolRole::NetworkPsychologist => 90,
            SchoolRole::UnitDirector => 50,
            SchoolRole::UnitSecretary => 30,
            SchoolRole::Teacher => 10,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(
            self,
            SchoolRole::NetworkAdmin | SchoolRole::NetworkNutritionist | SchoolRole::NetworkPsychologist
        )
    }

    pub fn at_least(&self, other: SchoolRole) -> bool {
        self.level() >= other.level()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolRole::NetworkAdmin => "NETWORK_ADMIN",
            SchoolRole::NetworkNutritionist => "NETWORK_NUTRITIONIST",
            SchoolRole::NetworkPsychologist => "NETWORK_PSYCHOLOGIST",
            SchoolRole::UnitDirector => "UNIT_DIRECTOR",
            SchoolRole::UnitSecretary => "UNIT_SECRETARY",
            SchoolRole::Teacher => "TEACHER",
        }
    }
}

impl core::fmt::Display for SchoolRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchoolRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NETWORK_ADMIN" => Ok(SchoolRole::NetworkAdmin),
            "NETWORK_NUTRITIONIST" => Ok(SchoolRole::NetworkNutritionist),
            "NETWORK_PSYCHOLOGIST" => Ok(SchoolRole::NetworkPsychologist),
            "UNIT_DIRECTOR" => Ok(SchoolRole::UnitDirector),
            "UNIT_SECRETARY" => Ok(SchoolRole::UnitSecretary),
            "TEACHER" => Ok(SchoolRole::Teacher),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}
