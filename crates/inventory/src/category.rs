use core::str::FromStr;

use serde::{Deserialize, Serialize};

use carestock_core::DomainError;

/// Supply category.
///
/// `DignityCritical` covers consumables whose absence is a safety or dignity
/// issue (diapers, formula) and is forecast against a stricter threshold table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    DignityCritical,
    Hygiene,
    Food,
    Pedagogical,
    Cleaning,
    Medicine,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::DignityCritical,
        Category::Hygiene,
        Category::Food,
        Category::Pedagogical,
        Category::Cleaning,
        Category::Medicine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::DignityCritical => "DIGNITY_CRITICAL",
            Category::Hygiene => "HYGIENE",
            Category::Food => "FOOD",
            Category::Pedagogical => "PEDAGOGICAL",
            Category::Cleaning => "CLEANING",
            Category::Medicine => "MEDICINE",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::invalid_category(wanted.to_string()))
    }
}
