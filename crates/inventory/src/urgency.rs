use serde::{Deserialize, Serialize};

/// Stock-out risk classification.
///
/// Declaration order is severity order: `Ok < Low < Critical < Emergency`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    Ok,
    Low,
    Critical,
    Emergency,
}

impl Urgency {
    /// Alerting levels, most severe first.
    pub const ALERTING: [Urgency; 3] = [Urgency::Emergency, Urgency::Critical, Urgency::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Ok => "OK",
            Urgency::Low => "LOW",
            Urgency::Critical => "CRITICAL",
            Urgency::Emergency => "EMERGENCY",
        }
    }

    pub fn is_alerting(&self) -> bool {
        *self > Urgency::Ok
    }
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Ok
    }
}

impl core::fmt::Display for Urgency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated days until stock-out.
///
/// `Unbounded` is used when nothing is being consumed and stock remains; it
/// sorts after every finite value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaysRemaining {
    Days(u32),
    Unbounded,
}

impl DaysRemaining {
    pub fn days(&self) -> Option<u32> {
        match self {
            DaysRemaining::Days(d) => Some(*d),
            DaysRemaining::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, DaysRemaining::Unbounded)
    }
}

impl Default for DaysRemaining {
    fn default() -> Self {
        DaysRemaining::Unbounded
    }
}

impl core::fmt::Display for DaysRemaining {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DaysRemaining::Days(d) => write!(f, "{d}"),
            DaysRemaining::Unbounded => f.write_str("unbounded"),
        }
    }
}
