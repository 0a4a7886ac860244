//! Finding severity and remediation status.

use super::ParseFindingValueError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity assigned to a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FindingSeverity {
    /// Cosmetic or informational.
    Low,
    /// Should be fixed before the next validation.
    Medium,
    /// Limits use of the model until fixed.
    High,
    /// Blocks use of the model.
    Critical,
}

impl FindingSeverity {
    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for FindingSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FindingSeverity {
    type Error = ParseFindingValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseFindingValueError::new("finding severity", value)),
        }
    }
}

/// Remediation progress of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemediationStatus {
    /// Awaiting remediation.
    Open,
    /// Remediated by the model owner. Terminal.
    Remediated,
}

impl RemediationStatus {
    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Remediated => "Remediated",
        }
    }
}

impl fmt::Display for RemediationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RemediationStatus {
    type Error = ParseFindingValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "remediated" => Ok(Self::Remediated),
            _ => Err(ParseFindingValueError::new("remediation status", value)),
        }
    }
}
