//! Reference data served to the dashboard and its validation rules.

use super::ReferenceConfigError;
use crate::use_case::domain::RiskTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Compliance rule applied to use cases of a risk tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRule {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Longer explanation.
    #[serde(default)]
    pub description: String,
    /// Tier the rule applies to.
    pub tier: RiskTier,
    /// Checklist criteria.
    #[serde(default)]
    pub criteria: Vec<String>,
}

/// Artifact a model owner must provide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRequirement {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Longer explanation.
    #[serde(default)]
    pub description: String,
    /// Tiers that require the artifact.
    #[serde(default)]
    pub required_for: Vec<RiskTier>,
}

/// Validation cadence settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSettings {
    /// Months between validations, per tier.
    pub frequency_months: BTreeMap<RiskTier, u32>,
    /// Days before the due date at which a validation counts as upcoming.
    pub upcoming_window_days: u32,
}

/// Reference configuration as served by `GET /config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceConfig {
    /// Compliance rules.
    pub rules: Vec<ComplianceRule>,
    /// Required artifacts.
    pub artifacts: Vec<ArtifactRequirement>,
    /// Validation cadence.
    pub validation: ValidationSettings,
    /// Newest modification time of the source files, when known.
    pub last_updated: Option<DateTime<Utc>>,
}

impl ReferenceConfig {
    /// Checks identifiers, names and cadence values.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReferenceConfigError`] found: an empty or
    /// duplicate id, an empty name, a zero frequency, or a zero window.
    pub fn validate(&self) -> Result<(), ReferenceConfigError> {
        check_entries(
            "rules",
            self.rules.iter().map(|rule| (rule.id.as_str(), rule.name.as_str())),
        )?;
        check_entries(
            "artifacts",
            self.artifacts
                .iter()
                .map(|artifact| (artifact.id.as_str(), artifact.name.as_str())),
        )?;
        if let Some((tier, _)) = self
            .validation
            .frequency_months
            .iter()
            .find(|(_, months)| **months == 0)
        {
            return Err(ReferenceConfigError::InvalidFrequency { tier: *tier });
        }
        if self.validation.upcoming_window_days == 0 {
            return Err(ReferenceConfigError::InvalidUpcomingWindow);
        }
        Ok(())
    }
}

fn check_entries<'a>(
    list: &'static str,
    entries: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<(), ReferenceConfigError> {
    let mut seen = HashSet::new();
    for (id, name) in entries {
        if id.trim().is_empty() {
            return Err(ReferenceConfigError::EmptyId { list });
        }
        if name.trim().is_empty() {
            return Err(ReferenceConfigError::EmptyName {
                list,
                id: id.to_owned(),
            });
        }
        if !seen.insert(id) {
            return Err(ReferenceConfigError::DuplicateId {
                list,
                id: id.to_owned(),
            });
        }
    }
    Ok(())
}
