//! Errors raised while loading reference configuration.

use crate::use_case::domain::RiskTier;
use std::sync::Arc;
use thiserror::Error;

/// Reference configuration load or validation failure.
#[derive(Debug, Clone, Error)]
pub enum ReferenceConfigError {
    /// The configuration directory could not be opened.
    #[error("failed to open reference directory {path}: {source}")]
    OpenDirectory {
        /// Directory path.
        path: String,
        /// Underlying I/O error.
        source: Arc<std::io::Error>,
    },

    /// A configuration file could not be read.
    #[error("failed to read {file}: {source}")]
    Read {
        /// File name.
        file: &'static str,
        /// Underlying I/O error.
        source: Arc<std::io::Error>,
    },

    /// A configuration file is not valid JSON for its schema.
    #[error("failed to parse {file}: {source}")]
    Parse {
        /// File name.
        file: &'static str,
        /// Underlying parse error.
        source: Arc<serde_json::Error>,
    },

    /// An entry has a blank id.
    #[error("{list} contains an entry with an empty id")]
    EmptyId {
        /// List containing the entry.
        list: &'static str,
    },

    /// An entry has a blank name.
    #[error("{list} entry '{id}' has an empty name")]
    EmptyName {
        /// List containing the entry.
        list: &'static str,
        /// Entry id.
        id: String,
    },

    /// Two entries share an id.
    #[error("{list} contains duplicate id '{id}'")]
    DuplicateId {
        /// List containing the entries.
        list: &'static str,
        /// Duplicated id.
        id: String,
    },

    /// A validation frequency is zero.
    #[error("validation frequency for {tier} tier must be greater than zero")]
    InvalidFrequency {
        /// Offending tier.
        tier: RiskTier,
    },

    /// The upcoming window is zero.
    #[error("upcomingWindowDays must be greater than zero")]
    InvalidUpcomingWindow,

    /// The blocking load task failed.
    #[error("reference load task failed: {0}")]
    Task(String),
}
