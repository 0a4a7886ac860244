//! Sources that load reference configuration.

use super::{
    ArtifactRequirement, ComplianceRule, ReferenceConfig, ReferenceConfigError,
    ValidationSettings,
};
use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// File holding compliance rules.
pub const RULES_FILE: &str = "rules.json";
/// File holding artifact requirements.
pub const ARTIFACTS_FILE: &str = "artifacts.json";
/// File holding validation cadence settings.
pub const VALIDATION_FILE: &str = "validation.json";

/// Provider of validated reference configuration.
#[async_trait]
pub trait ReferenceConfigSource: Send + Sync {
    /// Loads and validates the configuration.
    async fn load(&self) -> Result<ReferenceConfig, ReferenceConfigError>;
}

/// Reads the three JSON files from a directory on every load, so edits are
/// picked up without a restart.
#[derive(Debug, Clone)]
pub struct DirectoryReferenceSource {
    dir: Arc<Dir>,
}

impl DirectoryReferenceSource {
    /// Opens the configuration directory.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceConfigError::OpenDirectory`] when the directory
    /// cannot be opened.
    pub fn open(path: &Utf8Path) -> Result<Self, ReferenceConfigError> {
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(|source| {
            ReferenceConfigError::OpenDirectory {
                path: path.to_string(),
                source: Arc::new(source),
            }
        })?;
        Ok(Self::from_dir(dir))
    }

    /// Wraps an already-open directory.
    #[must_use]
    pub fn from_dir(dir: Dir) -> Self {
        Self { dir: Arc::new(dir) }
    }
}

#[async_trait]
impl ReferenceConfigSource for DirectoryReferenceSource {
    async fn load(&self) -> Result<ReferenceConfig, ReferenceConfigError> {
        let dir = Arc::clone(&self.dir);
        let config = tokio::task::spawn_blocking(move || load_from_dir(&dir))
            .await
            .map_err(|err| ReferenceConfigError::Task(err.to_string()))??;
        config.validate()?;
        tracing::debug!(
            rules = config.rules.len(),
            artifacts = config.artifacts.len(),
            "reference configuration loaded"
        );
        Ok(config)
    }
}

/// Serves a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticReferenceSource {
    config: ReferenceConfig,
}

impl StaticReferenceSource {
    /// Wraps `config`; it is validated on every load.
    #[must_use]
    pub const fn new(config: ReferenceConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ReferenceConfigSource for StaticReferenceSource {
    async fn load(&self) -> Result<ReferenceConfig, ReferenceConfigError> {
        self.config.validate()?;
        Ok(self.config.clone())
    }
}

fn load_from_dir(dir: &Dir) -> Result<ReferenceConfig, ReferenceConfigError> {
    let rules: Vec<ComplianceRule> = read_json(dir, RULES_FILE)?;
    let artifacts: Vec<ArtifactRequirement> = read_json(dir, ARTIFACTS_FILE)?;
    let validation: ValidationSettings = read_json(dir, VALIDATION_FILE)?;
    let last_updated = [RULES_FILE, ARTIFACTS_FILE, VALIDATION_FILE]
        .into_iter()
        .filter_map(|file| modified_at(dir, file))
        .max();
    Ok(ReferenceConfig {
        rules,
        artifacts,
        validation,
        last_updated,
    })
}

fn read_json<T: DeserializeOwned>(dir: &Dir, file: &'static str) -> Result<T, ReferenceConfigError> {
    let raw = dir
        .read_to_string(file)
        .map_err(|source| ReferenceConfigError::Read {
            file,
            source: Arc::new(source),
        })?;
    serde_json::from_str(&raw).map_err(|source| ReferenceConfigError::Parse {
        file,
        source: Arc::new(source),
    })
}

fn modified_at(dir: &Dir, file: &str) -> Option<DateTime<Utc>> {
    let modified = dir.metadata(file).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified.into_std()))
}
