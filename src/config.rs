//! Server configuration read from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `MODELGATE_BIND_ADDR` | `0.0.0.0:8080` |
//! | `DATABASE_URL` | unset: in-memory repositories |
//! | `MODELGATE_DB_POOL_SIZE` | `10` |
//! | `MODELGATE_REFERENCE_DIR` | `config` |
//! | `MODELGATE_ATTACHMENT_DIR` | unset: in-memory object store |
//! | `MODELGATE_PUBLIC_BASE_URL` | `http://localhost:8080/files` |
//! | `MODELGATE_MAX_UPLOAD_BYTES` | `10485760` |

use crate::attachment::domain::DEFAULT_MAX_FILE_BYTES;
use camino::Utf8PathBuf;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Bind address variable.
pub const BIND_ADDR_VAR: &str = "MODELGATE_BIND_ADDR";
/// Database URL variable.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Connection pool size variable.
pub const DB_POOL_SIZE_VAR: &str = "MODELGATE_DB_POOL_SIZE";
/// Reference configuration directory variable.
pub const REFERENCE_DIR_VAR: &str = "MODELGATE_REFERENCE_DIR";
/// Attachment directory variable.
pub const ATTACHMENT_DIR_VAR: &str = "MODELGATE_ATTACHMENT_DIR";
/// Public attachment URL base variable.
pub const PUBLIC_BASE_URL_VAR: &str = "MODELGATE_PUBLIC_BASE_URL";
/// Upload size limit variable.
pub const MAX_UPLOAD_BYTES_VAR: &str = "MODELGATE_MAX_UPLOAD_BYTES";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_REFERENCE_DIR: &str = "config";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080/files";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed.
    #[error("{variable} has invalid value '{value}': {reason}")]
    Invalid {
        /// Variable name.
        variable: &'static str,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// `PostgreSQL` URL; `None` selects in-memory repositories.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: u32,
    /// Directory holding the reference JSON files.
    pub reference_dir: Utf8PathBuf,
    /// Attachment root; `None` selects the in-memory store.
    pub attachment_dir: Option<Utf8PathBuf>,
    /// Base URL joined with object keys.
    pub public_base_url: String,
    /// Upload size limit in bytes.
    pub max_upload_bytes: u64,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which returns a variable's
    /// value or `None` when unset. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_raw = read(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| invalid(BIND_ADDR_VAR, &bind_raw, err))?;

        let db_pool_size = match read(DB_POOL_SIZE_VAR) {
            Some(raw) => parse_positive(DB_POOL_SIZE_VAR, &raw)?,
            None => DEFAULT_POOL_SIZE,
        };
        let max_upload_bytes = match read(MAX_UPLOAD_BYTES_VAR) {
            Some(raw) => parse_positive(MAX_UPLOAD_BYTES_VAR, &raw)?,
            None => DEFAULT_MAX_FILE_BYTES,
        };

        Ok(Self {
            bind_addr,
            database_url: read(DATABASE_URL_VAR),
            db_pool_size,
            reference_dir: Utf8PathBuf::from(
                read(REFERENCE_DIR_VAR).unwrap_or_else(|| DEFAULT_REFERENCE_DIR.to_owned()),
            ),
            attachment_dir: read(ATTACHMENT_DIR_VAR).map(Utf8PathBuf::from),
            public_base_url: read(PUBLIC_BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_owned()),
            max_upload_bytes,
        })
    }
}

fn invalid(variable: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        variable,
        value: value.to_owned(),
        reason: reason.to_string(),
    }
}

fn parse_positive<T>(variable: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
    T::Err: ToString,
{
    let value = raw.trim().parse::<T>().map_err(|err| invalid(variable, raw, err))?;
    if value == T::default() {
        return Err(invalid(variable, raw, "must be greater than zero"));
    }
    Ok(value)
}
