//! Runs the modelgate HTTP server.
//!
//! Usage:
//!
//! ```text
//! modelgate-server
//! ```
//!
//! All settings come from the environment; see [`modelgate::config`].
//! Without `DATABASE_URL` the server keeps use cases and findings in
//! memory, and without `MODELGATE_ATTACHMENT_DIR` it keeps attachments in
//! memory too. `RUST_LOG` controls log filtering.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use modelgate::attachment::adapters::{FilesystemObjectStore, InMemoryObjectStore};
use modelgate::attachment::domain::FilePolicy;
use modelgate::attachment::ports::ObjectStore;
use modelgate::config::{ConfigError, ServerConfig};
use modelgate::finding::adapters::memory::InMemoryFindingRepository;
use modelgate::finding::adapters::postgres::PostgresFindingRepository;
use modelgate::finding::ports::FindingRepository;
use modelgate::http::{AppState, build_router};
use modelgate::reference::{DirectoryReferenceSource, ReferenceConfigError};
use modelgate::use_case::adapters::memory::InMemoryUseCaseRepository;
use modelgate::use_case::adapters::postgres::PostgresUseCaseRepository;
use modelgate::use_case::ports::UseCaseRepository;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,modelgate=debug";

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build database pool: {0}")]
    Pool(#[source] diesel::r2d2::PoolError),
    #[error("failed to open attachment directory: {0}")]
    Attachments(#[source] modelgate::attachment::ports::ObjectStoreError),
    #[error("failed to open reference directory: {0}")]
    Reference(#[from] ReferenceConfigError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

type Repositories = (Arc<dyn UseCaseRepository>, Arc<dyn FindingRepository>);

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();
    run().await.map_err(|err| {
        tracing::error!(error = %err, "server stopped");
        err.into()
    })
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    let (use_cases, findings) = build_repositories(&config)?;
    let store = build_object_store(&config)?;
    let reference = DirectoryReferenceSource::open(&config.reference_dir)?;
    let policy = FilePolicy::default().with_max_bytes(config.max_upload_bytes);

    let state = AppState::new(use_cases, findings, store, Arc::new(reference), policy);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.bind_addr,
            source,
        })?;
    tracing::info!(addr = %config.bind_addr, "modelgate listening");
    axum::serve(listener, router)
        .await
        .map_err(StartupError::Serve)
}

fn build_repositories(config: &ServerConfig) -> Result<Repositories, StartupError> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; use cases and findings are kept in memory");
        return Ok((
            Arc::new(InMemoryUseCaseRepository::new()),
            Arc::new(InMemoryFindingRepository::new()),
        ));
    };
    let pool = Pool::builder()
        .max_size(config.db_pool_size)
        .build(ConnectionManager::<PgConnection>::new(url))
        .map_err(StartupError::Pool)?;
    tracing::info!(pool_size = config.db_pool_size, "connected to PostgreSQL");
    Ok((
        Arc::new(PostgresUseCaseRepository::new(pool.clone())),
        Arc::new(PostgresFindingRepository::new(pool)),
    ))
}

fn build_object_store(config: &ServerConfig) -> Result<Arc<dyn ObjectStore>, StartupError> {
    let Some(dir) = config.attachment_dir.as_deref() else {
        tracing::warn!("MODELGATE_ATTACHMENT_DIR not set; attachments are kept in memory");
        return Ok(Arc::new(InMemoryObjectStore::new()));
    };
    let store = FilesystemObjectStore::open(dir, config.public_base_url.clone())
        .map_err(StartupError::Attachments)?;
    tracing::info!(%dir, "storing attachments on disk");
    Ok(Arc::new(store))
}
