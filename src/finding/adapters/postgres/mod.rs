//! `PostgreSQL` adapters for finding persistence.

mod models;
mod repository;
mod schema;

pub use repository::{FindingPgPool, PostgresFindingRepository};
