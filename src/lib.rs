//! Modelgate: AI use-case governance and model-risk workflow.
//!
//! Model owners submit proposed AI use cases; a model risk manager records
//! a risk tier and approves them or sends them back. Model validations raise
//! findings that owners remediate exactly once. Files can be attached to use
//! cases, and reference configuration (compliance rules, required artifacts,
//! validation cadence) is served read-only.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic and guards with no infrastructure
//! - **Ports**: Abstract trait interfaces for persistence and storage
//! - **Adapters**: In-memory, `PostgreSQL` and filesystem implementations
//! - **Services**: Orchestration that loads, guards and commits
//!
//! # Modules
//!
//! - [`use_case`]: Use-case submission, review lifecycle and audit trail
//! - [`finding`]: Validation findings and one-time remediation
//! - [`attachment`]: File validation and attachment storage
//! - [`presentation`]: Status labels, colours and icons
//! - [`reference`]: Reference configuration loading
//! - [`identity`]: Acting identity for state-changing operations
//! - [`config`]: Environment-driven server configuration
//! - [`http`]: JSON-over-HTTP surface

pub mod attachment;
pub mod config;
pub mod finding;
pub mod http;
pub mod identity;
pub mod presentation;
pub mod reference;
pub mod use_case;
