//! Use-case submission, review and approval.
//!
//! A use case is a proposed AI/model use that a reviewer approves or sends
//! back. The lifecycle guard in [`domain`] decides which review actions are
//! legal; [`services`] load the use case, run the guard, and commit the new
//! state together with its audit event through the [`ports`] repository.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
