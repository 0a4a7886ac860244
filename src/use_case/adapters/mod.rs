//! Adapter implementations for use-case persistence.

pub mod memory;
pub mod postgres;
