//! Adapter implementations for finding ports.

pub mod memory;
pub mod postgres;
