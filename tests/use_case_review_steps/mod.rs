//! Step definitions for use-case review behaviour tests.

pub mod when;
pub mod world;
