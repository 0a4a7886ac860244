//! Validation findings and their one-time remediation.
//!
//! A model validation raises findings; the model owner remediates each one
//! exactly once. The guard lives on [`domain::ValidationFinding`] and the
//! repository repeats it as a conditional write.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
