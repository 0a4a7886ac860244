//! Files attached to use cases.
//!
//! Uploads pass the [`domain::validate_file`] policy check and are written
//! through the [`ports::ObjectStore`] port under
//! `use-cases/{use_case_id}/{file_name}`.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
