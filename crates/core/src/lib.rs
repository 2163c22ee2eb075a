//! Core business logic for asamblea-rs.

pub mod services;

pub use services::*;
