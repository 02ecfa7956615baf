//! Core primitives: positions, configuration, errors.

pub mod config;
pub mod error;
pub mod types;
