//! Core types: errors, configuration, the built-in cleanup table, path helpers.

pub mod config;
pub mod defaults;
pub mod errors;
pub mod paths;
