//! Configuration management for Power BI actions
//!
//! This crate locates the per-environment JSON configuration file, resolves
//! the block for the requested environment and validates the keys the
//! actions depend on. Credentials are modelled here as well.

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod validation;

pub use credentials::*;
pub use loader::ConfigResolver;
pub use schema::*;
pub use validation::*;
