//! Client for the Power BI management actions
//!
//! A [`PowerBiSession`] resolves the configuration of one environment,
//! checks the service principal credentials and exposes the report, dataset
//! and gateway actions. The actions do not reach the service yet; they
//! report what they would do and return fixed results.

pub mod actions;
pub mod session;

#[cfg(test)]
mod test_support;

pub use session::*;
