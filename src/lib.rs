//! # Customer Token Agent Library
//!
//! Obtains a short-lived customer token from a remote issuer, caches it,
//! limits fetch attempts to one per rate-limit window and persists the
//! configuration it was derived from.
//!
//! Modules:
//! - `cache`: token cache manager and the issuer wire types
//! - `transport`: HTTP client that never fails, faults become a 400 response
//! - `storage`: key-value persistence and the configuration record layout
//! - `config`: agent settings and the customer token configuration record
//! - `server`: HTTP routes exposing `configure` and the token

pub mod cache;
pub mod config;
pub mod helpers;
pub mod observability;
pub mod server;
pub mod storage;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::cache::{CustomerTokenManager, FetchFailure};
pub use crate::config::customer_token::{ConfigureRequest, CustomerTokenConfig};
