//! # Token Renewer Library
//!
//! Renews an access/refresh token pair against an identity endpoint and
//! writes the current access token to a file.
//!
//! Modules:
//! - `token`: token source reader and the renewal `TokenRecord`
//! - `tls`: trust store from a directory of PEM files, CA bootstrap
//! - `sources`: renewal client and the renewal loop
//! - `sinks`: output file persistence
//! - `config`: CLI flags, YAML file, validation

pub mod config;
pub mod token;
pub mod tls;
pub mod sources;
pub mod sinks;
pub mod observability;
pub mod server;
pub mod helpers;
pub mod utils;
#[cfg(test)]
mod tests;


pub use crate::sources::renew::Renewer;
pub use crate::tls::trust_store::TrustMode;
pub use crate::token::reader::read_token;
pub use crate::token::record::TokenRecord;
