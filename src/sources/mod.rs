//! Sources module
//!
//! The renewal client and the loop that chains renewals together.

pub mod executor;
pub mod renew;
