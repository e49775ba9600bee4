pub mod bootstrap;
pub mod trust_store;
