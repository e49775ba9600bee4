pub mod common;

mod atomic_file_propogation;
mod trust_store;
