// src/registry/mod.rs

pub mod abi;
pub mod encoder;
pub mod models;
pub mod reader;

// Re-export the types the rest of the crate works with
pub use models::{Delegation, DelegationType, UnsignedTransaction};
pub use reader::RegistryClient;
