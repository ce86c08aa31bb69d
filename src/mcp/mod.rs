// Simple mod.rs to expose the protocol and handler modules
pub mod handler;
pub mod protocol;
