//! Configuration Module
//!
//! Handles configuration loading, validation, and secret handling.

pub mod secrets;
mod types;

pub use secrets::SecretString;
pub use types::*;
