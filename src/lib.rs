//! chatboat - Terminal onboarding wizard for a website chatbot
//!
//! Walks a new customer through three steps:
//!
//! - **User Registration:** credentials, then an emailed verification code
//! - **Organization Setup:** company details, description auto-fetch,
//!   detected pages, and chatbot training
//! - **Chatbot Integration:** live test chat against a chat-completion
//!   endpoint, embed instructions, and an integration check
//!
//! The wizard itself (`onboarding`) is UI-agnostic; `tui` drives it from
//! the terminal.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write ~/.chatboat/config.toml
//! chatboat init
//!
//! # Run the wizard
//! CHATBOAT_API_KEY=... chatboat
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod onboarding;
pub mod provider;
pub mod tui;

// Re-export commonly used types
pub use error::{ChatboatError, ConfigError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
