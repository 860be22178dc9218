//! Chat Provider Layer
//!
//! The single outbound boundary: one completion call per user message.

pub mod error;
mod openai_compatible;
#[allow(clippy::module_inception)]
mod r#trait;
pub mod types;

pub use error::{ProviderError, Result};
pub use openai_compatible::OpenAICompatibleProvider;
pub use r#trait::CompletionProvider;
pub use types::*;
