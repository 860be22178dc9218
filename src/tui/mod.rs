//! Terminal UI
//!
//! Drives the onboarding wizard from a ratatui front-end.

pub mod app;
pub mod events;
mod onboarding_render;
mod runner;

pub use app::App;
pub use events::{EventHandler, TuiEvent};
pub use runner::run;
