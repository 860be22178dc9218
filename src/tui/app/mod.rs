//! App Module: TUI application state and logic.

mod actions;
mod input;
mod state;


pub use input::{Field, fields_for};
pub use state::*;

pub(crate) use super::events;
