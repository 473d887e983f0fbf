//! Navigation module - drill-down scenes and history

mod navigator;
mod state;

pub use navigator::{NavError, Navigator};
pub use state::Scene;
