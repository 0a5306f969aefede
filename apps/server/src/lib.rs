pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
mod main_lib;

pub use main_lib::{AppState, build_state, build_state_with_provider, init_tracing};
