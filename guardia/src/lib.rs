//! Guardia library
//!
//! Exposes the router, services and state so integration tests and sibling
//! binaries can drive the API without going through the network.

pub mod api;
pub mod app_state;
pub mod http;
pub mod services;
pub mod settings;

pub use app_state::AppState;
