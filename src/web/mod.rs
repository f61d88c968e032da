//! Web server module
//!
//! Exposes every collection operation as a JSON HTTP API.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
