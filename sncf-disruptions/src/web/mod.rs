//! Read-only HTTP view of the sensor.
//!
//! Serves the latest snapshot published by the poll loop.

mod dto;
mod routes;
mod state;

pub use dto::ErrorResponse;
pub use routes::{AppError, create_router};
pub use state::AppState;
