//! Web layer for the timetable gateway.
//!
//! Exposes the client's four searches as JSON endpoints.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
