//! Web layer for the schedule server.
//!
//! Exposes the grid, duty board and timetable of a route as JSON.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
