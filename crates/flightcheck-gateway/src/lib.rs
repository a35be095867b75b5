//! HTTP boundary between reconciliation clients and the schedule provider.
//!
//! Holds the provider credentials so callers never see them, and answers
//! `POST /v1/flights/batch` with one result per requested code.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
