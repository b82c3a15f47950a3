//! HTTP surface
//!
//! `POST /process-review` runs the review workflow; `GET /health` reports
//! liveness.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::{AppState, build_router};
pub use server::serve;
