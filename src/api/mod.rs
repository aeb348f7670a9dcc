//! HTTP API and the single page UI.
//!
//! ## Endpoints
//!
//! - `GET /` - The question page
//! - `POST /api/ask` - Answer one question
//! - `GET /api/tools` - List the tools available to the agent
//! - `GET /api/health` - Health check

mod routes;
pub mod types;
mod ui;

pub use routes::{router, serve, AppState};
