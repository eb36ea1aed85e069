//! Upload HTTP server, compiled with the `http` feature.
//!
//! Exposes the prediction pipeline over a small Axum router: a health check
//! and an upload endpoint that takes raw audio bytes. Uploads are processed
//! one at a time on a blocking thread.

mod routes;

pub use routes::{build_router, run_http_server, HealthResponse, HttpServerError, HttpState};
