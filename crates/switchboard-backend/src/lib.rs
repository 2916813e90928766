//! HTTP client for the workflow-generation backend.
//!
//! Wraps the backend's generation and search endpoints plus two best-effort
//! side channels (workflow broadcast, live-transcript relay). The client is
//! stateless: no retries, no caching, one request per call at human call
//! volume.

mod client;
mod error;

pub use client::BackendClient;
pub use error::BackendError;
