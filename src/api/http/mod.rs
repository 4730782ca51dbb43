//! HTTP layer for the portfolio backend.
//!
//! This module handles all HTTP communication with the backend REST API,
//! including credential decoration, request construction and dispatch.

mod client;

// Re-export client's public API
pub use client::{ApiClient, RequestDescriptor};
pub(crate) use client::build_http_client;

// Re-export common types used in our public API
pub use reqwest::{Method, Response};
