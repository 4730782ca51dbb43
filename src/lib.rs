//! Server-side proxy for the portfolio REST API.
//!
//! - `api`: the authenticated request/response pipeline and resource leaves
//! - `mcp`: Model Context Protocol tools exposing those leaves over HTTP

pub mod api;
pub mod mcp;
