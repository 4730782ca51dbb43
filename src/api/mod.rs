//! Authenticated access to the portfolio REST API.
//!
//! Every call runs the same pipeline:
//!
//! 1. [`credential::resolve_credential`] asks the injected
//!    [`session::IdentityProvider`] for a session
//! 2. [`http::ApiClient::dispatch`] decorates and sends the request
//! 3. [`envelope::normalize`] turns the response into a [`ServiceResult`]
//!
//! Failures travel on two channels. HTTP error statuses come back as
//! `Ok(ServiceResult::Failure(..))`; missing sessions, transport errors and
//! unreadable bodies come back as `Err(ApiFault)`.
//!
//! The modules are organized into:
//!
//! - `config`: environment-based configuration
//! - `error`: the fault channel
//! - `session`, `credential`: identity provider and credential resolution
//! - `http`: request descriptors and dispatch
//! - `envelope`, `pagination`: response normalization and cursor walking
//! - `resources`: one leaf per backend resource
//! - `skill_lookup`: the third-party skill search service

pub mod config;
pub mod credential;
pub mod envelope;
pub mod error;
pub mod http;
pub mod pagination;
pub mod resources;
pub mod session;
pub mod skill_lookup;

pub use envelope::{ErrorEnvelope, ServiceResult, SuccessEnvelope};
pub use error::ApiFault;
