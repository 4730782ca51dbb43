//! Fault channel for the portfolio API pipeline.
//!
//! Ordinary HTTP failures are *returned* as
//! [`ServiceResult::Failure`](crate::api::envelope::ServiceResult) values.
//! Everything in this module aborts the call instead:
//! - `NoSession`: an authenticated call was made without a session
//! - `Transport`: DNS, connect, TLS or read failures from `reqwest`
//! - `MalformedResponse`: the backend answered with a body that is not the JSON we expect
//!
//! The remaining variants cover local validation, configuration and the
//! third-party skill lookup service. `ApiFault` converts into RMCP's
//! `ErrorData` so tools can propagate it with `?`.

use rmcp::ErrorData;
use rmcp::model::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiFault {
    #[error("No active session: sign in again to continue")]
    NoSession,

    #[error("Identity provider error: {0}")]
    IdentityProvider(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response (status {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },

    #[error("Upstream service returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiFault {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParams(message.into())
    }

    #[must_use]
    pub fn malformed(status: u16, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            status,
            reason: reason.into(),
        }
    }

    /// True for faults that happened before anything left the process.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::NoSession | Self::InvalidParams(_) | Self::MissingConfig(_)
        )
    }
}

impl From<reqwest_middleware::Error> for ApiFault {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => Self::Transport(e),
            reqwest_middleware::Error::Middleware(e) => Self::Internal(e),
        }
    }
}

impl From<ApiFault> for ErrorData {
    fn from(err: ApiFault) -> Self {
        match err {
            ApiFault::NoSession => Self::new(ErrorCode::INVALID_REQUEST, err.to_string(), None),
            ApiFault::InvalidParams(msg) => Self::new(ErrorCode::INVALID_PARAMS, msg, None),
            ApiFault::MissingConfig(msg) => Self::new(ErrorCode::INTERNAL_ERROR, msg, None),
            ApiFault::Transport(e) => {
                Self::new(ErrorCode::INTERNAL_ERROR, format!("HTTP error: {e}"), None)
            }
            ApiFault::Cancelled
            | ApiFault::IdentityProvider(_)
            | ApiFault::MalformedResponse { .. }
            | ApiFault::UpstreamStatus { .. }
            | ApiFault::Serialization(_)
            | ApiFault::Internal(_) => Self::new(ErrorCode::INTERNAL_ERROR, err.to_string(), None),
        }
    }
}
