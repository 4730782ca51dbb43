//! Response envelope normalization.
//!
//! The backend wraps every response in `{statusCode, method, message, data}`.
//! [`normalize`] turns a raw response into a [`ServiceResult`]: the HTTP
//! status picks the branch, the body supplies message and payload. A body
//! that is not JSON is a fault, never an empty envelope.

use http::{Method, StatusCode};
use reqwest::Response;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::debug;

use crate::api::error::ApiFault;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope<T> {
    pub status_code: u16,
    pub method: String,
    pub message: String,
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub method: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// Exactly one of a success or an error envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResult<T> {
    Success(SuccessEnvelope<T>),
    Failure(ErrorEnvelope),
}

impl<T> ServiceResult<T> {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Success(envelope) => envelope.status_code,
            Self::Failure(envelope) => envelope.status_code,
        }
    }

    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(envelope) => Some(&envelope.data),
            Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ErrorEnvelope> {
        match self {
            Self::Success(_) => None,
            Self::Failure(envelope) => Some(envelope),
        }
    }

    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(envelope) => Some(envelope.data),
            Self::Failure(_) => None,
        }
    }

    /// Splits into the two envelopes.
    ///
    /// # Errors
    /// The error envelope, for a non-2xx response.
    pub fn into_result(self) -> Result<SuccessEnvelope<T>, ErrorEnvelope> {
        match self {
            Self::Success(envelope) => Ok(envelope),
            Self::Failure(envelope) => Err(envelope),
        }
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ServiceResult<U> {
        match self {
            Self::Success(envelope) => ServiceResult::Success(SuccessEnvelope {
                status_code: envelope.status_code,
                method: envelope.method,
                message: envelope.message,
                data: f(envelope.data),
            }),
            Self::Failure(envelope) => ServiceResult::Failure(envelope),
        }
    }
}

/// Reads the body of `response` and normalizes it.
///
/// `method` is the method that produced the response; it fills the envelope
/// when the backend omits it.
///
/// # Errors
/// `Transport` if the body cannot be read, `MalformedResponse` if it is not
/// JSON or a success payload does not decode as `T`.
pub async fn normalize<T: DeserializeOwned>(
    method: &Method,
    response: Response,
) -> Result<ServiceResult<T>, ApiFault> {
    let status = response.status();
    let body = response.bytes().await?;
    normalize_body(status, method, &body)
}

/// Pure half of [`normalize`], over an already-read body.
///
/// # Errors
/// Same as [`normalize`], minus body reads.
pub fn normalize_body<T: DeserializeOwned>(
    status: StatusCode,
    method: &Method,
    body: &[u8],
) -> Result<ServiceResult<T>, ApiFault> {
    let value = if body.is_empty() && status == StatusCode::NO_CONTENT {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(body).map_err(|e| {
            ApiFault::malformed(status.as_u16(), format!("body is not valid JSON: {e}"))
        })?
    };

    let parts = EnvelopeParts::split(value);
    let method = parts.method.unwrap_or_else(|| method.to_string());
    let message = parts
        .message
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());

    if status.is_success() {
        let data = serde_json::from_value(parts.data).map_err(|e| {
            ApiFault::malformed(
                status.as_u16(),
                format!("payload does not match the expected shape: {e}"),
            )
        })?;
        return Ok(ServiceResult::Success(SuccessEnvelope {
            status_code: status.as_u16(),
            method,
            message,
            data,
        }));
    }

    debug!(status = status.as_u16(), %message, "backend returned an error envelope");
    let error = parts.error.or(Some(parts.data)).filter(|v| !v.is_null());
    Ok(ServiceResult::Failure(ErrorEnvelope {
        status_code: status.as_u16(),
        method,
        message,
        error,
    }))
}

/// A JSON body split into envelope fields. Bodies that are not envelopes
/// become the payload as a whole.
struct EnvelopeParts {
    method: Option<String>,
    message: Option<String>,
    data: Value,
    error: Option<Value>,
}

impl EnvelopeParts {
    const MARKERS: [&'static str; 3] = ["statusCode", "data", "error"];

    fn split(value: Value) -> Self {
        match value {
            Value::Object(map) if Self::MARKERS.iter().any(|key| map.contains_key(*key)) => {
                Self::from_envelope(map)
            }
            other => Self {
                method: None,
                message: None,
                data: other,
                error: None,
            },
        }
    }

    fn from_envelope(mut map: Map<String, Value>) -> Self {
        let text = |value: Option<Value>| match value {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        Self {
            method: text(map.remove("method")),
            message: text(map.remove("message")),
            data: map.remove("data").unwrap_or(Value::Null),
            error: map.remove("error").filter(|v| !v.is_null()),
        }
    }
}
