//! MCP tools for the portfolio API.
//!
//! Each module wraps one group of resource leaves:
//! - `comments`: list, create, reply and react
//! - `skills`: backend catalogue and third-party lookup
//! - `portfolio`: certifications, educations, experiences and hackathons
//! - `uploads`: presigned upload URLs
//!
//! Success envelopes become structured results, error envelopes become
//! structured *error* results, and faults become `ErrorData`.

pub mod comments;
pub mod portfolio;
pub mod skills;
pub mod uploads;

use rmcp::{ErrorData, model::CallToolResult};
use serde::Serialize;

use crate::api::{ApiFault, ServiceResult};

pub(crate) fn into_tool_result<T: Serialize>(
    result: ServiceResult<T>,
) -> Result<CallToolResult, ErrorData> {
    match result {
        ServiceResult::Success(envelope) => Ok(CallToolResult::structured(
            serde_json::to_value(&envelope).map_err(ApiFault::from)?,
        )),
        ServiceResult::Failure(envelope) => Ok(CallToolResult::structured_error(
            serde_json::to_value(&envelope).map_err(ApiFault::from)?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ErrorEnvelope, SuccessEnvelope};
    use serde_json::json;

    #[test]
    fn success_envelope_is_structured_content() {
        let result = into_tool_result(ServiceResult::Success(SuccessEnvelope {
            status_code: 200,
            method: "GET".to_string(),
            message: "ok".to_string(),
            data: vec![1, 2],
        }))
        .unwrap();
        assert_ne!(result.is_error, Some(true));
        assert_eq!(
            result.structured_content,
            Some(json!({"statusCode": 200, "method": "GET", "message": "ok", "data": [1, 2]}))
        );
    }

    #[test]
    fn error_envelope_is_flagged_as_error() {
        let result = into_tool_result::<()>(ServiceResult::Failure(ErrorEnvelope {
            status_code: 403,
            method: "DELETE".to_string(),
            message: "Forbidden".to_string(),
            error: None,
        }))
        .unwrap();
        assert_eq!(result.is_error, Some(true));
    }
}
