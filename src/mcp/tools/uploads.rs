//! Tool for requesting presigned upload URLs.

use rmcp::{ErrorData, handler::server::wrapper::Parameters, model::CallToolResult};

use crate::{
    api::{
        http::ApiClient,
        resources::uploads::{self, PresignedUrlRequest},
    },
    mcp::tools::into_tool_result,
};

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn create_presigned_urls(
    client: &ApiClient,
    Parameters(request): Parameters<PresignedUrlRequest>,
) -> Result<CallToolResult, ErrorData> {
    into_tool_result(uploads::create_presigned_urls(client, &request).await?)
}
