//! Tools for skill names: the backend catalogue and the third-party lookup.

use rmcp::{
    ErrorData, handler::server::wrapper::Parameters, model::CallToolResult,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::{
    api::{
        ApiFault,
        http::ApiClient,
        resources::skills::{self, SkillsQuery},
        skill_lookup::SkillLookup,
    },
    mcp::tools::into_tool_result,
};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct SkillLookupRequest {
    #[schemars(description = "Partial skill name, e.g. kube. A blank query returns no suggestions.")]
    pub query: String,
}

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn list_skills(
    client: &ApiClient,
    Parameters(query): Parameters<SkillsQuery>,
) -> Result<CallToolResult, ErrorData> {
    into_tool_result(skills::list_skills(client, &query).await?)
}

/// `cancel` is the MCP request's own token, so a client-side cancel aborts the lookup.
///
/// # Errors
/// `INTERNAL_ERROR` when the lookup is not configured, was cancelled or the
/// service failed.
pub async fn lookup_skills(
    lookup: Option<&SkillLookup>,
    Parameters(args): Parameters<SkillLookupRequest>,
    cancel: &CancellationToken,
) -> Result<CallToolResult, ErrorData> {
    let lookup = lookup.ok_or_else(|| {
        ApiFault::MissingConfig("SKILLS_API_KEY is not configured".to_string())
    })?;
    let skills = lookup.lookup(&args.query, cancel).await?;
    Ok(CallToolResult::structured(json!({ "skills": skills })))
}
