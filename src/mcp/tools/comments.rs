//! Tools for comment threads on blog posts and portfolios.

use rmcp::{ErrorData, handler::server::wrapper::Parameters, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    api::{
        http::ApiClient,
        resources::comments::{
            self, CommentReaction, CommentReply, ListCommentsQuery, NewComment,
        },
    },
    mcp::tools::into_tool_result,
};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ReplyToCommentRequest {
    #[schemars(description = "Id of the comment being replied to")]
    pub comment_id: String,
    #[serde(flatten)]
    pub reply: CommentReply,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ReactToCommentRequest {
    #[schemars(description = "Id of the comment being reacted to")]
    pub comment_id: String,
    #[serde(flatten)]
    pub reaction: CommentReaction,
}

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn list_comments(
    client: &ApiClient,
    Parameters(query): Parameters<ListCommentsQuery>,
) -> Result<CallToolResult, ErrorData> {
    into_tool_result(comments::list_comments(client, &query).await?)
}

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn create_comment(
    client: &ApiClient,
    Parameters(comment): Parameters<NewComment>,
) -> Result<CallToolResult, ErrorData> {
    into_tool_result(comments::create_comment(client, &comment).await?)
}

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn reply_to_comment(
    client: &ApiClient,
    Parameters(args): Parameters<ReplyToCommentRequest>,
) -> Result<CallToolResult, ErrorData> {
    into_tool_result(comments::reply_to_comment(client, &args.comment_id, &args.reply).await?)
}

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn react_to_comment(
    client: &ApiClient,
    Parameters(args): Parameters<ReactToCommentRequest>,
) -> Result<CallToolResult, ErrorData> {
    into_tool_result(comments::react_to_comment(client, &args.comment_id, &args.reaction).await?)
}
