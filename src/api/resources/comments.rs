//! Comments on blog posts and portfolios.
//!
//! Listing is open to anonymous readers; writing requires a session.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{
    envelope::ServiceResult,
    error::ApiFault,
    http::{ApiClient, RequestDescriptor},
    pagination::{Identified, Page},
    resources::{EntityId, Validate, path_id, require_text},
};

const COMMENTS_PATH: &str = "/comments";

/// Where a comment thread lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CommentModule {
    Blog,
    Portfolio,
}

impl CommentModule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Portfolio => "portfolio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReactionAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommentAuthor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<CommentModule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<CommentAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reply_count: u32,
    /// Reaction name to count, e.g. `{"like": 3}`.
    #[serde(default)]
    pub reactions: serde_json::Map<String, Value>,
}

impl Identified for Comment {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ListCommentsQuery {
    #[schemars(description = "Slug of the blog post or portfolio, e.g. my-first-post")]
    pub slug: String,
    pub module: CommentModule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "List replies to this comment instead of top-level comments")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Cursor returned by the previous page")]
    pub cursor: Option<String>,
}

impl Validate for ListCommentsQuery {
    fn validate(&self) -> Result<(), ApiFault> {
        require_text("slug", &self.slug)?;
        if let Some(parent_id) = &self.parent_id {
            path_id("parent comment", parent_id)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NewComment {
    #[schemars(description = "Comment text (markdown)")]
    pub body: String,
    pub module: CommentModule,
    pub slug: String,
}

impl Validate for NewComment {
    fn validate(&self) -> Result<(), ApiFault> {
        require_text("body", &self.body)?;
        require_text("slug", &self.slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommentReply {
    pub body: String,
    pub module: CommentModule,
}

impl Validate for CommentReply {
    fn validate(&self) -> Result<(), ApiFault> {
        require_text("body", &self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommentReaction {
    #[schemars(description = "Reaction name, e.g. like")]
    pub reaction: String,
    pub action: ReactionAction,
}

impl Validate for CommentReaction {
    fn validate(&self) -> Result<(), ApiFault> {
        require_text("reaction", &self.reaction)
    }
}

/// Lists one page of a thread. Works without a session.
///
/// # Errors
/// `InvalidParams` for a blank slug or an unusable `parent_id`.
pub async fn list_comments(
    client: &ApiClient,
    query: &ListCommentsQuery,
) -> Result<ServiceResult<Page<Comment>>, ApiFault> {
    query.validate()?;
    let descriptor = RequestDescriptor::get(COMMENTS_PATH)
        .query("slug", query.slug.trim())
        .query("module", query.module.as_str())
        .query_opt("parent_id", query.parent_id.as_deref())
        .query_opt("cursor", query.cursor.as_deref())
        .allow_anonymous();
    client.call(descriptor).await
}

/// # Errors
/// `NoSession` when signed out, `InvalidParams` for a blank body or slug.
pub async fn create_comment(
    client: &ApiClient,
    comment: &NewComment,
) -> Result<ServiceResult<Comment>, ApiFault> {
    comment.validate()?;
    client
        .call(RequestDescriptor::post(COMMENTS_PATH).json(comment)?)
        .await
}

/// # Errors
/// `NoSession` when signed out, `InvalidParams` for a blank body or an
/// unusable comment id.
pub async fn reply_to_comment(
    client: &ApiClient,
    comment_id: &str,
    reply: &CommentReply,
) -> Result<ServiceResult<Comment>, ApiFault> {
    reply.validate()?;
    let path = format!("{COMMENTS_PATH}/{}/reply", path_id("comment", comment_id)?);
    client.call(RequestDescriptor::put(path).json(reply)?).await
}

/// # Errors
/// `NoSession` when signed out, `InvalidParams` for a blank reaction.
pub async fn react_to_comment(
    client: &ApiClient,
    comment_id: &str,
    reaction: &CommentReaction,
) -> Result<ServiceResult<Value>, ApiFault> {
    reaction.validate()?;
    let path = format!("{COMMENTS_PATH}/{}/reaction", path_id("comment", comment_id)?);
    client.call(RequestDescriptor::put(path).json(reaction)?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{config::ApiConfig, session::StaticSessionProvider};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::sync::Arc;

    fn client(base: &str, identity: StaticSessionProvider) -> ApiClient {
        ApiClient::new(ApiConfig::parse(base).unwrap(), Arc::new(identity)).unwrap()
    }

    #[tokio::test]
    async fn list_is_anonymous_and_sends_filters() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/comments")
            .match_header("authorization", Matcher::Missing)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("slug".into(), "hello".into()),
                Matcher::UrlEncoded("module".into(), "blog".into()),
                Matcher::UrlEncoded("cursor".into(), "c1".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "statusCode": 200,
                    "method": "GET",
                    "message": "Comments fetched",
                    "data": {
                        "comments": [{"id": 1, "body": "nice", "reactions": {"like": 2}}],
                        "cursor": null
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let query = ListCommentsQuery {
            slug: "hello".to_string(),
            module: CommentModule::Blog,
            parent_id: None,
            cursor: Some("c1".to_string()),
        };
        let page = list_comments(&client(&server.url(), StaticSessionProvider::anonymous()), &query)
            .await
            .unwrap()
            .into_data()
            .unwrap();

        mock.assert_async().await;
        assert!(page.is_last());
        assert_eq!(page.items[0].id(), "1");
        assert_eq!(page.items[0].reactions["like"], json!(2));
    }

    #[tokio::test]
    async fn react_sends_reaction_and_action() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/comments/12/reaction")
            .match_header("authorization", "Bearer t")
            .match_body(Matcher::Json(json!({"reaction": "like", "action": "remove"})))
            .with_status(200)
            .with_body(r#"{"statusCode":200,"message":"Reaction removed","data":null}"#)
            .create_async()
            .await;

        let reaction = CommentReaction {
            reaction: "like".to_string(),
            action: ReactionAction::Remove,
        };
        let result = react_to_comment(
            &client(&server.url(), StaticSessionProvider::from_access_token("t")),
            "12",
            &reaction,
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn empty_reply_is_rejected_locally() {
        let reply = CommentReply {
            body: "   ".to_string(),
            module: CommentModule::Portfolio,
        };
        let err = reply_to_comment(
            &client("http://127.0.0.1:9", StaticSessionProvider::from_access_token("t")),
            "12",
            &reply,
        )
        .await
        .unwrap_err();
        assert!(err.is_local());
    }
}
