//! The backend's skill catalogue (`/metadata/skills`). Anonymous-OK.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::{
    envelope::ServiceResult,
    error::ApiFault,
    http::{ApiClient, RequestDescriptor},
    pagination::{Identified, Page},
    resources::EntityId,
};

const SKILLS_PATH: &str = "/metadata/skills";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: EntityId,
    pub name: String,
}

impl Identified for Skill {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkillsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Case-insensitive name filter")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Cursor returned by the previous page")]
    pub cursor: Option<String>,
}

/// # Errors
/// Faults from [`ApiClient::call`]; no session is needed.
pub async fn list_skills(
    client: &ApiClient,
    query: &SkillsQuery,
) -> Result<ServiceResult<Page<Skill>>, ApiFault> {
    let filter = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());
    let descriptor = RequestDescriptor::get(SKILLS_PATH)
        .query_opt("cursor", query.cursor.as_deref())
        .query_opt("query", filter)
        .allow_anonymous();
    client.call(descriptor).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{config::ApiConfig, pagination::collect_pages, session::StaticSessionProvider};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn walks_every_page_of_the_catalogue() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/metadata/skills")
            .match_query(Matcher::Regex("^$".to_string()))
            .with_status(200)
            .with_body(
                json!({"statusCode": 200, "data": {
                    "skills": [{"id": 1, "name": "Rust"}, {"id": 2, "name": "Go"}],
                    "cursor": "p2"
                }})
                .to_string(),
            )
            .create_async()
            .await;
        let second = server
            .mock("GET", "/metadata/skills")
            .match_query(Matcher::UrlEncoded("cursor".into(), "p2".into()))
            .with_status(200)
            .with_body(
                json!({"statusCode": 200, "data": {
                    "skills": [{"id": 2, "name": "Go"}, {"id": 3, "name": "Zig"}]
                }})
                .to_string(),
            )
            .create_async()
            .await;

        let client = ApiClient::new(
            ApiConfig::parse(&server.url()).unwrap(),
            Arc::new(StaticSessionProvider::anonymous()),
        )
        .unwrap();

        let skills = collect_pages(|cursor| {
            let client = client.clone();
            async move {
                let query = SkillsQuery {
                    query: Some("  ".to_string()),
                    cursor,
                };
                list_skills(&client, &query).await
            }
        })
        .await
        .unwrap()
        .into_data()
        .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        let names: Vec<_> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Go", "Zig"]);
    }
}
