//! The CRUD + reorder + metadata pattern shared by the portfolio sections.
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | list | GET | `{base}` |
//! | get | GET | `{base}/{id}` |
//! | create | POST | `{base}` |
//! | update | PUT | `{base}/{id}` |
//! | delete | DELETE | `{base}/{id}` |
//! | reorder | PATCH | `{base}/{id}/reorder` with `{new_index}` |
//! | metadata | PATCH | `{base}/{id}/metadata` |
//!
//! The server owns ordering. After a reorder, refetch the list instead of
//! moving entries locally.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::api::{
    envelope::ServiceResult,
    error::ApiFault,
    http::{ApiClient, RequestDescriptor},
    pagination::Identified,
    resources::{EntityId, Validate, path_id},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioSection {
    Certifications,
    Educations,
    Experiences,
    Hackathons,
}

impl PortfolioSection {
    pub const ALL: [Self; 4] = [
        Self::Certifications,
        Self::Educations,
        Self::Experiences,
        Self::Hackathons,
    ];

    #[must_use]
    pub const fn base_path(self) -> &'static str {
        match self {
            Self::Certifications => "/portfolio/certifications",
            Self::Educations => "/users/educations",
            Self::Experiences => "/users/experiences",
            Self::Hackathons => "/users/hackathons",
        }
    }

    /// Work experience entries carry no metadata endpoint.
    #[must_use]
    pub const fn has_metadata(self) -> bool {
        !matches!(self, Self::Experiences)
    }

    const fn entry_kind(self) -> &'static str {
        match self {
            Self::Certifications => "certification",
            Self::Educations => "education",
            Self::Experiences => "experience",
            Self::Hackathons => "hackathon",
        }
    }

    fn entry_path(self, id: &str) -> Result<String, ApiFault> {
        Ok(format!("{}/{}", self.base_path(), path_id(self.entry_kind(), id)?))
    }
}

/// A stored portfolio entry: the section's fields plus backend bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<F> {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub fields: F,
}

impl<F> Identified for Entry<F> {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReorderRequest {
    /// Zero-based target position within the section.
    pub new_index: u32,
}

/// # Errors
/// Faults from [`ApiClient::call`].
pub async fn list<F: DeserializeOwned>(
    client: &ApiClient,
    section: PortfolioSection,
) -> Result<ServiceResult<Vec<Entry<F>>>, ApiFault> {
    client.call(RequestDescriptor::get(section.base_path())).await
}

/// # Errors
/// `InvalidParams` for an unusable id, otherwise faults from [`ApiClient::call`].
pub async fn get<F: DeserializeOwned>(
    client: &ApiClient,
    section: PortfolioSection,
    id: &str,
) -> Result<ServiceResult<Entry<F>>, ApiFault> {
    client.call(RequestDescriptor::get(section.entry_path(id)?)).await
}

/// # Errors
/// `InvalidParams` when `body` fails validation, otherwise faults from
/// [`ApiClient::call`].
pub async fn create<B, F>(
    client: &ApiClient,
    section: PortfolioSection,
    body: &B,
) -> Result<ServiceResult<Entry<F>>, ApiFault>
where
    B: Serialize + Validate,
    F: DeserializeOwned,
{
    body.validate()?;
    client
        .call(RequestDescriptor::post(section.base_path()).json(body)?)
        .await
}

/// # Errors
/// `InvalidParams` for an unusable id or a body that fails validation.
pub async fn update<B, F>(
    client: &ApiClient,
    section: PortfolioSection,
    id: &str,
    body: &B,
) -> Result<ServiceResult<Entry<F>>, ApiFault>
where
    B: Serialize + Validate,
    F: DeserializeOwned,
{
    body.validate()?;
    client
        .call(RequestDescriptor::put(section.entry_path(id)?).json(body)?)
        .await
}

/// # Errors
/// `InvalidParams` for an unusable id.
pub async fn delete(
    client: &ApiClient,
    section: PortfolioSection,
    id: &str,
) -> Result<ServiceResult<Value>, ApiFault> {
    client
        .call(RequestDescriptor::delete(section.entry_path(id)?))
        .await
}

/// Asks the server to move an entry. Refetch the list to see the result.
///
/// # Errors
/// `InvalidParams` for an unusable id.
pub async fn reorder(
    client: &ApiClient,
    section: PortfolioSection,
    id: &str,
    new_index: u32,
) -> Result<ServiceResult<Value>, ApiFault> {
    let path = format!("{}/reorder", section.entry_path(id)?);
    client
        .call(RequestDescriptor::patch(path).json(&ReorderRequest { new_index })?)
        .await
}

/// Merges `metadata` into the entry's metadata object.
///
/// # Errors
/// `InvalidParams` for experiences, an empty map or an unusable id.
pub async fn update_metadata(
    client: &ApiClient,
    section: PortfolioSection,
    id: &str,
    metadata: &Map<String, Value>,
) -> Result<ServiceResult<Value>, ApiFault> {
    if !section.has_metadata() {
        return Err(ApiFault::invalid(format!(
            "{} entries have no metadata.",
            section.entry_kind()
        )));
    }
    if metadata.is_empty() {
        return Err(ApiFault::invalid("metadata cannot be empty."));
    }
    let path = format!("{}/metadata", section.entry_path(id)?);
    client
        .call(RequestDescriptor::patch(path).json(metadata)?)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{config::ApiConfig, session::StaticSessionProvider};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::new(
            ApiConfig::parse(base).unwrap(),
            Arc::new(StaticSessionProvider::from_access_token("t")),
        )
        .unwrap()
    }

    #[test]
    fn section_paths() {
        let paths: Vec<_> = PortfolioSection::ALL.iter().map(|s| s.base_path()).collect();
        assert_eq!(
            paths,
            vec![
                "/portfolio/certifications",
                "/users/educations",
                "/users/experiences",
                "/users/hackathons"
            ]
        );
    }

    #[test]
    fn entry_flattens_section_fields() {
        let entry: Entry<Named> =
            serde_json::from_value(json!({"id": 5, "order": 0, "name": "AWS SAA"})).unwrap();
        assert_eq!(entry.id(), "5");
        assert_eq!(entry.order, Some(0));
        assert_eq!(entry.fields.name, "AWS SAA");
    }

    #[tokio::test]
    async fn reorder_patches_new_index() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/users/hackathons/7/reorder")
            .match_body(Matcher::Json(json!({"new_index": 2})))
            .with_status(200)
            .with_body(r#"{"statusCode":200,"message":"Reordered","data":null}"#)
            .create_async()
            .await;

        let result = reorder(&client(&server.url()), PortfolioSection::Hackathons, "7", 2)
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(result.is_success());
    }

    #[tokio::test]
    async fn metadata_is_refused_for_experiences() {
        let mut metadata = Map::new();
        metadata.insert("visible".to_string(), json!(true));
        let err = update_metadata(
            &client("http://127.0.0.1:9"),
            PortfolioSection::Experiences,
            "1",
            &metadata,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiFault::InvalidParams(_)));
    }

    #[tokio::test]
    async fn bad_ids_never_reach_the_backend() {
        let err = delete(&client("http://127.0.0.1:9"), PortfolioSection::Educations, "../1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiFault::InvalidParams(_)));
    }

    #[tokio::test]
    async fn metadata_patch_sends_object() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/portfolio/certifications/3/metadata")
            .match_body(Matcher::Json(json!({"featured": true})))
            .with_status(200)
            .with_body(r#"{"statusCode":200,"data":{"featured":true}}"#)
            .create_async()
            .await;

        let mut metadata = Map::new();
        metadata.insert("featured".to_string(), json!(true));
        let result = update_metadata(
            &client(&server.url()),
            PortfolioSection::Certifications,
            "3",
            &metadata,
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(result.data(), Some(&json!({"featured": true})));
    }
}
