//! Work experience (`/users/experiences`). No metadata endpoint.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{
    envelope::ServiceResult,
    error::ApiFault,
    http::ApiClient,
    resources::{
        Validate,
        collection::{self, Entry, PortfolioSection},
        require_text, validate_date_range,
    },
};

const SECTION: PortfolioSection = PortfolioSection::Experiences;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExperienceFields {
    #[schemars(description = "Job title, e.g. Senior Backend Engineer")]
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "e.g. full-time, part-time, contract, internship")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[schemars(description = "Start date in YYYY-MM-DD format")]
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "End date in YYYY-MM-DD format; omit for the current role")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for ExperienceFields {
    fn validate(&self) -> Result<(), ApiFault> {
        require_text("title", &self.title)?;
        require_text("company", &self.company)?;
        if self.is_current && self.end_date.is_some() {
            return Err(ApiFault::invalid("a current role cannot have an end_date."));
        }
        validate_date_range(
            ("start_date", Some(&self.start_date)),
            ("end_date", self.end_date.as_deref()),
        )
    }
}

pub type Experience = Entry<ExperienceFields>;

/// # Errors
/// See [`collection::list`].
pub async fn get_user_experiences(
    client: &ApiClient,
) -> Result<ServiceResult<Vec<Experience>>, ApiFault> {
    collection::list(client, SECTION).await
}

/// # Errors
/// See [`collection::get`].
pub async fn get_experience(
    client: &ApiClient,
    id: &str,
) -> Result<ServiceResult<Experience>, ApiFault> {
    collection::get(client, SECTION, id).await
}

/// # Errors
/// See [`collection::create`].
pub async fn create_experience(
    client: &ApiClient,
    experience: &ExperienceFields,
) -> Result<ServiceResult<Experience>, ApiFault> {
    collection::create(client, SECTION, experience).await
}

/// # Errors
/// See [`collection::update`].
pub async fn update_experience(
    client: &ApiClient,
    id: &str,
    experience: &ExperienceFields,
) -> Result<ServiceResult<Experience>, ApiFault> {
    collection::update(client, SECTION, id, experience).await
}

/// # Errors
/// See [`collection::delete`].
pub async fn delete_experience(
    client: &ApiClient,
    id: &str,
) -> Result<ServiceResult<Value>, ApiFault> {
    collection::delete(client, SECTION, id).await
}

/// # Errors
/// See [`collection::reorder`].
pub async fn reorder_experience(
    client: &ApiClient,
    id: &str,
    new_index: u32,
) -> Result<ServiceResult<Value>, ApiFault> {
    collection::reorder(client, SECTION, id, new_index).await
}
