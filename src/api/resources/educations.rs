//! Education history (`/users/educations`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

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

const SECTION: PortfolioSection = PortfolioSection::Educations;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EducationFields {
    #[schemars(description = "School or university name")]
    pub school: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Degree, e.g. Bachelor of Science")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Start date in YYYY-MM-DD format")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "End date in YYYY-MM-DD format, omitted while still studying")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for EducationFields {
    fn validate(&self) -> Result<(), ApiFault> {
        require_text("school", &self.school)?;
        validate_date_range(
            ("start_date", self.start_date.as_deref()),
            ("end_date", self.end_date.as_deref()),
        )
    }
}

pub type Education = Entry<EducationFields>;

/// # Errors
/// See [`collection::list`].
pub async fn get_user_educations(
    client: &ApiClient,
) -> Result<ServiceResult<Vec<Education>>, ApiFault> {
    collection::list(client, SECTION).await
}

/// # Errors
/// See [`collection::get`].
pub async fn get_education(
    client: &ApiClient,
    id: &str,
) -> Result<ServiceResult<Education>, ApiFault> {
    collection::get(client, SECTION, id).await
}

/// # Errors
/// See [`collection::create`].
pub async fn create_education(
    client: &ApiClient,
    education: &EducationFields,
) -> Result<ServiceResult<Education>, ApiFault> {
    collection::create(client, SECTION, education).await
}

/// # Errors
/// See [`collection::update`].
pub async fn update_education(
    client: &ApiClient,
    id: &str,
    education: &EducationFields,
) -> Result<ServiceResult<Education>, ApiFault> {
    collection::update(client, SECTION, id, education).await
}

/// # Errors
/// See [`collection::delete`].
pub async fn delete_education(
    client: &ApiClient,
    id: &str,
) -> Result<ServiceResult<Value>, ApiFault> {
    collection::delete(client, SECTION, id).await
}

/// # Errors
/// See [`collection::reorder`].
pub async fn reorder_education(
    client: &ApiClient,
    id: &str,
    new_index: u32,
) -> Result<ServiceResult<Value>, ApiFault> {
    collection::reorder(client, SECTION, id, new_index).await
}

/// # Errors
/// See [`collection::update_metadata`].
pub async fn update_education_metadata(
    client: &ApiClient,
    id: &str,
    metadata: &Map<String, Value>,
) -> Result<ServiceResult<Value>, ApiFault> {
    collection::update_metadata(client, SECTION, id, metadata).await
}
