//! Hackathon participation (`/users/hackathons`).

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

const SECTION: PortfolioSection = PortfolioSection::Hackathons;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HackathonFields {
    #[schemars(description = "Hackathon name, e.g. ETHGlobal Paris")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Prize or placement, e.g. 1st place")]
    pub achievement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Start date in YYYY-MM-DD format")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "End date in YYYY-MM-DD format")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for HackathonFields {
    fn validate(&self) -> Result<(), ApiFault> {
        require_text("name", &self.name)?;
        validate_date_range(
            ("start_date", self.start_date.as_deref()),
            ("end_date", self.end_date.as_deref()),
        )
    }
}

pub type Hackathon = Entry<HackathonFields>;

/// # Errors
/// See [`collection::list`].
pub async fn get_user_hackathons(
    client: &ApiClient,
) -> Result<ServiceResult<Vec<Hackathon>>, ApiFault> {
    collection::list(client, SECTION).await
}

/// # Errors
/// See [`collection::get`].
pub async fn get_hackathon(
    client: &ApiClient,
    id: &str,
) -> Result<ServiceResult<Hackathon>, ApiFault> {
    collection::get(client, SECTION, id).await
}

/// # Errors
/// See [`collection::create`].
pub async fn create_hackathon(
    client: &ApiClient,
    hackathon: &HackathonFields,
) -> Result<ServiceResult<Hackathon>, ApiFault> {
    collection::create(client, SECTION, hackathon).await
}

/// # Errors
/// See [`collection::update`].
pub async fn update_hackathon(
    client: &ApiClient,
    id: &str,
    hackathon: &HackathonFields,
) -> Result<ServiceResult<Hackathon>, ApiFault> {
    collection::update(client, SECTION, id, hackathon).await
}

/// # Errors
/// See [`collection::delete`].
pub async fn delete_hackathon(
    client: &ApiClient,
    id: &str,
) -> Result<ServiceResult<Value>, ApiFault> {
    collection::delete(client, SECTION, id).await
}

/// # Errors
/// See [`collection::reorder`].
pub async fn reorder_hackathon(
    client: &ApiClient,
    id: &str,
    new_index: u32,
) -> Result<ServiceResult<Value>, ApiFault> {
    collection::reorder(client, SECTION, id, new_index).await
}

/// # Errors
/// See [`collection::update_metadata`].
pub async fn update_hackathon_metadata(
    client: &ApiClient,
    id: &str,
    metadata: &Map<String, Value>,
) -> Result<ServiceResult<Value>, ApiFault> {
    collection::update_metadata(client, SECTION, id, metadata).await
}
