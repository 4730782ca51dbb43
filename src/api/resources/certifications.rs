//! Certifications section of the portfolio (`/portfolio/certifications`).

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

const SECTION: PortfolioSection = PortfolioSection::Certifications;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CertificationFields {
    #[schemars(description = "Certification name, e.g. AWS Certified Solutions Architect")]
    pub name: String,
    #[schemars(description = "Issuing organization, e.g. Amazon Web Services")]
    pub issuing_organization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Issue date in YYYY-MM-DD format")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Expiration date in YYYY-MM-DD format, if the certification expires")]
    pub expiration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_url: Option<String>,
}

impl Validate for CertificationFields {
    fn validate(&self) -> Result<(), ApiFault> {
        require_text("name", &self.name)?;
        require_text("issuing_organization", &self.issuing_organization)?;
        validate_date_range(
            ("issue_date", self.issue_date.as_deref()),
            ("expiration_date", self.expiration_date.as_deref()),
        )
    }
}

pub type Certification = Entry<CertificationFields>;

/// # Errors
/// See [`collection::list`].
pub async fn get_user_certifications(
    client: &ApiClient,
) -> Result<ServiceResult<Vec<Certification>>, ApiFault> {
    collection::list(client, SECTION).await
}

/// # Errors
/// See [`collection::get`].
pub async fn get_certification(
    client: &ApiClient,
    id: &str,
) -> Result<ServiceResult<Certification>, ApiFault> {
    collection::get(client, SECTION, id).await
}

/// # Errors
/// See [`collection::create`].
pub async fn create_certification(
    client: &ApiClient,
    certification: &CertificationFields,
) -> Result<ServiceResult<Certification>, ApiFault> {
    collection::create(client, SECTION, certification).await
}

/// # Errors
/// See [`collection::update`].
pub async fn update_certification(
    client: &ApiClient,
    id: &str,
    certification: &CertificationFields,
) -> Result<ServiceResult<Certification>, ApiFault> {
    collection::update(client, SECTION, id, certification).await
}

/// # Errors
/// See [`collection::delete`].
pub async fn delete_certification(
    client: &ApiClient,
    id: &str,
) -> Result<ServiceResult<Value>, ApiFault> {
    collection::delete(client, SECTION, id).await
}

/// # Errors
/// See [`collection::reorder`].
pub async fn reorder_certification(
    client: &ApiClient,
    id: &str,
    new_index: u32,
) -> Result<ServiceResult<Value>, ApiFault> {
    collection::reorder(client, SECTION, id, new_index).await
}

/// # Errors
/// See [`collection::update_metadata`].
pub async fn update_certification_metadata(
    client: &ApiClient,
    id: &str,
    metadata: &Map<String, Value>,
) -> Result<ServiceResult<Value>, ApiFault> {
    collection::update_metadata(client, SECTION, id, metadata).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> CertificationFields {
        CertificationFields {
            name: "CKA".to_string(),
            issuing_organization: "CNCF".to_string(),
            issue_date: Some("2023-02-01".to_string()),
            expiration_date: Some("2026-02-01".to_string()),
            credential_id: None,
            credential_url: None,
        }
    }

    #[test]
    fn valid_certification_passes() {
        assert!(fields().validate().is_ok());
    }

    #[test]
    fn expiry_before_issue_is_rejected() {
        let mut certification = fields();
        certification.expiration_date = Some("2020-01-01".to_string());
        assert!(matches!(
            certification.validate(),
            Err(ApiFault::InvalidParams(_))
        ));
    }

    #[test]
    fn missing_issuer_is_rejected() {
        let mut certification = fields();
        certification.issuing_organization = " ".to_string();
        assert!(certification.validate().is_err());
    }
}
