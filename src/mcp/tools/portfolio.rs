//! Tools for the portfolio sections: certifications, educations, work
//! experience and hackathons.
//!
//! One set of tools covers all four sections. Writes take a
//! [`PortfolioEntryInput`] tagged with its section so the fields are
//! validated against the right schema.

use rmcp::{ErrorData, handler::server::wrapper::Parameters, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    api::{
        http::ApiClient,
        resources::{
            certifications::{self, CertificationFields},
            collection::{self, PortfolioSection},
            educations::{self, EducationFields},
            experiences::{self, ExperienceFields},
            hackathons::{self, HackathonFields},
        },
    },
    mcp::tools::into_tool_result,
};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "section", content = "fields", rename_all = "snake_case")]
pub enum PortfolioEntryInput {
    Certifications(CertificationFields),
    Educations(EducationFields),
    Experiences(ExperienceFields),
    Hackathons(HackathonFields),
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct SectionRequest {
    pub section: PortfolioSection,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct CreateEntryRequest {
    pub entry: PortfolioEntryInput,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct UpdateEntryRequest {
    #[schemars(description = "Id of the entry to replace")]
    pub id: String,
    pub entry: PortfolioEntryInput,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct EntryRequest {
    pub section: PortfolioSection,
    pub id: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct ReorderEntryRequest {
    pub section: PortfolioSection,
    pub id: String,
    #[schemars(description = "Zero-based target position; list the section again afterwards")]
    pub new_index: u32,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct EntryMetadataRequest {
    pub section: PortfolioSection,
    pub id: String,
    #[schemars(description = "Metadata keys to set on the entry, e.g. {\"featured\": true}")]
    pub metadata: Map<String, Value>,
}

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn list_portfolio_section(
    client: &ApiClient,
    Parameters(SectionRequest { section }): Parameters<SectionRequest>,
) -> Result<CallToolResult, ErrorData> {
    match section {
        PortfolioSection::Certifications => {
            into_tool_result(certifications::get_user_certifications(client).await?)
        }
        PortfolioSection::Educations => {
            into_tool_result(educations::get_user_educations(client).await?)
        }
        PortfolioSection::Experiences => {
            into_tool_result(experiences::get_user_experiences(client).await?)
        }
        PortfolioSection::Hackathons => {
            into_tool_result(hackathons::get_user_hackathons(client).await?)
        }
    }
}

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn create_portfolio_entry(
    client: &ApiClient,
    Parameters(CreateEntryRequest { entry }): Parameters<CreateEntryRequest>,
) -> Result<CallToolResult, ErrorData> {
    match entry {
        PortfolioEntryInput::Certifications(fields) => {
            into_tool_result(certifications::create_certification(client, &fields).await?)
        }
        PortfolioEntryInput::Educations(fields) => {
            into_tool_result(educations::create_education(client, &fields).await?)
        }
        PortfolioEntryInput::Experiences(fields) => {
            into_tool_result(experiences::create_experience(client, &fields).await?)
        }
        PortfolioEntryInput::Hackathons(fields) => {
            into_tool_result(hackathons::create_hackathon(client, &fields).await?)
        }
    }
}

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn update_portfolio_entry(
    client: &ApiClient,
    Parameters(UpdateEntryRequest { id, entry }): Parameters<UpdateEntryRequest>,
) -> Result<CallToolResult, ErrorData> {
    match entry {
        PortfolioEntryInput::Certifications(fields) => {
            into_tool_result(certifications::update_certification(client, &id, &fields).await?)
        }
        PortfolioEntryInput::Educations(fields) => {
            into_tool_result(educations::update_education(client, &id, &fields).await?)
        }
        PortfolioEntryInput::Experiences(fields) => {
            into_tool_result(experiences::update_experience(client, &id, &fields).await?)
        }
        PortfolioEntryInput::Hackathons(fields) => {
            into_tool_result(hackathons::update_hackathon(client, &id, &fields).await?)
        }
    }
}

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn delete_portfolio_entry(
    client: &ApiClient,
    Parameters(EntryRequest { section, id }): Parameters<EntryRequest>,
) -> Result<CallToolResult, ErrorData> {
    into_tool_result(collection::delete(client, section, &id).await?)
}

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn reorder_portfolio_entry(
    client: &ApiClient,
    Parameters(args): Parameters<ReorderEntryRequest>,
) -> Result<CallToolResult, ErrorData> {
    into_tool_result(collection::reorder(client, args.section, &args.id, args.new_index).await?)
}

/// # Errors
/// Faults of the underlying leaf, as `ErrorData`.
pub async fn update_portfolio_entry_metadata(
    client: &ApiClient,
    Parameters(args): Parameters<EntryMetadataRequest>,
) -> Result<CallToolResult, ErrorData> {
    into_tool_result(
        collection::update_metadata(client, args.section, &args.id, &args.metadata).await?,
    )
}
