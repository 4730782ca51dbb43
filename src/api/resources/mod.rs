//! Resource client leaves.
//!
//! Each leaf validates its typed input, builds a [`RequestDescriptor`] and
//! hands it to [`ApiClient::call`]. Nothing here inspects responses.
//!
//! - `comments`: threaded comments on blog posts and portfolios
//! - `skills`: the backend's skill catalogue
//! - `certifications`, `educations`, `experiences`, `hackathons`: portfolio sections
//! - `uploads`: presigned upload URLs
//!
//! [`RequestDescriptor`]: crate::api::http::RequestDescriptor
//! [`ApiClient::call`]: crate::api::http::ApiClient::call

pub mod certifications;
pub mod collection;
pub mod comments;
pub mod educations;
pub mod experiences;
pub mod hackathons;
pub mod skills;
pub mod uploads;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::error::ApiFault;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Checks performed on request schemas before anything is sent.
pub trait Validate {
    /// # Errors
    /// `InvalidParams` describing the first problem found.
    fn validate(&self) -> Result<(), ApiFault>;
}

/// Backend identifier. The backend emits both numeric and string ids; they
/// are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(number) => Self(number.to_string()),
        })
    }
}

/// Rejects ids that would change the shape of the request path.
pub(crate) fn path_id<'a>(kind: &str, id: &'a str) -> Result<&'a str, ApiFault> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiFault::invalid(format!("{kind} id is required and cannot be empty.")));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ApiFault::invalid(format!(
            "{kind} id may only contain letters, digits, '-' and '_'."
        )));
    }
    Ok(id)
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ApiFault> {
    if value.trim().is_empty() {
        return Err(ApiFault::invalid(format!("{field} is required and cannot be empty.")));
    }
    Ok(())
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiFault> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ApiFault::invalid(format!("{field} must be in YYYY-MM-DD format, got {value}.")))
}

/// Both dates must parse, and the first may not come after the second.
/// Each side is a `(field name, value)` pair used in error messages.
pub(crate) fn validate_date_range(
    (start_field, start): (&str, Option<&str>),
    (end_field, end): (&str, Option<&str>),
) -> Result<(), ApiFault> {
    let start = start.map(|d| parse_date(start_field, d)).transpose()?;
    let end = end.map(|d| parse_date(end_field, d)).transpose()?;
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(ApiFault::invalid(format!(
            "{start_field} cannot be after {end_field}."
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn entity_id_accepts_numbers_and_strings() {
        let ids: Vec<EntityId> = serde_json::from_value(json!([12, "abc-1"])).unwrap();
        assert_eq!(ids[0].as_str(), "12");
        assert_eq!(ids[1].to_string(), "abc-1");
        assert_eq!(serde_json::to_value(&ids[0]).unwrap(), json!("12"));
    }

    #[rstest]
    #[case::uuid("8f14e45f-ceea-467f-a0e6-7b2b1c9f0e2a", true)]
    #[case::numeric("42", true)]
    #[case::empty("  ", false)]
    #[case::traversal("../admin", false)]
    #[case::query("1?x=2", false)]
    fn path_ids_are_restricted(#[case] id: &str, #[case] ok: bool) {
        assert_eq!(path_id("comment", id).is_ok(), ok);
    }

    #[rstest]
    #[case::open_ended(Some("2020-01-01"), None, true)]
    #[case::ordered(Some("2020-01-01"), Some("2021-06-30"), true)]
    #[case::reversed(Some("2022-01-01"), Some("2021-06-30"), false)]
    #[case::bad_format(Some("01-01-2020"), None, false)]
    fn date_ranges(#[case] start: Option<&str>, #[case] end: Option<&str>, #[case] ok: bool) {
        let result = validate_date_range(("start_date", start), ("end_date", end));
        assert_eq!(result.is_ok(), ok);
    }

    #[test]
    fn date_errors_name_the_field() {
        let err = validate_date_range(
            ("issue_date", Some("2024-05-01")),
            ("expiration_date", Some("2023-01-01")),
        )
        .unwrap_err();
        assert!(err.to_string().contains("issue_date cannot be after expiration_date"));
    }
}
