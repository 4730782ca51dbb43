//! Third-party skill name lookup.
//!
//! Called directly, not through the backend: no session and no bearer token,
//! only the service's API key. This is the one call that can be cancelled
//! while in flight.

use std::collections::HashSet;

use http::{
    HeaderValue,
    header::{ACCEPT, CACHE_CONTROL},
};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::{config::SkillLookupConfig, error::ApiFault, http::build_http_client};

const API_KEY_HEADER: &str = "apikey";
const BODY_PREVIEW_CHARS: usize = 160;

#[derive(Debug, Clone)]
pub struct SkillLookup {
    http: ClientWithMiddleware,
    endpoint: Url,
    api_key: SecretString,
}

impl SkillLookup {
    /// # Errors
    /// Returns `Transport` if the HTTP client cannot be built.
    pub fn new(config: SkillLookupConfig) -> Result<Self, ApiFault> {
        Ok(Self {
            http: build_http_client()?,
            endpoint: config.endpoint,
            api_key: config.api_key,
        })
    }

    /// # Errors
    /// `MissingConfig` when `SKILLS_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ApiFault> {
        Self::new(SkillLookupConfig::from_env()?)
    }

    /// Skill names matching `query`, de-duplicated in the order returned.
    ///
    /// A blank query returns an empty list without touching the network.
    ///
    /// # Errors
    /// `Cancelled` when `cancel` fires first, `UpstreamStatus` on a non-2xx
    /// answer, `MalformedResponse` when the body is not a list of strings.
    pub async fn lookup(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, ApiFault> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", query);
        let mut api_key = HeaderValue::from_str(self.api_key.expose_secret())
            .map_err(|_| ApiFault::MissingConfig("SKILLS_API_KEY is not a valid header value".to_string()))?;
        api_key.set_sensitive(true);

        let request = self
            .http
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled(query)),
            response = request.send() => response?,
        };

        let status = response.status();
        let body = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled(query)),
            body = response.bytes() => body?,
        };

        if !status.is_success() {
            return Err(ApiFault::UpstreamStatus {
                status: status.as_u16(),
                body: body_preview(&body),
            });
        }

        let names: Vec<String> = serde_json::from_slice(&body).map_err(|e| {
            ApiFault::malformed(status.as_u16(), format!("expected a list of skill names: {e}"))
        })?;
        let skills = dedup_preserving_order(names);
        debug!(query, count = skills.len(), "skill lookup finished");
        Ok(skills)
    }
}

fn cancelled(query: &str) -> ApiFault {
    info!(query, "skill lookup cancelled");
    ApiFault::Cancelled
}

fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && seen.insert(name.to_lowercase()))
        .collect()
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    compact.chars().take(BODY_PREVIEW_CHARS).collect()
}
