//! Environment-based configuration for the portfolio backend and the skill lookup service.

use std::{env, sync::LazyLock};

use anyhow::{Result, anyhow};
use reqwest::Url;
use secrecy::SecretString;

use crate::api::error::ApiFault;

pub const DEFAULT_SKILLS_API_URL: &str = "https://api.apilayer.com/skills";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

// Load configuration from environment variables
pub static PORTFOLIO_API_BASE_URL: LazyLock<Result<String>> = LazyLock::new(|| {
    env::var("PORTFOLIO_API_BASE_URL")
        .map_err(|e| anyhow!("PORTFOLIO_API_BASE_URL must be set: {e}"))
});

pub static SKILLS_API_URL: LazyLock<Result<String>> = LazyLock::new(|| {
    Ok(env::var("SKILLS_API_URL").unwrap_or_else(|_| DEFAULT_SKILLS_API_URL.to_string()))
});

pub static SKILLS_API_KEY: LazyLock<Result<String>> = LazyLock::new(|| {
    env::var("SKILLS_API_KEY").map_err(|e| anyhow!("SKILLS_API_KEY must be set: {e}"))
});

/// Optional development session used when a caller does not forward its own.
pub static PORTFOLIO_ACCESS_TOKEN: LazyLock<Option<String>> = LazyLock::new(|| {
    env::var("PORTFOLIO_ACCESS_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty())
});

/// Opt-in: requests without an `Authorization` header act as the
/// `PORTFOLIO_ACCESS_TOKEN` session. Off unless set to `true` or `1`.
pub static PORTFOLIO_DEV_SESSION_FALLBACK: LazyLock<bool> = LazyLock::new(|| {
    env::var("PORTFOLIO_DEV_SESSION_FALLBACK")
        .is_ok_and(|flag| matches!(flag.trim().to_ascii_lowercase().as_str(), "true" | "1"))
});

pub static BIND_ADDRESS: LazyLock<String> = LazyLock::new(|| {
    env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string())
});

fn read(setting: &LazyLock<Result<String>>) -> Result<&str, ApiFault> {
    setting
        .as_ref()
        .map(String::as_str)
        .map_err(|e| ApiFault::MissingConfig(e.to_string()))
}

fn parse_url(name: &str, raw: &str) -> Result<Url, ApiFault> {
    Url::parse(raw).map_err(|e| ApiFault::MissingConfig(format!("{name} is not a valid URL: {e}")))
}

/// Where the portfolio backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
}

impl ApiConfig {
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// # Errors
    /// `MissingConfig` unless `base_url` is an absolute URL without a query
    /// or fragment.
    pub fn parse(base_url: &str) -> Result<Self, ApiFault> {
        let url = parse_url("PORTFOLIO_API_BASE_URL", base_url)?;
        if url.cannot_be_a_base() || url.query().is_some() || url.fragment().is_some() {
            return Err(ApiFault::MissingConfig(format!(
                "PORTFOLIO_API_BASE_URL must be a plain base URL without query or fragment, got {base_url}"
            )));
        }
        Ok(Self::new(url))
    }

    /// # Errors
    /// `MissingConfig` when `PORTFOLIO_API_BASE_URL` is unset or not a URL.
    pub fn from_env() -> Result<Self, ApiFault> {
        Self::parse(read(&PORTFOLIO_API_BASE_URL)?)
    }
}

/// Endpoint and key for the third-party skill lookup service.
#[derive(Debug, Clone)]
pub struct SkillLookupConfig {
    pub endpoint: Url,
    pub api_key: SecretString,
}

impl SkillLookupConfig {
    /// # Errors
    /// `MissingConfig` for a blank key or an endpoint that is not a URL.
    pub fn parse(endpoint: &str, api_key: impl Into<String>) -> Result<Self, ApiFault> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ApiFault::MissingConfig(
                "SKILLS_API_KEY cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            endpoint: parse_url("SKILLS_API_URL", endpoint)?,
            api_key: SecretString::new(api_key),
        })
    }

    /// # Errors
    /// `MissingConfig` when `SKILLS_API_KEY` is unset or the endpoint is not a URL.
    pub fn from_env() -> Result<Self, ApiFault> {
        Self::parse(read(&SKILLS_API_URL)?, read(&SKILLS_API_KEY)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use secrecy::ExposeSecret;

    #[test]
    fn api_config_rejects_relative_urls() {
        let err = ApiConfig::parse("/api/v1").expect_err("relative URL must fail");
        assert!(matches!(err, ApiFault::MissingConfig(_)));
    }

    #[rstest]
    #[case::query("https://api.example.com/v1?tenant=a")]
    #[case::fragment("https://api.example.com/v1#top")]
    #[case::not_a_base("mailto:api@example.com")]
    fn api_config_rejects_non_base_urls(#[case] raw: &str) {
        assert!(matches!(ApiConfig::parse(raw), Err(ApiFault::MissingConfig(_))));
    }

    #[test]
    fn skill_lookup_config_requires_key() {
        let err = SkillLookupConfig::parse(DEFAULT_SKILLS_API_URL, "  ")
            .expect_err("blank key must fail");
        assert!(matches!(err, ApiFault::MissingConfig(_)));
    }

    #[test]
    fn skill_lookup_config_debug_hides_key() {
        let config = SkillLookupConfig::parse(DEFAULT_SKILLS_API_URL, "secret-key").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("REDACTED"));
        assert_eq!(config.api_key.expose_secret(), "secret-key");
    }

    #[test]
    fn skill_lookup_keeps_key_out_of_debug() {
        let config = SkillLookupConfig::parse(DEFAULT_SKILLS_API_URL, "secret-key").unwrap();
        let lookup = crate::api::skill_lookup::SkillLookup::new(config).unwrap();
        assert!(!format!("{lookup:?}").contains("secret-key"));
    }
}
