//! Identity provider collaborator.
//!
//! The pipeline never owns a session. It asks an [`IdentityProvider`] for the
//! current one on every call and forgets it afterwards, so a sign-out or an
//! expiry is observed by the very next request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::{HeaderMap, header::AUTHORIZATION};
use oauth2::AccessToken;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::api::{config::PORTFOLIO_ACCESS_TOKEN, error::ApiFault};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: AccessToken,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: AccessToken::new(access_token.into()),
            expires_at: None,
            user: None,
        }
    }

    #[must_use]
    pub const fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Read-only view of the identity provider, plus sign-out.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current session, or `None` when signed out or expired.
    ///
    /// # Errors
    /// `IdentityProvider` when the provider cannot be reached.
    async fn get_session(&self) -> Result<Option<Session>, ApiFault>;

    /// # Errors
    /// `IdentityProvider` when the provider cannot be reached.
    async fn get_user(&self) -> Result<Option<User>, ApiFault>;

    /// # Errors
    /// `IdentityProvider` when the provider cannot be reached.
    async fn sign_out(&self) -> Result<(), ApiFault>;
}

/// Holds at most one session in memory.
///
/// Built per MCP request from the caller's `Authorization` header, or once at
/// startup from `PORTFOLIO_ACCESS_TOKEN` for local development.
#[derive(Debug, Default)]
pub struct StaticSessionProvider {
    session: RwLock<Option<Session>>,
}

impl StaticSessionProvider {
    #[must_use]
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(None)
    }

    #[must_use]
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        Self::new(Some(Session::new(access_token)))
    }

    /// Uses the bearer token of an incoming request, if any.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let session = bearer_token(headers).map(Session::new);
        debug!(authenticated = session.is_some(), "session from request headers");
        Self::new(session)
    }

    /// The `PORTFOLIO_ACCESS_TOKEN` development session, if one is configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        PORTFOLIO_ACCESS_TOKEN.as_deref().map(Self::from_access_token)
    }
}

#[async_trait]
impl IdentityProvider for StaticSessionProvider {
    async fn get_session(&self) -> Result<Option<Session>, ApiFault> {
        let session = self.session.read().await.clone();
        Ok(session.filter(|session| !session.is_expired_at(Utc::now())))
    }

    async fn get_user(&self) -> Result<Option<User>, ApiFault> {
        Ok(self.get_session().await?.and_then(|session| session.user))
    }

    async fn sign_out(&self) -> Result<(), ApiFault> {
        self.session.write().await.take();
        Ok(())
    }
}

/// Extracts `<token>` from `Authorization: Bearer <token>`.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use http::HeaderValue;
    use rstest::rstest;

    #[tokio::test]
    async fn expired_session_reads_as_signed_out() {
        let session = Session::new("token").with_expiry(Utc::now() - Duration::minutes(1));
        let provider = StaticSessionProvider::new(Some(session));
        assert!(provider.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn live_session_returns_token_and_user() {
        let user = User {
            id: "user-1".to_string(),
            email: Some("ada@example.com".to_string()),
        };
        let session = Session::new("token")
            .with_expiry(Utc::now() + Duration::hours(1))
            .with_user(user.clone());
        let provider = StaticSessionProvider::new(Some(session));

        let current = provider.get_session().await.unwrap().unwrap();
        assert_eq!(current.access_token.secret(), "token");
        assert_eq!(provider.get_user().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn sign_out_clears_the_session() {
        let provider = StaticSessionProvider::from_access_token("token");
        provider.sign_out().await.unwrap();
        assert!(provider.get_session().await.unwrap().is_none());
        assert!(provider.get_user().await.unwrap().is_none());
    }

    #[rstest]
    #[case::bearer("Bearer abc.def", Some("abc.def"))]
    #[case::lowercase_scheme("bearer abc", Some("abc"))]
    #[case::basic("Basic dXNlcjpwYXNz", None)]
    #[case::empty_token("Bearer   ", None)]
    #[case::no_scheme("abc", None)]
    fn parses_bearer_header(#[case] header: &str, #[case] expected: Option<&str>) {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(header).unwrap());
        assert_eq!(bearer_token(&headers), expected);
    }

    #[tokio::test]
    async fn headers_without_authorization_are_anonymous() {
        let provider = StaticSessionProvider::from_headers(&HeaderMap::new());
        assert!(provider.get_session().await.unwrap().is_none());
    }
}
