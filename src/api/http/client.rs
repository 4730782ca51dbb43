//! Authenticated request dispatch for the portfolio backend.
//!
//! This module provides:
//! - `RequestDescriptor`: method, path, query, headers, body and the per-call anonymous flag
//! - `ApiClient`: resolves a credential, decorates the request and sends it
//! - A shared HTTP client with tracing middleware, also used by the skill lookup
//!
//! Dispatch never inspects status codes and never retries; see
//! [`crate::api::envelope`] for what happens to the response afterwards.

use std::sync::Arc;

use http::{
    Extensions, HeaderMap, HeaderName, HeaderValue, Method,
    header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, PRAGMA},
};
use reqwest::{Request, Response, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Result as MiddlewareResult};
use reqwest_tracing::{
    ReqwestOtelSpanBackend, TracingMiddleware, default_on_request_end, reqwest_otel_span,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{Span, debug};

use crate::api::{
    config::ApiConfig,
    credential::{Credential, resolve_credential},
    envelope::{ServiceResult, normalize},
    error::ApiFault,
    session::IdentityProvider,
};

// Custom span backend for reqwest-tracing.
// Note: This struct is only used as a type parameter of TracingMiddleware,
// which the dead code lint can't see.
#[allow(dead_code)]
struct PortfolioTracing;

impl ReqwestOtelSpanBackend for PortfolioTracing {
    fn on_request_start(req: &Request, _extension: &mut Extensions) -> Span {
        // Authorization and API key values are marked sensitive and print as `Sensitive`.
        reqwest_otel_span!(
            name = "portfolio-api-request",
            req,
            request_headers = ?req.headers(),
        )
    }

    fn on_request_end(
        span: &Span,
        outcome: &MiddlewareResult<Response>,
        _extension: &mut Extensions,
    ) {
        default_on_request_end(span, outcome);
    }
}

/// Builds the pooled, traced HTTP client. No timeout is set here; the
/// transport defaults apply.
/// # Errors
/// `Transport` if the TLS backend cannot be initialized.
pub fn build_http_client() -> Result<ClientWithMiddleware, ApiFault> {
    let client = reqwest::Client::builder().build()?;
    Ok(ClientBuilder::new(client)
        .with(TracingMiddleware::<PortfolioTracing>::new())
        .build())
}

/// Everything needed to issue one backend call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the configured base URL, e.g. `/comments`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    /// Proceed without `Authorization` when there is no session.
    pub allow_anonymous: bool,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            allow_anonymous: false,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Appends `key=value` only when a value is present.
    #[must_use]
    pub fn query_opt(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    /// `Serialization` if `body` cannot be encoded.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiFault> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    #[must_use]
    pub const fn allow_anonymous(mut self) -> Self {
        self.allow_anonymous = true;
        self
    }
}

/// Client for the portfolio backend.
///
/// Cloning is cheap; clones share the connection pool. Use
/// [`ApiClient::with_identity`] to act on behalf of a different session.
#[derive(Clone)]
pub struct ApiClient {
    http: ClientWithMiddleware,
    base_url: Url,
    identity: Arc<dyn IdentityProvider>,
}

impl ApiClient {
    /// # Errors
    /// Returns `Transport` if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig, identity: Arc<dyn IdentityProvider>) -> Result<Self, ApiFault> {
        Ok(Self {
            http: build_http_client()?,
            base_url: config.base_url,
            identity,
        })
    }

    #[must_use]
    pub fn with_identity(&self, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            identity,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends the segments of `path` to the base URL, keeping any path
    /// prefix the base has.
    ///
    /// # Errors
    /// `InvalidParams` if the base URL cannot take path segments.
    pub fn endpoint(&self, path: &str, query: &[(String, String)]) -> Result<Url, ApiFault> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| ApiFault::invalid(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Resolves the credential, decorates and sends the request.
    ///
    /// The credential is resolved before any network I/O, so a missing
    /// session fails without touching the backend.
    ///
    /// # Errors
    /// `NoSession` from the resolver, `Transport` for network failures,
    /// `InvalidParams` for an unusable path.
    pub async fn dispatch(&self, descriptor: RequestDescriptor) -> Result<Response, ApiFault> {
        let credential =
            resolve_credential(self.identity.as_ref(), descriptor.allow_anonymous).await?;
        let url = self.endpoint(&descriptor.path, &descriptor.query)?;
        let headers = decorate_headers(descriptor.headers, &credential, descriptor.body.is_some())?;

        debug!(
            method = %descriptor.method,
            %url,
            anonymous = credential.is_anonymous(),
            "dispatching portfolio API request"
        );

        let mut request = self.http.request(descriptor.method, url).headers(headers);
        if let Some(body) = descriptor.body {
            request = request.body(body);
        }

        Ok(request.send().await?)
    }

    /// [`dispatch`](Self::dispatch) followed by [`normalize`].
    ///
    /// # Errors
    /// Every fault of `dispatch`, plus `MalformedResponse` from normalization.
    pub async fn call<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<ServiceResult<T>, ApiFault> {
        let method = descriptor.method.clone();
        let response = self.dispatch(descriptor).await?;
        normalize(&method, response).await
    }
}

/// Applies the headers every backend request carries.
///
/// Caller headers go in first. `Authorization` is always replaced by the
/// resolved credential (or removed for anonymous calls), and caching is
/// always disabled.
fn decorate_headers(
    mut headers: HeaderMap,
    credential: &Credential,
    has_body: bool,
) -> Result<HeaderMap, ApiFault> {
    headers.remove(AUTHORIZATION);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers
        .entry(ACCEPT)
        .or_insert(HeaderValue::from_static("application/json"));
    if has_body {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    if let Some(value) = credential.authorization_value() {
        let mut value = HeaderValue::from_str(&value)
            .map_err(|_| ApiFault::invalid("access token is not a valid header value"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
