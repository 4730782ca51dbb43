//! Portfolio Model Context Protocol implementation.
//!
//! `PortfolioMCPFactory` registers one tool per resource operation and
//! forwards each call to the matching leaf in `api::resources`. Calls act on
//! behalf of whoever made the MCP request: the bearer token of the incoming
//! HTTP request becomes the session for that call. Any other `Authorization`
//! scheme is treated as no session. Only a request with no `Authorization`
//! header at all may fall back to the `PORTFOLIO_ACCESS_TOKEN` development
//! session, and only when `PORTFOLIO_DEV_SESSION_FALLBACK` is on.

pub mod tools;

use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::http::{HeaderMap, header::AUTHORIZATION, request};
use rmcp::{
    ErrorData, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Implementation, InitializeRequestParam, InitializeResult,
        ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use tracing::{info, warn};

use crate::api::{
    config::{ApiConfig, PORTFOLIO_DEV_SESSION_FALLBACK},
    http::ApiClient,
    resources::{
        comments::{ListCommentsQuery, NewComment},
        skills::SkillsQuery,
        uploads::PresignedUrlRequest,
    },
    session::{IdentityProvider, StaticSessionProvider, bearer_token},
    skill_lookup::SkillLookup,
};
use crate::mcp::tools::{
    comments::{self, ReactToCommentRequest, ReplyToCommentRequest},
    portfolio::{
        self, CreateEntryRequest, EntryMetadataRequest, EntryRequest, ReorderEntryRequest,
        SectionRequest, UpdateEntryRequest,
    },
    skills::{self, SkillLookupRequest},
    uploads,
};

#[derive(Clone)]
pub struct PortfolioMCPFactory {
    tool_router: ToolRouter<Self>,
    client: ApiClient,
    skill_lookup: Option<SkillLookup>,
    dev_session: Option<Arc<dyn IdentityProvider>>,
}

#[tool_router]
impl PortfolioMCPFactory {
    /// # Errors
    /// Fails when `PORTFOLIO_API_BASE_URL` is missing or the HTTP client
    /// cannot be built.
    pub fn new() -> Result<Self> {
        // Fail fast if the backend is not configured
        let config = ApiConfig::from_env()
            .map_err(|e| anyhow!("Failed to load PORTFOLIO_API_BASE_URL: {e}"))?;
        let client = ApiClient::new(config, Arc::new(StaticSessionProvider::anonymous()))?;

        // Optional: skill suggestions are disabled without an API key
        let skill_lookup = match SkillLookup::from_env() {
            Ok(lookup) => Some(lookup),
            Err(e) => {
                warn!("skill lookup disabled: {e}");
                None
            }
        };

        let factory = Self::with_clients(client, skill_lookup);
        if !*PORTFOLIO_DEV_SESSION_FALLBACK {
            return Ok(factory);
        }
        match StaticSessionProvider::from_env() {
            Some(session) => {
                warn!("development session fallback enabled for requests without Authorization");
                Ok(factory.with_dev_session(Arc::new(session)))
            }
            None => {
                warn!("PORTFOLIO_DEV_SESSION_FALLBACK is set but PORTFOLIO_ACCESS_TOKEN is not");
                Ok(factory)
            }
        }
    }

    /// The identity `client` was built with is never used: every call acts
    /// as the session derived from its own request headers.
    #[must_use]
    pub fn with_clients(client: ApiClient, skill_lookup: Option<SkillLookup>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            client,
            skill_lookup,
            dev_session: None,
        }
    }

    /// Session used for requests that carry no `Authorization` header.
    #[must_use]
    pub fn with_dev_session(mut self, session: Arc<dyn IdentityProvider>) -> Self {
        self.dev_session = Some(session);
        self
    }

    /// The API client acting as the caller of this MCP request.
    fn client_for(&self, context: &RequestContext<RoleServer>) -> ApiClient {
        self.client_for_headers(
            context
                .extensions
                .get::<request::Parts>()
                .map(|parts| &parts.headers),
        )
    }

    fn client_for_headers(&self, headers: Option<&HeaderMap>) -> ApiClient {
        let identity: Arc<dyn IdentityProvider> = match headers {
            Some(headers) if headers.contains_key(AUTHORIZATION) => {
                Arc::new(StaticSessionProvider::from_headers(headers))
            }
            _ => self
                .dev_session
                .clone()
                .unwrap_or_else(|| Arc::new(StaticSessionProvider::anonymous())),
        };
        self.client.with_identity(identity)
    }

    // Thin delegating methods so the `tool_router` proc-macro can discover
    // and register the tools. The implementations live in `mcp::tools::*`.

    #[tool(description = "List comments on a blog post or portfolio, newest first. Pass the cursor from the previous page to continue; no cursor in the result means the last page.")]
    async fn list_comments(
        &self,
        params: Parameters<ListCommentsQuery>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        comments::list_comments(&self.client_for(&context), params).await
    }

    #[tool(description = "Post a new top-level comment on a blog post or portfolio. Requires a signed-in user.")]
    async fn create_comment(
        &self,
        params: Parameters<NewComment>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        comments::create_comment(&self.client_for(&context), params).await
    }

    #[tool(description = "Reply to an existing comment. Requires a signed-in user.")]
    async fn reply_to_comment(
        &self,
        params: Parameters<ReplyToCommentRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        comments::reply_to_comment(&self.client_for(&context), params).await
    }

    #[tool(description = "Add or remove a reaction (e.g. like) on a comment. Requires a signed-in user.")]
    async fn react_to_comment(
        &self,
        params: Parameters<ReactToCommentRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        comments::react_to_comment(&self.client_for(&context), params).await
    }

    #[tool(description = "List skills from the portfolio skill catalogue, optionally filtered by name. Paginated by cursor.")]
    async fn list_skills(
        &self,
        params: Parameters<SkillsQuery>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        skills::list_skills(&self.client_for(&context), params).await
    }

    #[tool(description = "Suggest skill names for a partial query using the external skills service.")]
    async fn lookup_skills(
        &self,
        params: Parameters<SkillLookupRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        skills::lookup_skills(self.skill_lookup.as_ref(), params, &context.ct).await
    }

    #[tool(description = "List the signed-in user's entries in one portfolio section: certifications, educations, experiences or hackathons.")]
    async fn list_portfolio_section(
        &self,
        params: Parameters<SectionRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        portfolio::list_portfolio_section(&self.client_for(&context), params).await
    }

    #[tool(description = "Create an entry in a portfolio section. Dates use YYYY-MM-DD.")]
    async fn create_portfolio_entry(
        &self,
        params: Parameters<CreateEntryRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        portfolio::create_portfolio_entry(&self.client_for(&context), params).await
    }

    #[tool(description = "Replace an existing portfolio entry by id. Dates use YYYY-MM-DD.")]
    async fn update_portfolio_entry(
        &self,
        params: Parameters<UpdateEntryRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        portfolio::update_portfolio_entry(&self.client_for(&context), params).await
    }

    #[tool(description = "Delete a portfolio entry by section and id.")]
    async fn delete_portfolio_entry(
        &self,
        params: Parameters<EntryRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        portfolio::delete_portfolio_entry(&self.client_for(&context), params).await
    }

    #[tool(description = "Move a portfolio entry to a new zero-based position. The server decides the final order, so list the section again afterwards.")]
    async fn reorder_portfolio_entry(
        &self,
        params: Parameters<ReorderEntryRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        portfolio::reorder_portfolio_entry(&self.client_for(&context), params).await
    }

    #[tool(description = "Set metadata keys (e.g. featured, visibility) on a certification, education or hackathon entry.")]
    async fn update_portfolio_entry_metadata(
        &self,
        params: Parameters<EntryMetadataRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        portfolio::update_portfolio_entry_metadata(&self.client_for(&context), params).await
    }

    #[tool(description = "Get presigned URLs for uploading files (avatars, certificates, cover images). Upload the bytes to each url and keep the returned key.")]
    async fn create_presigned_urls(
        &self,
        params: Parameters<PresignedUrlRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        uploads::create_presigned_urls(&self.client_for(&context), params).await
    }
}

#[tool_handler]
impl ServerHandler for PortfolioMCPFactory {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Portfolio MCP Server: comments, skills, portfolio sections and uploads. Forward the user's bearer token in the Authorization header."
                    .to_string(),
            ),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, ErrorData> {
        if let Some(http_request_part) = context.extensions.get::<request::Parts>() {
            let initialize_uri = &http_request_part.uri;
            let authenticated = bearer_token(&http_request_part.headers).is_some();
            info!(%initialize_uri, authenticated, "initialize from http server");
        }
        Ok(self.get_info())
    }
}
