//! Credential resolution: session in, bearer token (or an explicit anonymous marker) out.

use oauth2::AccessToken;
use tracing::{debug, warn};

use crate::api::{error::ApiFault, session::IdentityProvider};

#[derive(Debug, Clone)]
pub enum Credential {
    Bearer(AccessToken),
    /// No session, and the caller opted into anonymous continuation.
    Anonymous,
}

impl Credential {
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    #[must_use]
    pub fn authorization_value(&self) -> Option<String> {
        match self {
            Self::Bearer(token) => Some(format!("Bearer {}", token.secret())),
            Self::Anonymous => None,
        }
    }
}

/// Reads the provider's current session.
///
/// # Errors
/// `NoSession` when there is no session and `allow_anonymous` is false.
/// Provider failures are passed through unchanged.
pub async fn resolve_credential(
    provider: &dyn IdentityProvider,
    allow_anonymous: bool,
) -> Result<Credential, ApiFault> {
    match provider.get_session().await? {
        Some(session) => Ok(Credential::Bearer(session.access_token)),
        None if allow_anonymous => {
            debug!("no session, continuing anonymously");
            Ok(Credential::Anonymous)
        }
        None => {
            warn!("no session for an authenticated request");
            Err(ApiFault::NoSession)
        }
    }
}
