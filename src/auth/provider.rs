use async_trait::async_trait;

use super::AuthError;

/// Identity attributes returned by an external identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProfile {
    /// Provider-issued subject identifier.
    pub id: String,
    pub display_name: String,
    pub emails: Vec<String>,
}

/// Where to send the browser to start a sign-in, plus the secrets that must
/// be kept in the session until the provider calls back.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub csrf_state: String,
    pub pkce_verifier: String,
}

/// An OAuth2 identity provider. The web layer only ever talks to this trait,
/// so tests can swap in a provider that never leaves the process.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn get_name(&self) -> &str;

    /// Build a consent URL with fresh CSRF state and PKCE challenge.
    fn authorization_request(&self) -> AuthorizationRequest;

    /// Trade an authorization code for the signed-in user's profile.
    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<ProviderProfile, AuthError>;
}
