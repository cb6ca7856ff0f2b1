use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use tracing::{debug, info};

use super::{AuthError, AuthorizationRequest, IdentityProvider, ProviderProfile};
use crate::config::OAuthConfig;

const SCOPES: [&str; 2] = ["profile", "email"];

type GoogleOAuthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Subset of the OpenID Connect userinfo response we care about.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    name: Option<String>,
    email: Option<String>,
}

impl From<GoogleUserInfo> for ProviderProfile {
    fn from(info: GoogleUserInfo) -> Self {
        ProviderProfile {
            id: info.sub,
            display_name: info.name.unwrap_or_default(),
            emails: info.email.into_iter().collect(),
        }
    }
}

/// Signs users in with Google's OAuth2 authorization code flow (with PKCE).
pub struct GoogleProvider {
    client: GoogleOAuthClient,
    http_client: reqwest::Client,
    userinfo_url: String,
}

impl GoogleProvider {
    pub fn new(config: &OAuthConfig) -> Result<Self, AuthError> {
        info!("Creating Google identity provider, callback '{}'", config.redirect_url);

        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(config.auth_url.clone())?)
            .set_token_uri(TokenUrl::new(config.token_url.clone())?)
            .set_redirect_uri(RedirectUrl::new(config.redirect_url.clone())?);

        // Following redirects from the token endpoint would leak the code.
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            http_client,
            userinfo_url: config.userinfo_url.clone(),
        })
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, AuthError> {
        let info = self
            .http_client
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<GoogleUserInfo>()
            .await?;
        debug!("Fetched Google profile for subject '{}'", info.sub);
        Ok(info.into())
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn get_name(&self) -> &str {
        "google"
    }

    fn authorization_request(&self) -> AuthorizationRequest {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let (url, csrf_token) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(SCOPES.iter().map(|s| Scope::new(s.to_string())))
            .set_pkce_challenge(pkce_challenge)
            .url();

        AuthorizationRequest {
            url: url.to_string(),
            csrf_state: csrf_token.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<ProviderProfile, AuthError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_string()))
            .request_async(&self.http_client)
            .await?;

        self.fetch_profile(token.access_token().secret()).await
    }
}
