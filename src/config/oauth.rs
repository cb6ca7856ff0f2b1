use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Client registration for the Google OAuth2 identity provider.
///
/// The endpoint URLs default to Google's public endpoints and only need
/// overriding when pointing at a test double.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_userinfo_url")]
    pub userinfo_url: String,
}

fn default_redirect_url() -> String {
    "http://localhost:3000/auth/google/callback".to_string()
}

fn default_auth_url() -> String {
    GOOGLE_AUTH_URL.to_string()
}

fn default_token_url() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

fn default_userinfo_url() -> String {
    GOOGLE_USERINFO_URL.to_string()
}
