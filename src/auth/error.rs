use oauth2::basic::BasicErrorResponse;
use oauth2::{HttpClientError, RequestTokenError};
use thiserror::Error;

use crate::store::StoreError;

/// Everything that can make a sign-in attempt fail. None of these details
/// reach the client; a failed sign-in is a redirect to the home page.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid OAuth endpoint URL: {0}")]
    InvalidEndpoint(#[from] oauth2::url::ParseError),

    #[error("HTTP request to identity provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authorization code exchange failed: {0}")]
    TokenExchange(String),

    #[error("identity provider returned an error: {0}")]
    ProviderDenied(String),

    #[error("callback is missing `{0}`")]
    MissingParameter(&'static str),

    #[error("no sign-in is in progress for this session")]
    NoPendingLogin,

    #[error("OAuth state does not match the one issued")]
    StateMismatch,

    #[error("provider profile has no email address")]
    MissingEmail,

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<RequestTokenError<HttpClientError<oauth2::reqwest::Error>, BasicErrorResponse>>
    for AuthError
{
    fn from(e: RequestTokenError<HttpClientError<oauth2::reqwest::Error>, BasicErrorResponse>) -> Self {
        let detail = match e {
            RequestTokenError::ServerResponse(err) => err.error().to_string(),
            RequestTokenError::Request(req_e) => format!("request failed: {}", req_e),
            RequestTokenError::Parse(parse_err, _body) => {
                format!("unparseable token response: {}", parse_err)
            }
            RequestTokenError::Other(s) => s,
        };
        AuthError::TokenExchange(detail)
    }
}
