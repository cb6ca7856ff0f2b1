#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use itemkeeper::auth::{AuthError, AuthorizationRequest, IdentityProvider, ProviderProfile};
use itemkeeper::config::{Config, ConfigV1};
use itemkeeper::models::{Item, NewItem, NewUser, User};
use itemkeeper::routes::create_router;
use itemkeeper::state::AppState;
use itemkeeper::store::{MemoryStore, Store, StoreError};
use mongodb::bson::oid::ObjectId;
use oauth2::url::Url;
use oauth2::CsrfToken;
use tower::ServiceExt;

pub const SESSION_COOKIE: &str = "itemkeeper.sid";

const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:8081
logging:
  level: "debug"
  format: "console"
store:
  type: memory
oauth:
  client_id: test-client
  client_secret: test-secret
  redirect_url: http://localhost:8081/auth/google/callback
session:
  cookie_name: "itemkeeper.sid"
  inactivity_timeout_secs: 600
"#;

pub fn load_test_config() -> ConfigV1 {
    let config: Config = Figment::new()
        .merge(Yaml::string(TEST_CONFIG))
        .extract()
        .expect("Failed to parse test config YAML");
    config.into_current()
}

/// An identity provider that never leaves the process: each known
/// authorization code maps to a fixed profile.
pub struct StubProvider {
    profiles: HashMap<String, ProviderProfile>,
}

impl StubProvider {
    pub fn new(profiles: Vec<(&str, ProviderProfile)>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|(code, profile)| (code.to_string(), profile))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StubProvider {
    fn get_name(&self) -> &str {
        "stub"
    }

    fn authorization_request(&self) -> AuthorizationRequest {
        let state = CsrfToken::new_random().secret().clone();
        AuthorizationRequest {
            url: format!("https://provider.test/consent?state={}", state),
            csrf_state: state,
            pkce_verifier: "stub-verifier".to_string(),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        _pkce_verifier: &str,
    ) -> Result<ProviderProfile, AuthError> {
        self.profiles
            .get(code)
            .cloned()
            .ok_or_else(|| AuthError::TokenExchange("invalid_grant".to_string()))
    }
}

/// A store whose user lookups work but whose item operations always fail.
pub struct BrokenItemStore {
    inner: MemoryStore,
}

impl BrokenItemStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
        }
    }

    fn failure() -> StoreError {
        StoreError::Unavailable("connection reset".to_string())
    }
}

#[async_trait]
impl Store for BrokenItemStore {
    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>, StoreError> {
        self.inner.find_user_by_google_id(google_id).await
    }

    async fn get_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        self.inner.get_user(id).await
    }

    async fn insert_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.inner.insert_user(new_user).await
    }

    async fn list_items(&self, _owner: &ObjectId) -> Result<Vec<Item>, StoreError> {
        Err(Self::failure())
    }

    async fn insert_item(&self, _new_item: NewItem, _owner: &ObjectId) -> Result<Item, StoreError> {
        Err(Self::failure())
    }

    async fn find_item(
        &self,
        _id: &ObjectId,
        _owner: &ObjectId,
    ) -> Result<Option<Item>, StoreError> {
        Err(Self::failure())
    }

    async fn delete_item(&self, _id: &ObjectId, _owner: &ObjectId) -> Result<bool, StoreError> {
        Err(Self::failure())
    }
}

pub fn profile(id: &str, name: &str, email: &str) -> ProviderProfile {
    ProviderProfile {
        id: id.to_string(),
        display_name: name.to_string(),
        emails: vec![email.to_string()],
    }
}

/// Router plus direct handles on its collaborators.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn Store>,
}

impl TestApp {
    pub fn new(profiles: Vec<(&str, ProviderProfile)>) -> Self {
        Self::with_store(profiles, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(profiles: Vec<(&str, ProviderProfile)>, store: Arc<dyn Store>) -> Self {
        let state = AppState {
            config: Arc::new(load_test_config()),
            store: store.clone(),
            identity: Arc::new(StubProvider::new(profiles)),
        };
        Self {
            router: create_router(state),
            store,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request should succeed")
    }

    /// Walks the full sign-in flow for `code` and returns the session cookie.
    pub async fn login(&self, code: &str) -> String {
        let (cookie, state) = self.start_login().await;
        let response = self
            .send(get(
                &format!("/auth/google/callback?code={}&state={}", code, state),
                Some(&cookie),
            ))
            .await;
        assert_eq!(location(&response), "/dashboard", "sign-in should succeed");
        session_cookie(&response).expect("sign-in should set a session cookie")
    }

    /// Requests the consent redirect; returns the pre-login cookie and issued state.
    pub async fn start_login(&self) -> (String, String) {
        let response = self.send(get("/auth/google", None)).await;
        assert!(response.status().is_redirection());
        let consent = Url::parse(&location(&response)).expect("consent URL should parse");
        let state = consent
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .expect("consent URL should carry state");
        let cookie = session_cookie(&response).expect("login should start a session");
        (cookie, state)
    }

    /// The signed-in user's internal id, read from `/profile`.
    pub async fn user_id(&self, cookie: &str) -> ObjectId {
        let response = self.send(get("/profile", Some(cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        ObjectId::parse_str(json["user"]["id"].as_str().expect("profile has id"))
            .expect("profile id is an ObjectId")
    }
}

pub fn request(method: Method, path: &str, cookie: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(body).expect("failed to build request")
}

pub fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    request(Method::GET, path, cookie, Body::empty())
}

pub fn delete(path: &str, cookie: Option<&str>) -> Request<Body> {
    request(Method::DELETE, path, cookie, Body::empty())
}

pub fn post_form(path: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut req = request(Method::POST, path, cookie, Body::from(form.to_string()));
    req.headers_mut().insert(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded".parse().unwrap(),
    );
    req
}

pub fn post_json(path: &str, cookie: Option<&str>, json: serde_json::Value) -> Request<Body> {
    let mut req = request(Method::POST, path, cookie, Body::from(json.to_string()));
    req.headers_mut()
        .insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
    req
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header missing")
        .to_str()
        .expect("Location header not valid UTF-8")
        .to_string()
}

/// The `name=value` pair of the session cookie set by a response, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter(|value| value.starts_with(&format!("{}=", SESSION_COOKIE)))
        .filter_map(|value| value.split(';').next())
        .map(str::to_string)
        .next()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("body should be JSON")
}

pub fn assert_redirects_home(response: &Response<Body>) {
    assert!(
        response.status().is_redirection(),
        "expected redirect, got {}",
        response.status()
    );
    assert_eq!(location(response), "/");
}
