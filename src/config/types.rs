use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::oauth::OAuthConfig;
use super::session::SessionConfig;
use super::store::StoreConfig;

/// Environment variable naming the YAML config file.
pub const CONFIG_PATH_ENV: &str = "ITEMKEEPER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// Conventional variable names accepted on top of the prefixed ones.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("MONGODB_URI", "store.uri"),
    ("GOOGLE_CLIENT_ID", "oauth.client_id"),
    ("GOOGLE_CLIENT_SECRET", "oauth.client_secret"),
    ("GOOGLE_CALLBACK_URL", "oauth.redirect_url"),
];

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    pub store: StoreConfig,
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Unwraps the versioned config into the current shape.
    pub fn into_current(self) -> ConfigV1 {
        match self {
            Config::ConfigV1(c) => c,
        }
    }
}

/// Builds the figment used to load configuration: the YAML file, then
/// `ITEMKEEPER_*` variables, then the conventional unprefixed ones.
pub fn figment(path: &str) -> Figment {
    Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed("ITEMKEEPER_").ignore(&["CONFIG"]).split("__"))
        .merge(
            Env::raw()
                .only(&LEGACY_ENV_KEYS.iter().map(|(k, _)| *k).collect::<Vec<_>>())
                .map(|key| legacy_key(key.as_str()).into()),
        )
}

/// Maps a conventional environment variable to its config key.
fn legacy_key(env_key: &str) -> String {
    LEGACY_ENV_KEYS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(env_key))
        .map(|(_, key)| key.to_string())
        .unwrap_or_else(|| env_key.to_lowercase())
}

/// Load config from the YAML file named by `ITEMKEEPER_CONFIG`
/// (default "./config.yaml") layered with environment overrides.
pub fn load_config() -> Result<ConfigV1, figment::Error> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = figment(&path).extract::<Config>()?;
    Ok(config.into_current())
}

/// Render the JSON schema for the configuration.
pub fn config_schema() -> Result<String, serde_json::Error> {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema)
}
