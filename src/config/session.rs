use std::num::NonZeroU32;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Cookie and lifetime settings for server-side sessions.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Only send the session cookie over HTTPS.
    #[serde(default)]
    pub secure: bool,
    /// Sessions expire after this many seconds without a request.
    #[serde(default = "default_inactivity_timeout_secs")]
    pub inactivity_timeout_secs: NonZeroU32,
    /// Upper bound on sessions held at once; the least useful are evicted first.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

fn default_cookie_name() -> String {
    "itemkeeper.sid".to_string()
}

fn default_inactivity_timeout_secs() -> NonZeroU32 {
    NonZeroU32::new(24 * 60 * 60).unwrap_or(NonZeroU32::MIN)
}

fn default_max_sessions() -> u64 {
    100_000
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            cookie_name: default_cookie_name(),
            secure: false,
            inactivity_timeout_secs: default_inactivity_timeout_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}
