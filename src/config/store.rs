use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::mongodb_store::MongoDBConfig;

/// The persistence backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum StoreConfig {
    #[serde(rename = "mongo")]
    MongoDB(MongoDBConfig),
    /// Keeps users and items in process memory. Nothing survives a restart.
    #[serde(rename = "memory")]
    Memory,
}
