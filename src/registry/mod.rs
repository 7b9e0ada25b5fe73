pub mod client;
pub mod error;

pub use client::RegistryClient;
pub use error::FetchError;

use crate::text::{normalize, WordLimits};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Item record as served by `GET /api/v4/item/{id}/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDefinition {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub definition: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub short_definition: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Display-ready definition of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionResult {
    pub name: String,
    pub short_definition: String,
    pub long_definition: String,
    pub source_link: String,
}

impl DefinitionResult {
    pub fn from_raw(raw: RawDefinition, source_link: String, limits: WordLimits) -> Self {
        Self {
            name: raw.name,
            short_definition: normalize(&raw.short_definition, limits.short),
            long_definition: normalize(&raw.definition, limits.long),
            source_link,
        }
    }
}

#[async_trait]
pub trait DefinitionFetcher: Send + Sync {
    async fn fetch(&self, item_id: &str) -> Result<RawDefinition, FetchError>;

    /// Human-facing page for the item.
    fn item_link(&self, item_id: &str) -> String;
}
