use super::{DefinitionFetcher, FetchError, RawDefinition};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const ITEM_API_PATH: &str = "api/v4/item";

/// Registry API client. One GET per call, no retries and no caching.
pub struct RegistryClient {
    base_url: Url,
    client: reqwest::Client,
}

impl RegistryClient {
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("aristotle-tooltip/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { base_url, client }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn item_api_url(&self, item_id: &str) -> String {
        format!(
            "{}/{}/{}/",
            self.base(),
            ITEM_API_PATH,
            urlencoding::encode(item_id)
        )
    }
}

#[async_trait]
impl DefinitionFetcher for RegistryClient {
    async fn fetch(&self, item_id: &str) -> Result<RawDefinition, FetchError> {
        let url = self.item_api_url(item_id);
        debug!(%url, "requesting item definition");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "no response from registry");
            FetchError::from_transport(&e)
        })?;

        let status = response.status();
        if let Some(err) = FetchError::from_status(status) {
            warn!(%url, %status, "registry rejected item request");
            return Err(err);
        }

        response.json::<RawDefinition>().await.map_err(|e| {
            warn!(%url, error = %e, "unreadable registry response");
            FetchError::from_transport(&e)
        })
    }

    fn item_link(&self, item_id: &str) -> String {
        format!("{}/item/{}/", self.base(), urlencoding::encode(item_id))
    }
}
