use std::future::Future;
use std::time::Duration;

use crate::error::Error;
use crate::types::Track;

/// Opaque tenant segment the upstream proxy serves genre lookups under;
/// it is part of the route, not a resource id.
const GENRE_NAMESPACE: &str = "ee27c448-0cd6-469a-9a89-1d27dcd4ef87";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The remote search/enrichment boundary. Coordinators are generic over
/// this so tests can substitute a scripted double for the real client.
pub trait CatalogApi: Send + Sync {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Track>, Error>> + Send;

    fn track_genres(
        &self,
        track_id: &str,
    ) -> impl Future<Output = Result<Vec<String>, Error>> + Send;
}

pub struct CatalogClient {
    api_base: String,
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::default()
    }

    pub fn from_env(env: &crate::Env) -> Result<Self, Error> {
        Self::builder()
            .api_base(&env.catalog_base_url)
            .timeout(Duration::from_secs(env.catalog_timeout_secs))
            .build()
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, Error> {
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(Error::RemoteUnavailable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RemoteRejected { status, body });
        }

        let bytes = response.bytes().await.map_err(Error::RemoteUnavailable)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl CatalogApi for CatalogClient {
    async fn search(&self, query: &str) -> Result<Vec<Track>, Error> {
        let url = format!(
            "{}/tracks?q={}&include_external=audio",
            self.api_base,
            urlencoding::encode(query)
        );
        self.get_json(url).await
    }

    async fn track_genres(&self, track_id: &str) -> Result<Vec<String>, Error> {
        let url = format!(
            "{}/{}/track_id/{}",
            self.api_base,
            GENRE_NAMESPACE,
            urlencoding::encode(track_id)
        );
        self.get_json(url).await
    }
}

#[derive(Default)]
pub struct CatalogClientBuilder {
    api_base: Option<String>,
    timeout: Option<Duration>,
}

impl CatalogClientBuilder {
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<CatalogClient, Error> {
        let api_base = self
            .api_base
            .ok_or(Error::MissingBaseUrl)?
            .trim()
            .trim_end_matches('/')
            .to_string();
        if api_base.is_empty() {
            return Err(Error::MissingBaseUrl);
        }

        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(Error::Client)?;

        Ok(CatalogClient { api_base, http })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_api_base() {
        assert!(matches!(
            CatalogClient::builder().build(),
            Err(Error::MissingBaseUrl)
        ));
        assert!(matches!(
            CatalogClient::builder().api_base("  ").build(),
            Err(Error::MissingBaseUrl)
        ));
    }

    #[test]
    fn build_trims_trailing_slash() {
        let client = CatalogClient::builder()
            .api_base("https://api.example.com/")
            .build()
            .unwrap();
        assert_eq!(client.api_base(), "https://api.example.com");
    }
}
