//! HTTP implementation of [`NeighbourClient`] using `reqwest`.

use super::{NeighbourClient, NeighbourResponse, TransportError};
use crate::config::ExplorerConfig;
use crate::graph::EntityType;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

/// Backend client speaking the network/enrichment HTTP endpoints
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    network_url: Url,
    enrich_url: Url,
}

impl HttpClient {
    pub fn new(network_url: Url, enrich_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            network_url,
            enrich_url,
        }
    }

    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self::new(config.network_url.clone(), config.enrich_url.clone())
    }

    /// `<enrich-url>/<key>`, with the key encoded as a single path segment
    fn enrich_target(&self, key: &str) -> Result<Url, TransportError> {
        let mut url = self.enrich_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                TransportError::Network(format!("cannot append a path to {}", self.enrich_url))
            })?
            .pop_if_empty()
            .push(key);
        Ok(url)
    }
}

fn network_error(e: reqwest::Error) -> TransportError {
    TransportError::Network(e.to_string())
}

#[async_trait]
impl NeighbourClient for HttpClient {
    async fn neighbours(
        &self,
        entity_type: EntityType,
        key: &str,
    ) -> Result<Vec<Value>, TransportError> {
        let response = self
            .http
            .get(self.network_url.clone())
            .query(&[("key", key), ("label", entity_type.as_str())])
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body: NeighbourResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        debug!(%entity_type, key, count = body.neighbours.len(), "fetched neighbours");
        Ok(body.neighbours)
    }

    async fn enrich(&self, key: &str) -> Result<(), TransportError> {
        let url = self.enrich_target(key)?;
        let response = self.http.post(url).send().await.map_err(network_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(())
    }
}
