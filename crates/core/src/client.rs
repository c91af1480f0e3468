use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use crate::{
    config::ClientConfig,
    contract::ContractVariant,
    error::{ApiError, Result},
    normalize::{ResponseNormalizer, upstream_detail},
    types::{
        HealthStatus, MomentMatches, MomentSearchRequest, SearchRequest, SearchResult,
        SummarizeRequest, SummaryText,
    },
};

/// The three request kinds the controllers issue. Each call resolves to
/// exactly one value or one error; nothing is retried.
#[async_trait]
pub trait VideoApi: Send + Sync {
    async fn search(&self, request: SearchRequest) -> Result<SearchResult>;

    async fn search_within_video(&self, request: MomentSearchRequest) -> Result<MomentMatches>;

    async fn summarize(&self, request: SummarizeRequest) -> Result<SummaryText>;
}

pub struct ApiClient {
    base_url: String,
    timeout: Duration,
    normalizer: ResponseNormalizer,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, contract: ContractVariant, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                endpoint: base_url.to_string(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            normalizer: ResponseNormalizer::new(contract),
            client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.base_url, config.contract, config.timeout())
    }

    pub fn contract(&self) -> ContractVariant {
        self.normalizer.variant()
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let path = self.normalizer.wire().health_path;
        let body = self.send(path, self.client.get(self.url(path))).await?;
        self.normalizer.health(&body)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and return its JSON body, folding every transport
    /// level failure into an `ApiError`.
    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Value> {
        debug!(endpoint, "sending request");
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;
        let body = serde_json::from_slice::<Value>(&bytes);

        if !status.is_success() {
            if let Some(message) = body.as_ref().ok().and_then(upstream_detail) {
                return Err(ApiError::Upstream {
                    status: status.as_u16(),
                    message,
                });
            }
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        body.map_err(|e| ApiError::Transport {
            endpoint: endpoint.to_string(),
            reason: format!("malformed response body: {e}"),
        })
    }

    fn transport_error(&self, endpoint: &str, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                endpoint: endpoint.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ApiError::Transport {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl VideoApi for ApiClient {
    async fn search(&self, request: SearchRequest) -> Result<SearchResult> {
        let path = self.normalizer.wire().search_path;
        let builder = self
            .client
            .get(self.url(path))
            .query(&self.normalizer.search_params(&request));
        let body = self.send(path, builder).await?;
        self.normalizer.search_result(&request, &body)
    }

    async fn search_within_video(&self, request: MomentSearchRequest) -> Result<MomentMatches> {
        let path = self.normalizer.wire().in_video_path;
        let builder = self
            .client
            .post(self.url(path))
            .json(&self.normalizer.in_video_body(&request));
        let body = self.send(path, builder).await?;
        self.normalizer.moment_matches(&request, &body)
    }

    async fn summarize(&self, request: SummarizeRequest) -> Result<SummaryText> {
        let path = self.normalizer.wire().summarize_path;
        let builder = self
            .client
            .post(self.url(path))
            .json(&self.normalizer.summarize_body(&request));
        let body = self.send(path, builder).await?;
        self.normalizer.summary(&request, &body)
    }
}
