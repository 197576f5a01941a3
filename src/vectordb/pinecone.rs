//! Pinecone serverless index over its REST API.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::error::VectorDbError;
use super::model::{VectorRecord, check_dimensions};
use super::provider::VectorSearchProvider;
use crate::retrieval::RetrievalMatch;

const BACKEND: &str = "pinecone";
const API_VERSION: &str = "2024-07";

/// Connection and index settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    pub cloud: String,
    pub region: String,
    /// Control-plane base URL.
    pub control_url: String,
    pub timeout: Duration,
    /// Polls of the describe endpoint while a new index initialises.
    pub ready_polls: u32,
    pub ready_poll_interval: Duration,
}

impl PineconeConfig {
    pub const DEFAULT_CONTROL_URL: &'static str = "https://api.pinecone.io";

    pub fn new(api_key: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            index_name: index_name.into(),
            cloud: "aws".to_string(),
            region: "us-east-1".to_string(),
            control_url: Self::DEFAULT_CONTROL_URL.to_string(),
            timeout: Duration::from_secs(30),
            ready_polls: 30,
            ready_poll_interval: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
    #[serde(default)]
    dimension: Option<usize>,
    #[serde(default)]
    status: Option<IndexStatus>,
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<PineconeMatch>,
}

#[derive(Debug, Deserialize)]
struct PineconeMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: serde_json::Value,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: Option<usize>,
}

/// Pinecone-backed vector search.
///
/// The data-plane host is resolved from the control plane on first use and cached.
pub struct PineconeStore {
    http: reqwest::Client,
    config: PineconeConfig,
    host: RwLock<Option<String>>,
    dimension: RwLock<Option<usize>>,
}

impl PineconeStore {
    pub fn new(config: PineconeConfig) -> Result<Self, VectorDbError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VectorDbError::ConnectionFailed {
                backend: BACKEND,
                url: config.control_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            config,
            host: RwLock::new(None),
            dimension: RwLock::new(None),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.config.index_name
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
    }

    fn index_url(&self) -> String {
        format!(
            "{}/indexes/{}",
            self.config.control_url.trim_end_matches('/'),
            self.config.index_name
        )
    }

    /// `Ok(None)` when the index does not exist.
    async fn describe(&self) -> Result<Option<IndexDescription>, VectorDbError> {
        let url = self.index_url();
        let response = self
            .authed(self.http.get(&url))
            .send()
            .await
            .map_err(|e| map_transport(e, &url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let description: IndexDescription = read_json(response).await?;
        Ok(Some(description))
    }

    async fn create(&self, dimension: usize) -> Result<(), VectorDbError> {
        let url = format!("{}/indexes", self.config.control_url.trim_end_matches('/'));
        let body = json!({
            "name": self.config.index_name,
            "dimension": dimension,
            "metric": "cosine",
            "spec": {
                "serverless": {
                    "cloud": self.config.cloud,
                    "region": self.config.region,
                }
            }
        });

        let response = self
            .authed(self.http.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| map_transport(e, &url))?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorDbError::CreateCollectionFailed {
                collection: self.config.index_name.clone(),
                message: format!("HTTP {}: {}", status.as_u16(), body),
            });
        }
        Ok(())
    }

    async fn wait_until_ready(&self) -> Result<IndexDescription, VectorDbError> {
        for _ in 0..self.config.ready_polls.max(1) {
            if let Some(description) = self.describe().await?
                && description.status.as_ref().is_some_and(|s| s.ready)
            {
                return Ok(description);
            }
            tokio::time::sleep(self.config.ready_poll_interval).await;
        }

        Err(VectorDbError::CreateCollectionFailed {
            collection: self.config.index_name.clone(),
            message: "index did not become ready".to_string(),
        })
    }

    async fn data_host(&self) -> Result<String, VectorDbError> {
        let cached = self.host.read().clone();
        if let Some(host) = cached {
            return Ok(host);
        }

        let description = self
            .describe()
            .await?
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                collection: self.config.index_name.clone(),
            })?;

        let host = normalize_host(&description.host);
        *self.host.write() = Some(host.clone());
        *self.dimension.write() = description.dimension;
        Ok(host)
    }
}

fn normalize_host(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", host.trim_end_matches('/'))
    }
}

fn map_transport(e: reqwest::Error, url: &str) -> VectorDbError {
    if e.is_timeout() {
        VectorDbError::Timeout { backend: BACKEND }
    } else {
        VectorDbError::ConnectionFailed {
            backend: BACKEND,
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

fn map_status(status: StatusCode, body: String) -> VectorDbError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => VectorDbError::Unauthorized {
            backend: BACKEND,
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => VectorDbError::RateLimited { backend: BACKEND },
        _ => VectorDbError::UpstreamStatus {
            backend: BACKEND,
            status: status.as_u16(),
            body: body.chars().take(512).collect(),
        },
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, VectorDbError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_status(status, body));
    }

    response
        .json()
        .await
        .map_err(|e| VectorDbError::MalformedResponse {
            backend: BACKEND,
            reason: e.to_string(),
        })
}

#[async_trait]
impl VectorSearchProvider for PineconeStore {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>, VectorDbError> {
        let url = format!("{}/query", self.data_host().await?);
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
        };

        let response = self
            .authed(self.http.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport(e, &url))?;

        let parsed: QueryResponse = read_json(response).await?;
        Ok(parsed
            .matches
            .into_iter()
            .map(|m| RetrievalMatch::new(m.id, m.score).with_metadata(m.metadata))
            .collect())
    }

    async fn upsert(&self, mut records: Vec<VectorRecord>) -> Result<usize, VectorDbError> {
        if records.is_empty() {
            return Ok(0);
        }
        if let Some(dimension) = *self.dimension.read() {
            check_dimensions(&records, dimension)?;
        }
        strip_null_metadata(&mut records);

        let url = format!("{}/vectors/upsert", self.data_host().await?);
        let response = self
            .authed(self.http.post(&url))
            .json(&UpsertRequest { vectors: &records })
            .send()
            .await
            .map_err(|e| map_transport(e, &url))?;

        let parsed: UpsertResponse = read_json(response).await?;
        Ok(parsed.upserted_count.unwrap_or(records.len()))
    }

    async fn ensure_index(&self, dimension: usize) -> Result<(), VectorDbError> {
        let description = match self.describe().await? {
            Some(existing) => {
                debug!(index = %self.config.index_name, "Pinecone index exists");
                existing
            }
            None => {
                info!(
                    index = %self.config.index_name,
                    dimension,
                    cloud = %self.config.cloud,
                    region = %self.config.region,
                    "Creating Pinecone index"
                );
                self.create(dimension).await?;
                self.wait_until_ready().await?
            }
        };

        if let Some(existing) = description.dimension
            && existing != dimension
        {
            return Err(VectorDbError::InvalidDimension {
                expected: existing,
                actual: dimension,
            });
        }

        *self.host.write() = Some(normalize_host(&description.host));
        *self.dimension.write() = Some(dimension);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), VectorDbError> {
        self.data_host().await.map(|_| ())
    }

    fn name(&self) -> &str {
        BACKEND
    }
}

impl std::fmt::Debug for PineconeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeStore")
            .field("index", &self.config.index_name)
            .field("cloud", &self.config.cloud)
            .field("region", &self.config.region)
            .field("host", &*self.host.read())
            .finish()
    }
}

/// Pinecone rejects null metadata values.
fn strip_null_metadata(records: &mut [VectorRecord]) {
    for record in records {
        if let serde_json::Value::Object(map) = &mut record.metadata {
            map.retain(|_, v| !v.is_null());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host_adds_scheme() {
        assert_eq!(
            normalize_host("idx-abc.svc.pinecone.io"),
            "https://idx-abc.svc.pinecone.io"
        );
        assert_eq!(normalize_host("http://localhost:5080/"), "http://localhost:5080");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, String::new()),
            VectorDbError::Unauthorized { status: 401, .. }
        ));
        assert!(map_status(StatusCode::TOO_MANY_REQUESTS, String::new()).is_retryable());
        assert!(map_status(StatusCode::SERVICE_UNAVAILABLE, String::new()).is_retryable());
        assert!(!map_status(StatusCode::BAD_REQUEST, String::new()).is_retryable());
    }

    #[test]
    fn test_query_request_uses_camel_case() {
        let vector = [0.1f32, 0.2];
        let body = serde_json::to_value(QueryRequest {
            vector: &vector,
            top_k: 5,
            include_metadata: true,
            include_values: false,
        })
        .unwrap();

        assert_eq!(body["topK"], 5);
        assert_eq!(body["includeMetadata"], true);
    }

    #[test]
    fn test_query_response_parses_matches() {
        let parsed: QueryResponse = serde_json::from_value(json!({
            "matches": [
                {"id": "city_hanoi", "score": 0.91, "metadata": {"name": "Hanoi"}},
                {"id": "city_hue", "score": 0.72}
            ],
            "namespace": ""
        }))
        .unwrap();

        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(parsed.matches[0].metadata["name"], "Hanoi");
        assert!(parsed.matches[1].metadata.is_null());
    }

    #[test]
    fn test_strip_null_metadata() {
        let mut records = vec![VectorRecord::new(
            "a",
            vec![0.0, 1.0],
            json!({"name": "Hue", "city": null}),
        )];

        strip_null_metadata(&mut records);
        assert_eq!(records[0].metadata, json!({"name": "Hue"}));
    }

    #[test]
    fn test_upsert_body_shape() {
        let records = vec![VectorRecord::new("a", vec![0.5], json!({"type": "City"}))];
        let body = serde_json::to_value(UpsertRequest { vectors: &records }).unwrap();

        assert_eq!(body["vectors"][0]["id"], "a");
        assert_eq!(body["vectors"][0]["values"][0], 0.5);
        assert_eq!(body["vectors"][0]["metadata"]["type"], "City");
    }

    #[tokio::test]
    async fn test_unreachable_control_plane_is_retryable() {
        let mut config = PineconeConfig::new("key", "vista");
        config.control_url = "http://127.0.0.1:9".to_string();
        config.timeout = Duration::from_secs(1);
        let store = PineconeStore::new(config).unwrap();

        let err = store.health_check().await.unwrap_err();
        assert!(err.is_retryable(), "unexpected error: {err}");
    }
}
