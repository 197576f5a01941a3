//! Client for OpenAI-compatible `/embeddings` endpoints (Jina, OpenAI, local servers).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use super::utils::l2_normalize;

/// Connection settings for [`HttpEmbedder`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpEmbedderConfig {
    /// Full endpoint URL, e.g. `https://api.jina.ai/v1/embeddings`.
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub dimension: usize,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

/// Remote embedding provider. Outputs are L2-normalised and checked against the
/// configured dimension.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    config: HttpEmbedderConfig,
}

impl HttpEmbedder {
    const PROVIDER: &'static str = "http";

    pub fn new(config: HttpEmbedderConfig) -> Result<Self, EmbeddingError> {
        if config.dimension == 0 {
            return Err(EmbeddingError::InvalidInput {
                reason: "embedding dimension must be greater than zero".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingError::RequestFailed {
                provider: Self::PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpEmbedderConfig {
        &self.config
    }

    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut builder = self.client.post(&self.config.url).json(&EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        });
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    provider: Self::PROVIDER.to_string(),
                    reason: e.to_string(),
                })?;

        self.collect_vectors(parsed, texts.len())
    }

    fn collect_vectors(
        &self,
        mut parsed: EmbeddingResponse,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if parsed.data.len() != expected {
            return Err(EmbeddingError::MalformedResponse {
                provider: Self::PROVIDER.to_string(),
                reason: format!("expected {} embeddings, got {}", expected, parsed.data.len()),
            });
        }

        parsed.data.sort_by_key(|d| d.index);

        parsed
            .data
            .into_iter()
            .map(|d| {
                let mut vector = d.embedding;
                if vector.len() != self.config.dimension {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: self.config.dimension,
                        actual: vector.len(),
                    });
                }
                l2_normalize(&mut vector);
                Ok(vector)
            })
            .collect()
    }

    fn map_transport(&self, e: reqwest::Error) -> EmbeddingError {
        if e.is_timeout() {
            EmbeddingError::Timeout {
                provider: Self::PROVIDER.to_string(),
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else {
            EmbeddingError::RequestFailed {
                provider: Self::PROVIDER.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

fn map_status(status: StatusCode, body: String) -> EmbeddingError {
    let provider = HttpEmbedder::PROVIDER.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EmbeddingError::Unauthorized {
            provider,
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => EmbeddingError::RateLimited { provider },
        _ => EmbeddingError::UpstreamStatus {
            provider,
            status: status.as_u16(),
            body: body.chars().take(512).collect(),
        },
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let input = [text.to_string()];
        let mut vectors = self.request(&input).await?;
        vectors.pop().ok_or_else(|| EmbeddingError::MalformedResponse {
            provider: Self::PROVIDER.to_string(),
            reason: "empty data array".to_string(),
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(count = texts.len(), model = %self.config.model, "Requesting embeddings");
        self.request(texts).await
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}
