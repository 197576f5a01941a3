//! Backend selection and per-provider settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::error::ConfigError;
use crate::embedding::HttpEmbedderConfig;
use crate::graph::Neo4jConfig;
use crate::vectordb::PineconeConfig;

/// Vector search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VectorBackend {
    Pinecone,
    Qdrant,
    /// In-process store, filled from the dataset at startup.
    #[default]
    Memory,
}

impl FromStr for VectorBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pinecone" => Ok(VectorBackend::Pinecone),
            "qdrant" => Ok(VectorBackend::Qdrant),
            "memory" | "local" => Ok(VectorBackend::Memory),
            _ => Err(ConfigError::UnknownBackend {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for VectorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VectorBackend::Pinecone => "pinecone",
            VectorBackend::Qdrant => "qdrant",
            VectorBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Embedding model settings. With no `url` the offline hashing embedder is used.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingSettings {
    pub dimension: usize,
    pub url: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            dimension: crate::constants::DEFAULT_EMBEDDING_DIM,
            url: None,
            model: "jina-embeddings-v2-base-en".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl EmbeddingSettings {
    /// HTTP embedder settings, or `None` when no endpoint is configured.
    pub fn http_config(&self) -> Option<HttpEmbedderConfig> {
        self.url.as_ref().map(|url| HttpEmbedderConfig {
            url: url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            dimension: self.dimension,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PineconeSettings {
    pub api_key: Option<String>,
    pub index_name: Option<String>,
    pub cloud: String,
    pub region: String,
}

impl Default for PineconeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            index_name: None,
            cloud: "aws".to_string(),
            region: "us-east-1".to_string(),
        }
    }
}

impl PineconeSettings {
    pub fn client_config(&self) -> Result<PineconeConfig, ConfigError> {
        let api_key = self.api_key.clone().ok_or(ConfigError::MissingEnvVar {
            name: "PINECONE_API_KEY",
        })?;
        let index_name = self.index_name.clone().ok_or(ConfigError::MissingEnvVar {
            name: "PINECONE_INDEX_NAME",
        })?;

        let mut config = PineconeConfig::new(api_key, index_name);
        config.cloud = self.cloud.clone();
        config.region = self.region.clone();
        Ok(config)
    }
}

/// Default Qdrant URL used when `VISTA_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QdrantSettings {
    pub url: String,
    pub collection: String,
}

impl Default for QdrantSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_QDRANT_URL.to_string(),
            collection: crate::vectordb::DEFAULT_COLLECTION_NAME.to_string(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Neo4jSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Neo4jSettings {
    pub fn client_config(&self) -> Neo4jConfig {
        Neo4jConfig {
            uri: self.uri.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for Neo4jSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jSettings")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}
