//! Environment-backed configuration.
//!
//! Every setting has a default, so an empty environment yields a fully offline setup: the
//! hashing embedder, the in-memory vector store and graph, and the genai chat provider.

pub mod error;
pub mod providers;


pub use error::ConfigError;
pub use providers::{
    DEFAULT_QDRANT_URL, EmbeddingSettings, Neo4jSettings, PineconeSettings, QdrantSettings,
    VectorBackend,
};

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{DEFAULT_CACHE_CAPACITY, DEFAULT_SCORE_THRESHOLD, DEFAULT_TOP_K};
use crate::llm::DEFAULT_CHAT_MODELS;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP port (default: 5000).
    pub port: u16,

    /// Bind address (default: 127.0.0.1).
    pub bind_addr: IpAddr,

    /// Minimum similarity score a vector match needs to be used as context.
    pub score_threshold: f32,

    /// Embedding cache capacity in entries.
    pub cache_max_size: usize,

    /// Vector matches requested per query.
    pub top_k: usize,

    pub embedding: EmbeddingSettings,

    pub vector_backend: VectorBackend,

    pub pinecone: PineconeSettings,

    pub qdrant: QdrantSettings,

    /// `None` selects the in-memory graph.
    pub neo4j: Option<Neo4jSettings>,

    /// Chat models tried in order.
    pub chat_models: Vec<String>,

    /// Answer with the offline echo provider instead of a language model.
    pub mock_provider: bool,

    /// Dataset preloaded into the in-memory backends.
    pub dataset_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            cache_max_size: DEFAULT_CACHE_CAPACITY,
            top_k: DEFAULT_TOP_K,
            embedding: EmbeddingSettings::default(),
            vector_backend: VectorBackend::default(),
            pinecone: PineconeSettings::default(),
            qdrant: QdrantSettings::default(),
            neo4j: None,
            chat_models: DEFAULT_CHAT_MODELS.iter().map(|m| m.to_string()).collect(),
            mock_provider: false,
            dataset_path: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "VISTA_PORT";
    const ENV_BIND_ADDR: &'static str = "VISTA_BIND_ADDR";
    const ENV_SCORE_THRESHOLD: &'static str = "VISTA_SCORE_THRESHOLD";
    const ENV_CACHE_MAX_SIZE: &'static str = "VISTA_CACHE_MAX_SIZE";
    const ENV_TOP_K: &'static str = "VISTA_TOP_K";
    const ENV_EMBEDDING_DIM: &'static str = "VISTA_EMBEDDING_DIM";
    const ENV_PINECONE_VECTOR_DIM: &'static str = "PINECONE_VECTOR_DIM";
    const ENV_EMBEDDING_URL: &'static str = "VISTA_EMBEDDING_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "VISTA_EMBEDDING_MODEL";
    const ENV_EMBEDDING_API_KEY: &'static str = "VISTA_EMBEDDING_API_KEY";
    const ENV_EMBEDDING_TIMEOUT_SECS: &'static str = "VISTA_EMBEDDING_TIMEOUT_SECS";
    const ENV_VECTOR_BACKEND: &'static str = "VISTA_VECTOR_BACKEND";
    const ENV_PINECONE_API_KEY: &'static str = "PINECONE_API_KEY";
    const ENV_PINECONE_INDEX_NAME: &'static str = "PINECONE_INDEX_NAME";
    const ENV_PINECONE_CLOUD: &'static str = "PINECONE_CLOUD";
    const ENV_PINECONE_REGION: &'static str = "PINECONE_REGION";
    const ENV_QDRANT_URL: &'static str = "VISTA_QDRANT_URL";
    const ENV_QDRANT_COLLECTION: &'static str = "VISTA_QDRANT_COLLECTION";
    const ENV_NEO4J_URI: &'static str = "NEO4J_URI";
    const ENV_NEO4J_USER: &'static str = "NEO4J_USER";
    const ENV_NEO4J_PASSWORD: &'static str = "NEO4J_PASSWORD";
    const ENV_NEO4J_DATABASE: &'static str = "NEO4J_DATABASE";
    const ENV_CHAT_MODELS: &'static str = "VISTA_CHAT_MODELS";
    const ENV_MOCK_PROVIDER: &'static str = "VISTA_MOCK_PROVIDER";
    const ENV_DATASET_PATH: &'static str = "VISTA_DATASET_PATH";

    /// Loads config from environment variables (falls back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let dimension = match Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_DIM) {
            Some(_) => Self::parse_number_from_env(
                Self::ENV_EMBEDDING_DIM,
                defaults.embedding.dimension,
            )?,
            None => Self::parse_number_from_env(
                Self::ENV_PINECONE_VECTOR_DIM,
                defaults.embedding.dimension,
            )?,
        };

        let embedding = EmbeddingSettings {
            dimension,
            url: Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_URL),
            model: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_MODEL,
                defaults.embedding.model,
            ),
            api_key: Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_API_KEY),
            timeout_secs: Self::parse_number_from_env(
                Self::ENV_EMBEDDING_TIMEOUT_SECS,
                defaults.embedding.timeout_secs,
            )?,
        };

        let vector_backend = match Self::parse_optional_string_from_env(Self::ENV_VECTOR_BACKEND)
        {
            Some(value) => VectorBackend::from_str(&value)?,
            None => defaults.vector_backend,
        };

        let pinecone = PineconeSettings {
            api_key: Self::parse_optional_string_from_env(Self::ENV_PINECONE_API_KEY),
            index_name: Self::parse_optional_string_from_env(Self::ENV_PINECONE_INDEX_NAME),
            cloud: Self::parse_string_from_env(Self::ENV_PINECONE_CLOUD, defaults.pinecone.cloud),
            region: Self::parse_string_from_env(
                Self::ENV_PINECONE_REGION,
                defaults.pinecone.region,
            ),
        };

        let qdrant = QdrantSettings {
            url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant.url),
            collection: Self::parse_string_from_env(
                Self::ENV_QDRANT_COLLECTION,
                defaults.qdrant.collection,
            ),
        };

        let neo4j = Self::parse_optional_string_from_env(Self::ENV_NEO4J_URI).map(|uri| {
            Neo4jSettings {
                uri,
                user: Self::parse_string_from_env(Self::ENV_NEO4J_USER, "neo4j".to_string()),
                password: env::var(Self::ENV_NEO4J_PASSWORD).unwrap_or_default(),
                database: Self::parse_string_from_env(
                    Self::ENV_NEO4J_DATABASE,
                    "neo4j".to_string(),
                ),
            }
        });

        let chat_models = match Self::parse_optional_string_from_env(Self::ENV_CHAT_MODELS) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect(),
            None => defaults.chat_models,
        };

        Ok(Self {
            port: Self::parse_port_from_env(defaults.port)?,
            bind_addr: Self::parse_bind_addr_from_env(defaults.bind_addr)?,
            score_threshold: Self::parse_number_from_env(
                Self::ENV_SCORE_THRESHOLD,
                defaults.score_threshold,
            )?,
            cache_max_size: Self::parse_number_from_env(
                Self::ENV_CACHE_MAX_SIZE,
                defaults.cache_max_size,
            )?,
            top_k: Self::parse_number_from_env(Self::ENV_TOP_K, defaults.top_k)?,
            embedding,
            vector_backend,
            pinecone,
            qdrant,
            neo4j,
            chat_models,
            mock_provider: Self::parse_optional_string_from_env(Self::ENV_MOCK_PROVIDER)
                .is_some(),
            dataset_path: Self::parse_optional_string_from_env(Self::ENV_DATASET_PATH)
                .map(PathBuf::from),
        })
    }

    /// Checks value ranges, backend requirements and the dataset path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort {
                value: self.port.to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_SCORE_THRESHOLD,
                value: self.score_threshold.to_string(),
                reason: "must be between 0 and 1".to_string(),
            });
        }

        if self.cache_max_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CACHE_MAX_SIZE,
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_TOP_K,
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.embedding.dimension == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_DIM,
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.vector_backend == VectorBackend::Pinecone {
            self.pinecone.client_config()?;
        }

        if let Some(path) = &self.dataset_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                name: var_name,
                reason: e.to_string(),
                value,
            }),
            None => Ok(default),
        }
    }
}
