use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, ScoredPoint, SearchPointsBuilder,
    UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use tracing::{debug, warn};

use super::error::VectorDbError;
use super::model::VectorRecord;
use super::provider::VectorSearchProvider;
use crate::hashing::point_id_for;
use crate::retrieval::RetrievalMatch;

/// Payload key holding the original string node id.
pub const PAYLOAD_NODE_ID: &str = "node_id";
/// Payload key holding the match metadata as a JSON string.
pub const PAYLOAD_METADATA: &str = "metadata_json";

#[derive(Clone)]
/// Qdrant-backed vector search over one collection.
pub struct QdrantStore {
    client: Qdrant,
    url: String,
    collection: String,
}

impl QdrantStore {
    /// Creates a client for `url`. No request is made until first use.
    pub fn new(url: &str, collection: &str) -> Result<Self, VectorDbError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorDbError::ConnectionFailed {
                backend: "qdrant",
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    async fn collection_exists(&self) -> Result<bool, VectorDbError> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                backend: "qdrant",
                url: self.url.clone(),
                message: e.to_string(),
            })
    }
}

/// Builds the Qdrant point for `record`, keeping the string id and metadata in the payload.
pub fn to_point(record: VectorRecord) -> PointStruct {
    let mut payload: HashMap<String, QdrantValue> = HashMap::new();
    payload.insert(PAYLOAD_NODE_ID.to_string(), record.id.clone().into());
    payload.insert(
        PAYLOAD_METADATA.to_string(),
        record.metadata.to_string().into(),
    );

    PointStruct::new(point_id_for(&record.id), record.values, payload)
}

/// Converts a scored point back into a match. Points without a node id are skipped.
pub fn from_scored_point(point: ScoredPoint) -> Option<RetrievalMatch> {
    let payload = point.payload;

    let id = payload
        .get(PAYLOAD_NODE_ID)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())?;

    let metadata = payload
        .get(PAYLOAD_METADATA)
        .and_then(|v| v.as_str())
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or(serde_json::Value::Null);

    Some(RetrievalMatch::new(id, point.score).with_metadata(metadata))
}

#[async_trait]
impl VectorSearchProvider for QdrantStore {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>, VectorDbError> {
        let search = SearchPointsBuilder::new(&self.collection, vector.to_vec(), top_k as u64)
            .with_payload(true);

        let response = self.client.search_points(search).await.map_err(|e| {
            VectorDbError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            }
        })?;

        let total = response.result.len();
        let matches: Vec<RetrievalMatch> = response
            .result
            .into_iter()
            .filter_map(from_scored_point)
            .collect();

        if matches.len() < total {
            warn!(
                collection = %self.collection,
                skipped = total - matches.len(),
                "Qdrant points without node id payload"
            );
        }
        Ok(matches)
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, VectorDbError> {
        if records.is_empty() {
            return Ok(0);
        }

        let count = records.len();
        let points: Vec<PointStruct> = records.into_iter().map(to_point).collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(count)
    }

    async fn ensure_index(&self, dimension: usize) -> Result<(), VectorDbError> {
        if self.collection_exists().await? {
            debug!(collection = %self.collection, "Qdrant collection exists");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dimension as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        debug!(collection = %self.collection, dimension, "Created Qdrant collection");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                backend: "qdrant",
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn name(&self) -> &str {
        "qdrant"
    }
}

impl std::fmt::Debug for QdrantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantStore")
            .field("url", &self.url)
            .field("collection", &self.collection)
            .finish()
    }
}
