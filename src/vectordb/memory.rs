//! Brute-force cosine store for offline runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::VectorDbError;
use super::model::{VectorRecord, check_dimensions};
use super::provider::VectorSearchProvider;
use crate::embedding::cosine_similarity;
use crate::retrieval::RetrievalMatch;

#[derive(Default)]
struct Points {
    records: Vec<VectorRecord>,
    by_id: HashMap<String, usize>,
}

/// Linear-scan vector store. Query order is by descending cosine similarity, ties in
/// insertion order.
pub struct InMemoryVectorStore {
    dimension: RwLock<Option<usize>>,
    points: RwLock<Points>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            dimension: RwLock::new(None),
            points: RwLock::new(Points::default()),
        }
    }

    /// Creates a store whose index already exists for `dimension`.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: RwLock::new(Some(dimension)),
            points: RwLock::new(Points::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.points.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<VectorRecord> {
        let points = self.points.read();
        points.by_id.get(id).map(|&i| points.records[i].clone())
    }

    fn require_dimension(&self) -> Result<usize, VectorDbError> {
        (*self.dimension.read()).ok_or_else(|| VectorDbError::CollectionNotFound {
            collection: "memory".to_string(),
        })
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorSearchProvider for InMemoryVectorStore {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievalMatch>, VectorDbError> {
        let dimension = self.require_dimension()?;
        if vector.len() != dimension {
            return Err(VectorDbError::InvalidDimension {
                expected: dimension,
                actual: vector.len(),
            });
        }

        let points = self.points.read();
        let mut results: Vec<RetrievalMatch> = points
            .records
            .iter()
            .map(|r| {
                RetrievalMatch::new(r.id.clone(), cosine_similarity(vector, &r.values))
                    .with_metadata(r.metadata.clone())
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);
        Ok(results)
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, VectorDbError> {
        let dimension = self.require_dimension()?;
        check_dimensions(&records, dimension)?;

        let count = records.len();
        let mut points = self.points.write();
        for record in records {
            match points.by_id.get(&record.id).copied() {
                Some(i) => points.records[i] = record,
                None => {
                    let i = points.records.len();
                    points.by_id.insert(record.id.clone(), i);
                    points.records.push(record);
                }
            }
        }
        Ok(count)
    }

    async fn ensure_index(&self, dimension: usize) -> Result<(), VectorDbError> {
        let mut current = self.dimension.write();
        match *current {
            Some(existing) if existing != dimension => Err(VectorDbError::InvalidDimension {
                expected: existing,
                actual: dimension,
            }),
            Some(_) => Ok(()),
            None => {
                *current = Some(dimension);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> Result<(), VectorDbError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for InMemoryVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryVectorStore")
            .field("dimension", &*self.dimension.read())
            .field("points", &self.len())
            .finish()
    }
}
