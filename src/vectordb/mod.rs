//! Vector search backends: Pinecone, Qdrant and an in-memory store.

pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;
pub mod pinecone;
pub mod provider;
pub mod qdrant;

#[cfg(test)]
mod tests;

pub use error::VectorDbError;
pub use memory::InMemoryVectorStore;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVectorStore;
pub use model::VectorRecord;
pub use pinecone::{PineconeConfig, PineconeStore};
pub use provider::VectorSearchProvider;
pub use qdrant::QdrantStore;

pub const DEFAULT_COLLECTION_NAME: &str = "vista_travel";
