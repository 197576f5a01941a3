//! Dataset loading and batched upload of node embeddings to the vector store.

pub mod dataset;
pub mod error;
pub mod prepare;
pub mod uploader;


pub use dataset::{Connection, TravelNode, load_dataset};
pub use error::IngestError;
pub use prepare::{IngestItem, prepare_items};
pub use uploader::{BatchUploader, UploadConfig, UploadReport};
