//! Score-threshold filtering of vector-search results.
//!
//! Pure functions over their inputs: no shared state and no I/O, so they are safe to call
//! from any number of request handlers at once. Callers decide what an empty result means
//! (the assistant falls back to graph-only context).

pub mod error;
pub mod filter;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::RetrievalError;
pub use filter::{RetrievalFilter, filter, filter_top_k, top_k, validate_threshold};
pub use types::RetrievalMatch;
