//! Trendvec vector index
//!
//! Deterministic hash embeddings, exact cosine search, and the two on-disk
//! artifacts (embeddings matrix + record metadata).

pub mod builder;
pub mod catalog;
pub mod embedder;
pub mod search;
pub mod similarity;
pub mod store;
pub mod types;

pub use builder::{build, build_with, build_with_progress};
pub use catalog::{load_records, sample_records};
pub use embedder::{embed, tokenize, Embedder, Fnv1a32, HashEmbedder, TokenHasher, DEFAULT_DIM};
pub use search::{search, search_with};
pub use store::{IndexManifest, IndexStore};
pub use types::{Embedding, Index, Record, SearchResult};
