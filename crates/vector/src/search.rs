//! Exact nearest-neighbor search over an [`Index`].

use tracing::{debug, info};
use trendvec_common::{Result, TrendvecError};

use crate::embedder::{Embedder, HashEmbedder};
use crate::similarity::cosine_similarity;
use crate::types::{Index, SearchResult};

/// Search the index with the default hash embedder at the index dimension
pub fn search(query: &str, index: &Index, top_k: usize) -> Result<Vec<SearchResult>> {
    index.validate()?;
    let embedder = HashEmbedder::new(index.dim())?;
    search_with(&embedder, query, index, top_k)
}

/// Rank every stored record by cosine similarity to the query
///
/// Ties keep index order. Returns at most `top_k` results.
#[tracing::instrument(skip_all, fields(top_k = top_k, candidates = index.len()))]
pub fn search_with(
    embedder: &dyn Embedder,
    query: &str,
    index: &Index,
    top_k: usize,
) -> Result<Vec<SearchResult>> {
    index.validate()?;

    if index.is_empty() || top_k == 0 {
        return Ok(Vec::new());
    }

    debug!("Searching for: {} (top_k={})", query, top_k);

    let query_embedding = embedder.embed(query)?;
    if query_embedding.len() != index.dim() {
        return Err(TrendvecError::dimension_mismatch(
            index.dim(),
            query_embedding.len(),
            None,
        ));
    }

    let mut scored: Vec<(usize, f32)> = index
        .embeddings()
        .iter()
        .map(|embedding| cosine_similarity(&query_embedding, embedding))
        .enumerate()
        .collect();

    // Sort by (score desc, position asc)
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(top_k);

    let results: Vec<SearchResult> = scored
        .into_iter()
        .map(|(pos, score)| SearchResult::new(pos, index.records()[pos].clone(), score))
        .collect();

    info!(
        "Search completed - {} results (from {} candidates)",
        results.len(),
        index.len()
    );
    Ok(results)
}
