//! Index construction: one embedding per record, in input order.

use tracing::{debug, info};
use trendvec_common::{Result, TrendvecError};

use crate::embedder::{Embedder, HashEmbedder};
use crate::types::{Index, Record};

/// Build an index with the default hash embedder
pub fn build(records: Vec<Record>, dim: usize) -> Result<Index> {
    let embedder = HashEmbedder::new(dim)?;
    build_with(&embedder, records)
}

/// Build an index, embedding each record's text fields in input order
pub fn build_with(embedder: &dyn Embedder, records: Vec<Record>) -> Result<Index> {
    build_with_progress(embedder, records, |_| {})
}

/// Build an index, calling `on_record` after each record is embedded
#[tracing::instrument(skip_all, fields(records = records.len(), dim = embedder.dim()))]
pub fn build_with_progress<F>(
    embedder: &dyn Embedder,
    records: Vec<Record>,
    mut on_record: F,
) -> Result<Index>
where
    F: FnMut(usize),
{
    let dim = embedder.dim();
    if dim == 0 {
        return Err(TrendvecError::InvalidDimension(dim));
    }
    if records.is_empty() {
        info!("Index built - 0 records, dim={}", dim);
        return Ok(Index::empty(dim));
    }

    let mut embeddings = Vec::with_capacity(records.len());
    for (pos, record) in records.iter().enumerate() {
        if record.id.trim().is_empty() {
            return Err(TrendvecError::invalid_record(format!(
                "record at position {} has an empty id",
                pos
            )));
        }

        let embedding = embedder.embed(&record.embedding_text())?;
        if embedding.len() != dim {
            return Err(TrendvecError::dimension_mismatch(dim, embedding.len(), Some(pos)));
        }
        debug!("Embedded record {} ({})", record.id, pos);

        embeddings.push(embedding);
        on_record(pos);
    }

    info!(
        "Index built - {} records, dim={}, embedder={}",
        records.len(),
        dim,
        embedder.name()
    );

    Ok(Index::with_dim(dim, embeddings, records))
}
