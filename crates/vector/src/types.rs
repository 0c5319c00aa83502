use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trendvec_common::config::DEFAULT_EMBEDDING_DIM;
use trendvec_common::{Result, TrendvecError};

/// Fixed-length, unit-normalized text embedding
pub type Embedding = Vec<f32>;

/// Catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Category label
    #[serde(default)]
    pub category: String,

    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Any other fields present in the metadata artifact
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Record {
    /// Create record with the text-bearing fields set
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            tags,
            price: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set price
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Text fed to the embedder: name, description, category, tags
    pub fn embedding_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name,
            self.description,
            self.category,
            self.tags.join(" ")
        )
    }
}

/// In-memory index: parallel embedding and record collections
///
/// Row `i` of `embeddings` belongs to `records[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    dim: usize,
    embeddings: Vec<Embedding>,
    records: Vec<Record>,
}

impl Index {
    /// Create empty index
    pub fn empty(dim: usize) -> Self {
        Self {
            dim,
            embeddings: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Create index from parallel collections without validating them
    ///
    /// The dimension is taken from the first embedding (default 64 when empty).
    pub fn from_parts(embeddings: Vec<Embedding>, records: Vec<Record>) -> Self {
        let dim = embeddings
            .first()
            .map(|e| e.len())
            .unwrap_or(DEFAULT_EMBEDDING_DIM);
        Self {
            dim,
            embeddings,
            records,
        }
    }

    /// Create index with an explicit dimension
    pub fn with_dim(dim: usize, embeddings: Vec<Embedding>, records: Vec<Record>) -> Self {
        Self {
            dim,
            embeddings,
            records,
        }
    }

    /// Create index from an N×D embeddings matrix
    pub fn from_matrix(matrix: &Array2<f32>, records: Vec<Record>) -> Self {
        let embeddings = matrix.rows().into_iter().map(|row| row.to_vec()).collect();
        Self {
            dim: matrix.ncols(),
            embeddings,
            records,
        }
    }

    /// Check the parallel-collection and uniform-dimension invariants
    pub fn validate(&self) -> Result<()> {
        if self.embeddings.len() != self.records.len() {
            return Err(TrendvecError::LengthMismatch {
                embeddings: self.embeddings.len(),
                records: self.records.len(),
            });
        }

        if let Some((pos, e)) = self
            .embeddings
            .iter()
            .enumerate()
            .find(|(_, e)| e.len() != self.dim)
        {
            return Err(TrendvecError::dimension_mismatch(self.dim, e.len(), Some(pos)));
        }

        // Every row has length D here
        if self.dim == 0 {
            return Err(TrendvecError::InvalidDimension(0));
        }

        Ok(())
    }

    /// Embedding dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored embeddings, row `i` for record `i`
    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    /// Stored records in index order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Embeddings as an N×D matrix (the embeddings artifact)
    pub fn as_matrix(&self) -> Result<Array2<f32>> {
        self.validate()?;
        let flat: Vec<f32> = self.embeddings.iter().flatten().copied().collect();
        Array2::from_shape_vec((self.embeddings.len(), self.dim), flat)
            .map_err(|e| TrendvecError::storage(format!("Failed to shape embeddings: {}", e)))
    }
}

/// Search result
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Position of the record in the index
    pub position: usize,

    /// Matched record
    pub record: Record,

    /// Cosine similarity (-1.0 to 1.0)
    pub score: f32,
}

impl SearchResult {
    /// Create search result
    pub fn new(position: usize, record: Record, score: f32) -> Self {
        Self {
            position,
            record,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> Record {
        Record::new(id, "Name", "Desc", "Cat", vec!["a".into(), "b".into()])
    }

    #[test]
    fn test_embedding_text_field_order() {
        let r = Record::new(
            "sample-2",
            "Denim Jacket",
            "Classic denim jacket",
            "Clothes",
            vec!["jacket".into(), "denim".into()],
        );
        assert_eq!(
            r.embedding_text(),
            "Denim Jacket Classic denim jacket Clothes jacket denim"
        );
    }

    #[test]
    fn test_record_preserves_unknown_fields() {
        let json = r#"{"id":"x","name":"Hat","category":"Hats","tags":[],"price":9.5,"stock":3}"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.price, Some(9.5));
        assert_eq!(r.description, "");
        assert_eq!(r.extra.get("stock"), Some(&serde_json::json!(3)));

        let back = serde_json::to_value(&r).unwrap();
        assert_eq!(back["stock"], serde_json::json!(3));
    }

    #[test]
    fn test_validate_length_mismatch() {
        let index = Index::from_parts(vec![vec![1.0, 0.0]], vec![record("a"), record("b")]);
        assert!(matches!(
            index.validate(),
            Err(TrendvecError::LengthMismatch { embeddings: 1, records: 2 })
        ));
    }

    #[test]
    fn test_validate_ragged_rows() {
        let index = Index::from_parts(
            vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]],
            vec![record("a"), record("b")],
        );
        assert!(matches!(
            index.validate(),
            Err(TrendvecError::DimensionMismatch { expected: 2, got: 3, position: Some(1) })
        ));
    }

    #[test]
    fn test_validate_uniformly_empty_rows() {
        let index = Index::from_parts(vec![vec![], vec![]], vec![record("a"), record("b")]);
        assert!(matches!(
            index.validate(),
            Err(TrendvecError::InvalidDimension(0))
        ));
    }

    #[test]
    fn test_matrix_round_trip() {
        let index = Index::from_parts(
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            vec![record("a"), record("b")],
        );
        let matrix = index.as_matrix().unwrap();
        assert_eq!(matrix.shape(), &[2, 2]);
        assert_eq!(matrix[[1, 1]], 1.0);

        let rebuilt = Index::from_matrix(&matrix, index.records().to_vec());
        assert_eq!(rebuilt, index);
    }

    #[test]
    fn test_empty_index() {
        let index = Index::from_parts(Vec::new(), Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.dim(), 64);
        assert!(index.validate().is_ok());
    }
}
