/// Trendvec error types
#[derive(Debug, thiserror::Error)]
pub enum TrendvecError {
    /// Requested embedding dimension is not positive
    #[error("Invalid embedding dimension: {0} (must be greater than 0)")]
    InvalidDimension(usize),

    /// Embedding length differs from the index dimension
    #[error("{}", dimension_mismatch_message(.expected, .got, .position))]
    DimensionMismatch {
        expected: usize,
        got: usize,
        /// Offending row, `None` for the query vector
        position: Option<usize>,
    },

    /// Embedding and record collections are not parallel
    #[error("Index length mismatch: {embeddings} embeddings vs {records} records")]
    LengthMismatch { embeddings: usize, records: usize },

    /// Record cannot be embedded
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted index artifacts are inconsistent
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn dimension_mismatch_message(expected: &usize, got: &usize, position: &Option<usize>) -> String {
    match position {
        Some(pos) => format!(
            "Dimension mismatch at embedding {}: expected {}, got {}",
            pos, expected, got
        ),
        None => format!(
            "Dimension mismatch for query embedding: expected {}, got {}",
            expected, got
        ),
    }
}

impl TrendvecError {
    /// Create dimension mismatch error for a stored row
    pub fn dimension_mismatch(expected: usize, got: usize, position: Option<usize>) -> Self {
        Self::DimensionMismatch {
            expected,
            got,
            position,
        }
    }

    /// Create invalid record error
    pub fn invalid_record<S: Into<String>>(msg: S) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create storage error
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }
}

// Process exit code conversion (for the CLI)
impl TrendvecError {
    /// Get process exit code
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidDimension(_) => 2,
            Self::InvalidRecord(_) => 2,
            Self::InvalidInput(_) => 2,
            Self::Config(_) => 2,
            Self::NotFound(_) => 3,
            Self::DimensionMismatch { .. } => 1,
            Self::LengthMismatch { .. } => 1,
            Self::Storage(_) => 1,
            Self::Io(_) => 1,
            Self::Json(_) => 1,
            Self::Other(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = TrendvecError::dimension_mismatch(64, 32, Some(2));
        assert_eq!(
            err.to_string(),
            "Dimension mismatch at embedding 2: expected 64, got 32"
        );

        let err = TrendvecError::dimension_mismatch(64, 8, None);
        assert!(err.to_string().contains("query embedding"));
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(TrendvecError::InvalidDimension(0).exit_code(), 2);
        assert_eq!(TrendvecError::not_found("index").exit_code(), 3);
        assert_eq!(TrendvecError::storage("checksum").exit_code(), 1);
    }
}
