use crate::error::TrendvecError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default embedding dimension
pub const DEFAULT_EMBEDDING_DIM: usize = 64;

/// Trendvec application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the index artifacts
    pub data_dir: PathBuf,

    /// Embeddings artifact file name (inside `data_dir`)
    pub embeddings_file: String,

    /// Metadata artifact file name (inside `data_dir`)
    pub metadata_file: String,

    /// Manifest file name (inside `data_dir`)
    pub manifest_file: String,

    /// Embedding dimension used when building
    pub embedding_dim: usize,

    /// Number of results returned when the caller gives none
    pub default_top_k: usize,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            embeddings_file: "product_embeddings.json".to_string(),
            metadata_file: "product_metadata.json".to_string(),
            manifest_file: "index_manifest.json".to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            default_top_k: 3,
            log_dir: PathBuf::from("./data/log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, TrendvecError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();
        let config = Self {
            data_dir: Self::get_env_path("TRENDVEC_DATA_DIR").unwrap_or(defaults.data_dir),
            embeddings_file: std::env::var("TRENDVEC_EMBEDDINGS_FILE")
                .unwrap_or(defaults.embeddings_file),
            metadata_file: std::env::var("TRENDVEC_METADATA_FILE")
                .unwrap_or(defaults.metadata_file),
            manifest_file: std::env::var("TRENDVEC_MANIFEST_FILE")
                .unwrap_or(defaults.manifest_file),
            embedding_dim: Self::get_env_usize("TRENDVEC_EMBEDDING_DIM")
                .unwrap_or(defaults.embedding_dim),
            default_top_k: Self::get_env_usize("TRENDVEC_TOP_K").unwrap_or(defaults.default_top_k),
            log_dir: Self::get_env_path("TRENDVEC_LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: std::env::var("TRENDVEC_LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Get usize from environment variable, ignoring unparsable values
    fn get_env_usize(key: &str) -> Option<usize> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), TrendvecError> {
        for dir in [&self.data_dir, &self.log_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    TrendvecError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Point the configuration at another data directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        self.log_dir = data_dir.join("log");
        self.data_dir = data_dir;
        self
    }

    /// Get embeddings artifact path
    pub fn embeddings_path(&self) -> PathBuf {
        self.data_dir.join(&self.embeddings_file)
    }

    /// Get metadata artifact path
    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }

    /// Get manifest path
    pub fn manifest_path(&self) -> PathBuf {
        self.data_dir.join(&self.manifest_file)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), TrendvecError> {
        if self.embedding_dim == 0 {
            return Err(TrendvecError::config("Embedding dimension must be greater than 0"));
        }

        if self.default_top_k == 0 {
            return Err(TrendvecError::config("Default top-k must be greater than 0"));
        }

        for (name, value) in [
            ("embeddings", &self.embeddings_file),
            ("metadata", &self.metadata_file),
            ("manifest", &self.manifest_file),
        ] {
            if value.trim().is_empty() {
                return Err(TrendvecError::config(format!(
                    "{} file name cannot be empty",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.embedding_dim, 64);
        assert_eq!(config.default_top_k, 3);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_artifact_paths() {
        let config = AppConfig::default().with_data_dir("/tmp/trendvec");
        assert_eq!(
            config.embeddings_path(),
            PathBuf::from("/tmp/trendvec/product_embeddings.json")
        );
        assert_eq!(
            config.metadata_path(),
            PathBuf::from("/tmp/trendvec/product_metadata.json")
        );
        assert_eq!(config.log_dir, PathBuf::from("/tmp/trendvec/log"));
    }

    #[test]
    fn test_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let mut invalid_config = AppConfig::default();
        invalid_config.embedding_dim = 0;
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = AppConfig::default();
        invalid_config.metadata_file = String::new();
        assert!(invalid_config.validate().is_err());
    }
}
