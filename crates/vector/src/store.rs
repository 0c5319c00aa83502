use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use trendvec_common::{AppConfig, Result, TrendvecError};

use crate::types::{Index, Record};

/// Index manifest, written next to the two artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    /// Embedding dimension
    pub dim: usize,

    /// Number of records
    pub count: usize,

    /// Embedder used to build the index
    pub embedder: String,

    /// Build timestamp
    pub created_at: DateTime<Utc>,

    /// SHA-256 of the embeddings artifact bytes
    pub embeddings_sha256: String,
}

/// On-disk index store (embeddings matrix + record metadata)
pub struct IndexStore {
    embeddings_path: PathBuf,
    metadata_path: PathBuf,
    manifest_path: PathBuf,
}

impl IndexStore {
    /// Create store rooted at the configured data directory
    pub fn new(config: &AppConfig) -> Self {
        Self {
            embeddings_path: config.embeddings_path(),
            metadata_path: config.metadata_path(),
            manifest_path: config.manifest_path(),
        }
    }

    /// Whether both artifacts exist
    pub fn exists(&self) -> bool {
        self.embeddings_path.exists() && self.metadata_path.exists()
    }

    pub fn embeddings_path(&self) -> &PathBuf {
        &self.embeddings_path
    }

    pub fn metadata_path(&self) -> &PathBuf {
        &self.metadata_path
    }

    /// Save index artifacts and manifest
    pub async fn save(&self, index: &Index, embedder: &str) -> Result<IndexManifest> {
        let matrix = index.as_matrix()?;

        for path in [&self.embeddings_path, &self.metadata_path, &self.manifest_path] {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let embeddings_json = serde_json::to_vec(&matrix)?;
        tokio::fs::write(&self.embeddings_path, &embeddings_json).await?;
        info!("Embeddings saved to {}", self.embeddings_path.display());

        let metadata_json = serde_json::to_string_pretty(index.records())?;
        tokio::fs::write(&self.metadata_path, metadata_json).await?;
        info!("Metadata saved to {}", self.metadata_path.display());

        let manifest = IndexManifest {
            dim: index.dim(),
            count: index.len(),
            embedder: embedder.to_string(),
            created_at: Utc::now(),
            embeddings_sha256: sha256_hex(&embeddings_json),
        };
        tokio::fs::write(&self.manifest_path, serde_json::to_string_pretty(&manifest)?).await?;

        info!("Created index with {} vectors", manifest.count);
        Ok(manifest)
    }

    /// Load manifest, if one was written
    pub async fn manifest(&self) -> Result<Option<IndexManifest>> {
        if !self.manifest_path.exists() {
            return Ok(None);
        }
        let data = tokio::fs::read_to_string(&self.manifest_path).await?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Load index artifacts, verifying them against the manifest when present
    pub async fn load(&self) -> Result<Index> {
        for path in [&self.embeddings_path, &self.metadata_path] {
            if !path.exists() {
                return Err(TrendvecError::not_found(format!(
                    "index artifact {} (run `trendvec create` first)",
                    path.display()
                )));
            }
        }

        debug!("Loading embeddings from {}", self.embeddings_path.display());
        let embeddings_bytes = tokio::fs::read(&self.embeddings_path).await?;
        let matrix: Array2<f32> = serde_json::from_slice(&embeddings_bytes)?;

        let metadata = tokio::fs::read_to_string(&self.metadata_path).await?;
        let records: Vec<Record> = serde_json::from_str(&metadata)?;

        match self.manifest().await? {
            Some(manifest) => verify_manifest(&manifest, &matrix, records.len(), &embeddings_bytes)?,
            None => warn!(
                "No manifest at {}, skipping checksum verification",
                self.manifest_path.display()
            ),
        }

        let index = Index::from_matrix(&matrix, records);
        index.validate()?;

        info!(
            "Index loaded - {} entries, dim={}",
            index.len(),
            index.dim()
        );
        Ok(index)
    }
}

fn verify_manifest(
    manifest: &IndexManifest,
    matrix: &Array2<f32>,
    record_count: usize,
    embeddings_bytes: &[u8],
) -> Result<()> {
    if manifest.dim != matrix.ncols() {
        return Err(TrendvecError::storage(format!(
            "manifest dimension {} does not match embeddings dimension {}",
            manifest.dim,
            matrix.ncols()
        )));
    }

    if manifest.count != matrix.nrows() || manifest.count != record_count {
        return Err(TrendvecError::storage(format!(
            "manifest count {} does not match artifacts ({} embeddings, {} records)",
            manifest.count,
            matrix.nrows(),
            record_count
        )));
    }

    let checksum = sha256_hex(embeddings_bytes);
    if checksum != manifest.embeddings_sha256 {
        return Err(TrendvecError::storage(format!(
            "embeddings checksum mismatch: expected {}, got {}",
            manifest.embeddings_sha256, checksum
        )));
    }

    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
