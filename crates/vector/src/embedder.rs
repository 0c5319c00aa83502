//! Deterministic hash embeddings.
//!
//! Each surviving token contributes `sin(hash + i*j) * 0.1` to component `j`,
//! where `i` is the token's position. The result is L2-normalized, or left as
//! the zero vector when no token survives.

use tracing::debug;
use trendvec_common::config::DEFAULT_EMBEDDING_DIM;
use trendvec_common::{Result, TrendvecError};

use crate::types::Embedding;

/// Default embedding dimension
pub const DEFAULT_DIM: usize = DEFAULT_EMBEDDING_DIM;

/// Tokens shorter than this are discarded
pub const MIN_TOKEN_LEN: usize = 3;

/// Per-token contribution scale
pub const COMPONENT_SCALE: f64 = 0.1;

/// Common trait for text embedders
pub trait Embedder: Send + Sync {
    /// Output dimension
    fn dim(&self) -> usize;

    /// Generate embedding for text
    fn embed(&self, text: &str) -> Result<Embedding>;

    /// Embedder identifier (recorded in the index manifest)
    fn name(&self) -> String;
}

/// Stable string hash used to seed token projections
pub trait TokenHasher: Send + Sync {
    fn hash_token(&self, token: &str) -> u32;

    fn name(&self) -> &'static str;
}

/// 32-bit FNV-1a over UTF-8 bytes
///
/// Values stay below 2^32 so `hash + i*j` is exact in f64.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fnv1a32;

impl Fnv1a32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
}

impl TokenHasher for Fnv1a32 {
    fn hash_token(&self, token: &str) -> u32 {
        token.bytes().fold(Self::OFFSET_BASIS, |hash, byte| {
            (hash ^ u32::from(byte)).wrapping_mul(Self::PRIME)
        })
    }

    fn name(&self) -> &'static str {
        "fnv1a32"
    }
}

/// Lower-case, strip punctuation, split on whitespace, drop short tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Hash-projection embedder
#[derive(Debug, Clone)]
pub struct HashEmbedder<H = Fnv1a32> {
    dim: usize,
    hasher: H,
}

impl HashEmbedder<Fnv1a32> {
    /// Create embedder with the default hash
    pub fn new(dim: usize) -> Result<Self> {
        Self::with_hasher(dim, Fnv1a32)
    }
}

impl Default for HashEmbedder<Fnv1a32> {
    fn default() -> Self {
        Self {
            dim: DEFAULT_DIM,
            hasher: Fnv1a32,
        }
    }
}

impl<H: TokenHasher> HashEmbedder<H> {
    /// Create embedder with a custom token hash
    pub fn with_hasher(dim: usize, hasher: H) -> Result<Self> {
        if dim == 0 {
            return Err(TrendvecError::InvalidDimension(dim));
        }
        Ok(Self { dim, hasher })
    }

    fn project(&self, tokens: &[String]) -> Embedding {
        let mut acc = vec![0.0f64; self.dim];

        for (i, token) in tokens.iter().enumerate() {
            let hash = f64::from(self.hasher.hash_token(token));
            for (j, component) in acc.iter_mut().enumerate() {
                *component += (hash + (i * j) as f64).sin() * COMPONENT_SCALE;
            }
        }

        let norm = acc.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            acc.iter().map(|x| (x / norm) as f32).collect()
        } else {
            vec![0.0; self.dim]
        }
    }
}

impl<H: TokenHasher> Embedder for HashEmbedder<H> {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Result<Embedding> {
        let tokens = tokenize(text);
        debug!("Embedding {} tokens (dim={})", tokens.len(), self.dim);
        Ok(self.project(&tokens))
    }

    fn name(&self) -> String {
        format!("hash-{}", self.hasher.name())
    }
}

/// Embed text with the default hash embedder
pub fn embed(text: &str, dim: usize) -> Result<Embedding> {
    HashEmbedder::new(dim)?.embed(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::l2_norm;

    #[test]
    fn test_fnv1a_reference_values() {
        let h = Fnv1a32;
        assert_eq!(h.hash_token(""), 0x811c_9dc5);
        assert_eq!(h.hash_token("a"), 0xe40c_292c);
        assert_eq!(h.hash_token("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Classic White-Sneakers, for ME!"),
            vec!["classic", "whitesneakers", "for"]
        );
        assert!(tokenize("a bb").is_empty());
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
    }

    #[test]
    fn test_deterministic() {
        let a = embed("Classic White Sneakers", 64).unwrap();
        let b = embed("Classic White Sneakers", 64).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalized() {
        for text in ["white sneakers", "Leather Tote Bag", "denim"] {
            let v = embed(text, 64).unwrap();
            assert!((l2_norm(&v) - 1.0).abs() < 1e-5, "norm off for {:?}", text);
        }
    }

    #[test]
    fn test_zero_vector_when_no_tokens() {
        assert_eq!(embed("", 64).unwrap(), vec![0.0; 64]);
        assert_eq!(embed("a bb", 64).unwrap(), vec![0.0; 64]);
        assert_eq!(embed("!! ?? ..", 16).unwrap(), vec![0.0; 16]);
    }

    #[test]
    fn test_dimension_contract() {
        for dim in [1, 7, 64, 300] {
            assert_eq!(embed("white sneakers", dim).unwrap().len(), dim);
        }
    }

    #[test]
    fn test_invalid_dimension() {
        assert!(matches!(
            embed("white sneakers", 0),
            Err(TrendvecError::InvalidDimension(0))
        ));
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let a = embed("White Sneakers!", 32).unwrap();
        let b = embed("white sneakers", 32).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_order_matters() {
        let a = embed("white sneakers", 32).unwrap();
        let b = embed("sneakers white", 32).unwrap();
        assert_ne!(a, b);
    }

    struct ConstantHasher;

    impl TokenHasher for ConstantHasher {
        fn hash_token(&self, _token: &str) -> u32 {
            0
        }

        fn name(&self) -> &'static str {
            "constant"
        }
    }

    #[test]
    fn test_custom_hasher() {
        // Single token at position 0 with hash 0: sin(0) everywhere.
        let embedder = HashEmbedder::with_hasher(8, ConstantHasher).unwrap();
        assert_eq!(embedder.embed("word").unwrap(), vec![0.0; 8]);
        assert_eq!(embedder.name(), "hash-constant");
    }
}
