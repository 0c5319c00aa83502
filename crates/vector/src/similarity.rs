//! Vector math: L2 norm, dot product, cosine similarity.

use ndarray::ArrayView1;

/// Compute L2 norm of a vector.
pub fn l2_norm(v: &[f32]) -> f32 {
    let view = ArrayView1::from(v);
    view.dot(&view).sqrt()
}

/// Dot product of two equal-length vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    ArrayView1::from(a).dot(&ArrayView1::from(b))
}

/// Cosine similarity. Exactly 0.0 when either vector has zero norm.
///
/// Callers check that the lengths agree.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (norm_a * norm_b)
}
