//! Vector helpers shared by the encoders and the label bank.

use ndarray::{Array2, ArrayView1};

/// L2-normalize a vector in place so its magnitude is 1.
///
/// Near-zero vectors are left untouched.
pub fn l2_normalize_in_place(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Split a flat row-major buffer into `dim`-wide rows, normalizing each one.
pub fn normalized_rows(flat: &[f32], dim: usize) -> Vec<Vec<f32>> {
    flat.chunks(dim)
        .map(|row| {
            let mut row = row.to_vec();
            l2_normalize_in_place(&mut row);
            row
        })
        .collect()
}

/// Dot every row of `matrix` with `query` and multiply by `scale`.
///
/// With unit-length rows and query this is `scale * cosine`, one value per row
/// in row order.
pub fn scaled_similarities(matrix: &Array2<f32>, query: &[f32], scale: f32) -> Vec<f32> {
    let query = ArrayView1::from(query);
    matrix.dot(&query).iter().map(|s| s * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_three_four_five() {
        let mut v = vec![3.0, 4.0];
        l2_normalize_in_place(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_is_untouched() {
        let mut v = vec![0.0; 4];
        l2_normalize_in_place(&mut v);
        assert_eq!(v, vec![0.0; 4]);
    }

    #[test]
    fn test_normalized_rows_splits_by_dim() {
        let rows = normalized_rows(&[2.0, 0.0, 0.0, 5.0], 2);
        assert_eq!(rows, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_scaled_similarities_keeps_row_order() {
        let matrix = Array2::from_shape_vec((3, 2), vec![1.0, 0.0, 0.0, 1.0, 0.6, 0.8]).unwrap();
        let scores = scaled_similarities(&matrix, &[1.0, 0.0], 100.0);
        assert_eq!(scores.len(), 3);
        assert!((scores[0] - 100.0).abs() < 1e-4);
        assert!(scores[1].abs() < 1e-4);
        assert!((scores[2] - 60.0).abs() < 1e-4);
    }
}
