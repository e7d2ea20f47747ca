//! Cartesian products of coordinate axes.
//!
//! Triangulation and point enumeration both consume coordinate pairs in a
//! flat (n_points, n_axes) layout, so the product is materialized once and
//! indexed by row.

use regrid_common::{RegridError, Result};

/// A dense (rows x cols) matrix of points, one combination per row.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl PointMatrix {
    /// Number of rows (point combinations).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (input axes).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// One row of the matrix.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate the rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }

    /// The rows as 2D points. Fails unless the matrix has exactly 2 columns.
    pub fn points_2d(&self) -> Result<Vec<[f64; 2]>> {
        if self.cols != 2 {
            return Err(RegridError::invalid_axis(format!(
                "expected 2-column point matrix, got {} columns",
                self.cols
            )));
        }
        Ok(self.iter_rows().map(|r| [r[0], r[1]]).collect())
    }
}

/// Build the cartesian product of the given axes.
///
/// Row `i` holds one unique combination of one value from each axis, in
/// lexicographic order with the first axis varying slowest. Downstream
/// reshapes rely on this row-major correspondence to the axis order, so the
/// ordering is part of the contract.
pub fn cartesian_product(axes: &[&[f64]]) -> Result<PointMatrix> {
    if axes.is_empty() {
        return Err(RegridError::invalid_axis(
            "cartesian product of zero axes",
        ));
    }
    if let Some(pos) = axes.iter().position(|a| a.is_empty()) {
        return Err(RegridError::invalid_axis(format!(
            "axis {} of cartesian product is empty",
            pos
        )));
    }

    let cols = axes.len();
    let rows: usize = axes.iter().map(|a| a.len()).product();

    // Stride of axis k is the number of rows its value stays constant for.
    let mut strides = vec![1usize; cols];
    for k in (0..cols - 1).rev() {
        strides[k] = strides[k + 1] * axes[k + 1].len();
    }

    let mut data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for k in 0..cols {
            let idx = (r / strides[k]) % axes[k].len();
            data.push(axes[k][idx]);
        }
    }

    Ok(PointMatrix { data, rows, cols })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_axis_product_ordering() {
        let product = cartesian_product(&[&[1.0, 2.0, 3.0], &[4.0, 5.0]]).unwrap();

        assert_eq!(product.rows(), 6);
        assert_eq!(product.cols(), 2);

        // First axis varies slowest.
        let rows: Vec<_> = product.iter_rows().collect();
        assert_eq!(rows[0], &[1.0, 4.0]);
        assert_eq!(rows[1], &[1.0, 5.0]);
        assert_eq!(rows[2], &[2.0, 4.0]);
        assert_eq!(rows[3], &[2.0, 5.0]);
        assert_eq!(rows[4], &[3.0, 4.0]);
        assert_eq!(rows[5], &[3.0, 5.0]);
    }

    #[test]
    fn test_three_axis_product() {
        let product =
            cartesian_product(&[&[1.0, 2.0, 3.0], &[4.0, 5.0], &[6.0, 7.0]]).unwrap();

        assert_eq!(product.rows(), 12);
        assert_eq!(product.cols(), 3);
        assert_eq!(product.row(0), &[1.0, 4.0, 6.0]);
        assert_eq!(product.row(1), &[1.0, 4.0, 7.0]);
        assert_eq!(product.row(2), &[1.0, 5.0, 6.0]);
        assert_eq!(product.row(11), &[3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_rows_are_unique() {
        let product = cartesian_product(&[&[1.0, 2.0], &[3.0, 4.0]]).unwrap();
        let rows: Vec<Vec<f64>> = product.iter_rows().map(|r| r.to_vec()).collect();
        for (i, a) in rows.iter().enumerate() {
            for b in rows.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_empty_axis_rejected() {
        let empty: &[f64] = &[];
        assert!(cartesian_product(&[&[1.0, 2.0], empty]).is_err());
        assert!(cartesian_product(&[]).is_err());
    }

    #[test]
    fn test_points_2d() {
        let product = cartesian_product(&[&[0.0, 1.0], &[2.0, 3.0]]).unwrap();
        let points = product.points_2d().unwrap();
        assert_eq!(points, vec![[0.0, 2.0], [0.0, 3.0], [1.0, 2.0], [1.0, 3.0]]);

        let three = cartesian_product(&[&[0.0, 1.0], &[2.0], &[3.0]]).unwrap();
        assert!(three.points_2d().is_err());
    }
}
