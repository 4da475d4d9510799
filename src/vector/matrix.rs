//! Dense row-major matrix shared by the vectorizer and the clusterer.
//!
//! The vectorizer produces one row per document and the clusterer consumes
//! the same shape, so this is the only type the two components agree on.
//! Rows are stored contiguously to keep distance loops cache friendly.

use thiserror::Error;

/// Row widths disagree while building a matrix from nested vectors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Row {row} has {found} columns, expected {expected}")]
pub struct ShapeError {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

/// Dense `f64` matrix in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates an all-zero matrix.
    #[must_use]
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            data: vec![0.0; n_rows * n_cols],
        }
    }

    /// Builds a matrix from nested rows.
    ///
    /// The first row fixes the column count; an empty input yields a `0 x 0`
    /// matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        let n_cols = rows.first().map_or(0, Vec::len);
        Self::from_rows_with_width(rows, n_cols)
    }

    /// Builds a matrix from nested rows that must all have `n_cols` entries.
    ///
    /// Unlike [`Matrix::from_rows`] this keeps the column count when there
    /// are no rows at all.
    pub fn from_rows_with_width(rows: Vec<Vec<f64>>, n_cols: usize) -> Result<Self, ShapeError> {
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n_cols {
                return Err(ShapeError {
                    row,
                    expected: n_cols,
                    found: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
        })
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Returns `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Borrows row `i`.
    ///
    /// # Panics
    /// Panics if `i >= n_rows()`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.n_rows, "row {i} out of bounds ({})", self.n_rows);
        &self.data[i * self.n_cols..(i + 1) * self.n_cols]
    }

    /// Mutably borrows row `i`.
    ///
    /// # Panics
    /// Panics if `i >= n_rows()`.
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        assert!(i < self.n_rows, "row {i} out of bounds ({})", self.n_rows);
        &mut self.data[i * self.n_cols..(i + 1) * self.n_cols]
    }

    /// Iterates over rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    /// Entry at `(i, j)`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.row(i)[j]
    }

    /// Flat row-major view of all entries.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat row-major view of all entries.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// Squared Euclidean distance between two equally sized vectors.
#[inline]
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have same dimension");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean distance between two equally sized vectors.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// L2 norm of a vector.
#[inline]
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Normalizes a vector in place to unit length.
///
/// Returns `false` and leaves the vector untouched when its norm is zero.
pub fn normalize_in_place(v: &mut [f64]) -> bool {
    let norm = l2_norm(v);
    if norm > 0.0 {
        for value in v.iter_mut() {
            *value /= norm;
        }
        true
    } else {
        false
    }
}
