use rand::Rng;
use thiserror::Error;

/// Errors raised when building a [`Matrix`] from nested rows.
#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("matrix has no rows")]
    Empty,
    #[error("row {row} has {actual} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Dense row-major matrix of `f64`.
#[derive(Clone, Debug)]
pub struct Matrix {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) data: Vec<f64>,
}

impl Matrix {
    #[must_use]
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "Data length must match rows * cols"
        );
        Self { rows, cols, data }
    }

    /// A `1 x n` matrix holding `values`.
    #[must_use]
    pub fn row_vector(values: &[f64]) -> Self {
        Self {
            rows: 1,
            cols: values.len(),
            data: values.to_vec(),
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Xavier/Glorot uniform initialisation: every entry is drawn from
    /// `[-limit, limit)` with `limit = sqrt(6 / (rows + cols))`.
    #[must_use]
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let limit = (6.0 / (rows + cols).max(1) as f64).sqrt();
        let data = (0..rows * cols)
            .map(|_| rng.random_range(-limit..limit))
            .collect();

        Self { rows, cols, data }
    }

    /// Builds a matrix from nested rows, rejecting empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let cols = rows.first().map(Vec::len).ok_or(MatrixError::Empty)?;
        let row_count = rows.len();
        let mut data = Vec::with_capacity(row_count * cols);

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::RaggedRows {
                    row: index,
                    expected: cols,
                    actual: row.len(),
                });
            }
            data.extend(row);
        }

        Ok(Self {
            rows: row_count,
            cols,
            data,
        })
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    #[must_use]
    pub fn elementwise_multiply(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.rows, other.rows, "Matrix rows must match");
        assert_eq!(self.cols, other.cols, "Matrix columns must match");

        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a * b)
            .collect();

        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    #[must_use]
    pub fn dot_multiply(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, other.rows,
            "Invalid matrix dimensions for multiplication"
        );

        let mut result = vec![0.0; self.rows * other.cols];
        if self.cols == 0 || other.cols == 0 {
            return Matrix {
                rows: self.rows,
                cols: other.cols,
                data: result,
            };
        }

        // Accumulate row by row so both operands are walked contiguously.
        for (lhs_row, out_row) in self
            .data
            .chunks(self.cols)
            .zip(result.chunks_mut(other.cols))
        {
            for (&lhs, rhs_row) in lhs_row.iter().zip(other.data.chunks(other.cols)) {
                for (out, &rhs) in out_row.iter_mut().zip(rhs_row) {
                    *out += lhs * rhs;
                }
            }
        }

        Matrix {
            rows: self.rows,
            cols: other.cols,
            data: result,
        }
    }

    /// In place `self[i][j] += scale * left[i] * right[j]`.
    pub fn add_scaled_outer(&mut self, scale: f64, left: &[f64], right: &[f64]) {
        assert_eq!(self.rows, left.len(), "Outer product rows must match");
        assert_eq!(self.cols, right.len(), "Outer product columns must match");
        if self.cols == 0 {
            return;
        }

        for (row, &l) in self.data.chunks_mut(self.cols).zip(left) {
            let factor = scale * l;
            for (cell, &r) in row.iter_mut().zip(right) {
                *cell += factor * r;
            }
        }
    }

    #[must_use]
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        let data = self.data.iter().map(|&x| f(x)).collect();

        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    #[must_use]
    pub fn add(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.rows, other.rows, "Matrix rows must match");
        assert_eq!(self.cols, other.cols, "Matrix columns must match");

        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a + b)
            .collect();

        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    #[must_use]
    pub fn subtract(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.rows, other.rows, "Matrix rows must match");
        assert_eq!(self.cols, other.cols, "Matrix columns must match");

        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a - b)
            .collect();

        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }
}

/// Column vector (`n x 1`).
impl From<Vec<f64>> for Matrix {
    fn from(vec: Vec<f64>) -> Self {
        let rows = vec.len();
        Matrix {
            rows,
            cols: 1,
            data: vec,
        }
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_elementwise_multiply() {
        let matrix1 = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
        let matrix2 = Matrix::new(2, 2, vec![5.0, 6.0, 7.0, 8.0]);

        let result = matrix1.elementwise_multiply(&matrix2);

        assert_eq!(result, Matrix::new(2, 2, vec![5.0, 12.0, 21.0, 32.0]));
    }

    #[test]
    fn test_subtract_same_dimensions() {
        let matrix1 = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
        let matrix2 = Matrix::new(2, 2, vec![5.0, 6.0, 7.0, 8.0]);

        let expected = Matrix::new(2, 2, vec![-4.0, -4.0, -4.0, -4.0]);

        assert_eq!(matrix1.subtract(&matrix2), expected);
    }

    #[test]
    #[should_panic(expected = "Matrix columns must match")]
    fn test_subtract_different_dimensions() {
        let matrix1 = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
        let matrix2 = Matrix::new(2, 3, vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);

        let _ = matrix1.subtract(&matrix2);
    }

    #[test]
    fn test_dot_multiply() {
        let a = Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = Matrix::new(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);

        let expected_result = Matrix::new(2, 2, vec![58.0, 64.0, 139.0, 154.0]);

        assert_eq!(a.dot_multiply(&b), expected_result);
    }

    #[test]
    fn test_row_vector_times_matrix() {
        let weights = Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let result = Matrix::row_vector(&[0.5, 1.0]).dot_multiply(&weights);

        assert_eq!(result.rows(), 1);
        assert_eq!(result.data(), &[4.5, 6.0, 7.5]);
    }

    #[test]
    fn test_matrix_times_column_vector() {
        let weights = Matrix::new(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let result = weights.dot_multiply(&Matrix::from(vec![1.0, -1.0]));

        assert_eq!(result.rows(), 3);
        assert_eq!(result.cols(), 1);
        assert_eq!(result.data(), &[-1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_matrix_addition() {
        let a = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
        let b = Matrix::new(2, 2, vec![5.0, 6.0, 7.0, 8.0]);

        assert_eq!(a.add(&b), Matrix::new(2, 2, vec![6.0, 8.0, 10.0, 12.0]));
    }

    #[test]
    fn test_add_scaled_outer() {
        let mut m = Matrix::new(2, 3, vec![0.0; 6]);

        m.add_scaled_outer(0.5, &[1.0, 2.0], &[1.0, 0.0, -2.0]);

        let expected = [0.5, 0.0, -1.0, 1.0, 0.0, -2.0];
        for (&actual, &expected) in m.data().iter().zip(&expected) {
            assert_relative_eq!(actual, expected);
        }
    }

    #[test]
    fn test_map_square() {
        let matrix = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]);

        let transformed = matrix.map(|x| x * x);

        assert_eq!(transformed, Matrix::new(2, 2, vec![1.0, 4.0, 9.0, 16.0]));
    }

    #[test]
    fn test_xavier_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::xavier(10, 15, &mut rng);
        let limit = (6.0_f64 / 25.0).sqrt();

        assert_eq!(m.rows(), 10);
        assert_eq!(m.cols(), 15);
        assert!(m.data().iter().all(|&w| (-limit..limit).contains(&w)));
        assert!(m.data().iter().any(|&w| w != 0.0));
    }

    #[test]
    fn test_xavier_is_seed_deterministic() {
        let a = Matrix::xavier(3, 4, &mut StdRng::seed_from_u64(99));
        let b = Matrix::xavier(3, 4, &mut StdRng::seed_from_u64(99));

        assert_eq!(a, b);
    }

    #[test]
    fn test_rows_round_trip() {
        let m = Matrix::new(2, 3, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);

        let rows = m.to_rows();
        assert_eq!(rows, vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]]);
        assert_eq!(Matrix::from_rows(rows), Ok(m));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let result = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);

        assert_eq!(
            result,
            Err(MatrixError::RaggedRows {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(Matrix::from_rows(Vec::new()), Err(MatrixError::Empty));
    }

    #[test]
    fn test_is_finite() {
        let mut m = Matrix::new(1, 2, vec![0.0, 0.0]);
        assert!(m.is_finite());

        m.add_scaled_outer(f64::INFINITY, &[1.0], &[1.0, 0.5]);
        assert!(!m.is_finite());
    }
}
