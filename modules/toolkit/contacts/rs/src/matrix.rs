use std::ops::AddAssign;

use eyre::{ensure, Result};
use num::{NumCast, ToPrimitive, Zero};

use ligamap_core_rs::num::Float;

/// Square contact matrix stored in a row-major order. Indexed by bin on both axes.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct ContactMatrix<V> {
    size: usize,
    data: Vec<V>,
}

impl<V: Copy + Zero> ContactMatrix<V> {
    /// All-zero matrix with `size` bins on each axis.
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![V::zero(); size * size],
        }
    }

    /// Matrix where each cell is populated by the given function of (row, column).
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> V) -> Self {
        let mut data = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                data.push(f(row, col));
            }
        }
        Self { size, data }
    }

    pub fn from_rows(rows: Vec<Vec<V>>) -> Result<Self> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (ind, row) in rows.into_iter().enumerate() {
            ensure!(
                row.len() == size,
                "Contact matrix must be square: row {ind} has {} columns, expected {size}",
                row.len()
            );
            data.extend(row);
        }
        Ok(Self { size, data })
    }
}

impl<V: Copy> ContactMatrix<V> {
    /// Number of bins on each axis.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> V {
        self.data[row * self.size + col]
    }

    pub fn row(&self, row: usize) -> &[V] {
        &self.data[row * self.size..(row + 1) * self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[V]> {
        // chunks_exact panics on zero-sized chunks
        self.data.chunks_exact(self.size.max(1))
    }

    /// Cells in a row-major order.
    pub fn as_slice(&self) -> &[V] {
        &self.data
    }

    pub fn map<T>(&self, f: impl FnMut(V) -> T) -> ContactMatrix<T> {
        ContactMatrix {
            size: self.size,
            data: self.data.iter().copied().map(f).collect(),
        }
    }
}

impl<V: Copy + PartialEq> ContactMatrix<V> {
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|row| {
            (row + 1..self.size).all(|col| self.get(row, col) == self.get(col, row))
        })
    }
}

impl<V: Copy + Zero + AddAssign> ContactMatrix<V> {
    #[inline(always)]
    pub(crate) fn add(&mut self, row: usize, col: usize, value: V) {
        self.data[row * self.size + col] += value;
    }

    /// Sum of all cells.
    pub fn total(&self) -> V {
        let mut total = V::zero();
        for value in &self.data {
            total += *value;
        }
        total
    }

    pub fn row_sums(&self) -> Vec<V> {
        self.rows()
            .take(self.size)
            .map(|row| {
                let mut sum = V::zero();
                for value in row {
                    sum += *value;
                }
                sum
            })
            .collect()
    }
}

impl<V: Copy + ToPrimitive> ContactMatrix<V> {
    /// Cast values to floats, unrepresentable values become zeros.
    pub fn to_float<F: Float>(&self) -> ContactMatrix<F> {
        self.map(|x| <F as NumCast>::from(x).unwrap_or_else(F::zero))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_layout() -> Result<()> {
        let matrix =
            ContactMatrix::from_rows(vec![vec![1u64, 2, 3], vec![2, 5, 6], vec![3, 6, 9]])?;
        assert_eq!(matrix.size(), 3);
        assert_eq!(matrix.get(1, 2), 6);
        assert_eq!(matrix.row(2), &[3, 6, 9]);
        assert_eq!(matrix.rows().count(), 3);
        assert_eq!(matrix.row_sums(), vec![6, 13, 18]);
        assert_eq!(matrix.total(), 37);
        assert!(matrix.is_symmetric());

        let casted = matrix.to_float::<f64>();
        assert_eq!(casted.get(0, 2), 3.0);
        Ok(())
    }

    #[test]
    fn test_matrix_rejects_non_square() {
        assert!(ContactMatrix::from_rows(vec![vec![1u64, 2], vec![3]]).is_err());
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = ContactMatrix::<u64>::zeros(0);
        assert!(matrix.is_empty());
        assert_eq!(matrix.total(), 0);
        assert!(matrix.row_sums().is_empty());
        assert!(matrix.is_symmetric());
    }

    #[test]
    fn test_asymmetric_detected() {
        let matrix = ContactMatrix::from_fn(3, |row, col| (row * 3 + col) as u64);
        assert!(!matrix.is_symmetric());
    }
}
