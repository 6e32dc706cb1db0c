#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};

use ligamap_core_rs::num::Float;

use crate::matrix::ContactMatrix;

/// Iterative correction (ICE) of per-bin visibility biases in a symmetric contact matrix.
///
/// Each iteration rescales bin biases by the ratio of the bin coverage to the mean coverage of
/// covered bins, renormalizes biases to mean 1 and stops once the RMS change of biases drops
/// below the tolerance. The iteration cap bounds the work for matrices that never converge, in
/// which case the last estimate is returned.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct IterativeBiasNormalizer {
    max_iterations: usize,
    tolerance: f64,
}

/// Normalized matrix together with the estimated biases.
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct Normalized<V> {
    matrix: ContactMatrix<V>,
    biases: Vec<V>,
    iterations: usize,
    converged: bool,
}

impl Default for IterativeBiasNormalizer {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }
}

impl IterativeBiasNormalizer {
    pub const DEFAULT_MAX_ITERATIONS: usize = 250;
    pub const DEFAULT_TOLERANCE: f64 = 1e-5;

    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of iterations, at least one iteration is always performed.
    pub fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        if max_iterations == 0 {
            log::warn!("ICE requires at least one iteration, got 0. Using 1 instead");
        }
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// RMS change of biases below which the iterations stop. Non-positive or non-finite values
    /// fall back to the default tolerance.
    pub fn set_tolerance(&mut self, tolerance: f64) -> &mut Self {
        if tolerance.is_finite() && tolerance > 0.0 {
            self.tolerance = tolerance;
        } else {
            log::warn!(
                "ICE tolerance must be a positive number, got {tolerance}. Using {} instead",
                Self::DEFAULT_TOLERANCE
            );
            self.tolerance = Self::DEFAULT_TOLERANCE;
        }
        self
    }

    fn balance<V: Float>(&self, matrix: &ContactMatrix<V>, biases: &[V], saveto: &mut [V]) {
        let size = matrix.size();
        for (row, sum) in saveto.iter_mut().enumerate() {
            *sum = V::zero();
            if biases[row].is_zero() {
                continue;
            }
            let values = matrix.row(row);
            for col in 0..size {
                if !biases[col].is_zero() {
                    *sum = *sum + values[col] / (biases[row] * biases[col]);
                }
            }
        }
    }

    /// Rescale biases of covered bins to mean 1. Bins without coverage keep their biases.
    fn renormalize<V: Float>(biases: &mut [V], rowsums: &[V]) {
        let (mut total, mut count) = (V::zero(), 0usize);
        for (bias, _) in biases.iter().zip(rowsums).filter(|(_, sum)| **sum > V::zero()) {
            total = total + *bias;
            count += 1;
        }
        if count == 0 || total.is_zero() {
            return;
        }

        let mean = total / V::from(count).unwrap_or_else(V::one);
        for (bias, sum) in biases.iter_mut().zip(rowsums) {
            if *sum > V::zero() {
                *bias = *bias / mean;
            }
        }
    }

    pub fn run<V: Float>(&self, matrix: &ContactMatrix<V>) -> Normalized<V> {
        let size = matrix.size();
        if size <= 1 {
            return Normalized {
                matrix: matrix.clone(),
                biases: vec![V::one(); size],
                iterations: 0,
                converged: true,
            };
        }

        let tolerance = V::from(self.tolerance).unwrap_or_else(V::epsilon);
        let nbins = V::from(size).unwrap_or_else(V::one);

        let mut biases = vec![V::one(); size];
        let mut previous = vec![V::one(); size];
        let mut rowsums = vec![V::zero(); size];

        let (mut iterations, mut converged) = (0, false);
        while iterations < self.max_iterations {
            iterations += 1;

            self.balance(matrix, &biases, &mut rowsums);

            // Bins without any coverage don't take part in the balancing
            let (total, covered) = rowsums
                .iter()
                .filter(|x| **x > V::zero())
                .fold((V::zero(), 0usize), |(total, cnt), x| (total + *x, cnt + 1));
            if covered == 0 {
                converged = true;
                break;
            }
            let target = total / V::from(covered).unwrap_or_else(V::one);

            previous.copy_from_slice(&biases);
            for (bias, sum) in biases.iter_mut().zip(&rowsums) {
                if *sum > V::zero() {
                    *bias = *bias * (*sum / target);
                }
            }
            Self::renormalize(&mut biases, &rowsums);

            // The change is measured after renormalization
            let sqdiff = biases
                .iter()
                .zip(&previous)
                .fold(V::zero(), |acc, (new, old)| acc + (*new - *old).powi(2));
            let rms = (sqdiff / nbins).sqrt();
            if rms < tolerance {
                converged = true;
                break;
            }
        }

        if converged {
            log::debug!("ICE converged after {iterations} iterations for {size} bins");
        } else {
            log::debug!(
                "ICE didn't converge after {iterations} iterations for {size} bins, returning the last estimate"
            );
        }

        let normalized = ContactMatrix::from_fn(size, |row, col| {
            let (left, right) = (biases[row], biases[col]);
            if left.is_zero() || right.is_zero() {
                V::zero()
            } else {
                matrix.get(row, col) / (left * right)
            }
        });

        Normalized {
            matrix: normalized,
            biases,
            iterations,
            converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread(values: &[f64]) -> f64 {
        let max = values.iter().cloned().fold(f64::MIN, f64::max);
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        (max - min) / max
    }

    #[test]
    fn test_rows_are_balanced() {
        let matrix = ContactMatrix::from_rows(vec![
            vec![10.0f64, 4.0, 1.0, 2.0],
            vec![4.0, 30.0, 6.0, 1.0],
            vec![1.0, 6.0, 5.0, 3.0],
            vec![2.0, 1.0, 3.0, 8.0],
        ])
        .unwrap();

        let mut normalizer = IterativeBiasNormalizer::new();
        normalizer.set_max_iterations(1000).set_tolerance(1e-12);
        let result = normalizer.run(&matrix);

        assert!(*result.converged());
        assert!(result.matrix().is_symmetric());
        assert!(spread(&result.matrix().row_sums()) < 1e-6);

        // Biases are normalized to mean 1
        let mean = result.biases().iter().sum::<f64>() / 4.0;
        assert!((mean - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_rows_are_ignored() {
        let matrix = ContactMatrix::from_rows(vec![
            vec![3.0f64, 0.0, 1.0],
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 9.0],
        ])
        .unwrap();

        let mut normalizer = IterativeBiasNormalizer::new();
        normalizer.set_tolerance(1e-12).set_max_iterations(1000);
        let result = normalizer.run(&matrix);

        let sums = result.matrix().row_sums();
        assert_eq!(sums[1], 0.0);
        assert!(spread(&[sums[0], sums[2]]) < 1e-6);
        assert!(result.matrix().as_slice().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_single_bin_is_untouched() {
        let matrix = ContactMatrix::from_rows(vec![vec![7.0f32]]).unwrap();
        let result = IterativeBiasNormalizer::new().run(&matrix);
        assert_eq!(result.matrix(), &matrix);
        assert_eq!(*result.iterations(), 0);

        let matrix = ContactMatrix::<f64>::zeros(0);
        let result = IterativeBiasNormalizer::new().run(&matrix);
        assert_eq!(result.matrix(), &matrix);
    }

    #[test]
    fn test_zero_matrix() {
        let matrix = ContactMatrix::<f64>::zeros(5);
        let result = IterativeBiasNormalizer::new().run(&matrix);
        assert!(*result.converged());
        assert_eq!(result.matrix(), &matrix);
    }

    #[test]
    fn test_iteration_cap() {
        let matrix = ContactMatrix::from_rows(vec![vec![1.0f64, 5.0], vec![5.0, 100.0]]).unwrap();

        let mut normalizer = IterativeBiasNormalizer::new();
        normalizer.set_max_iterations(1).set_tolerance(1e-12);
        let result = normalizer.run(&matrix);
        assert_eq!(*result.iterations(), 1);
        assert!(!*result.converged());
        assert!(result.matrix().as_slice().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_degenerate_parameters_clamped() {
        let mut normalizer = IterativeBiasNormalizer::new();
        normalizer.set_max_iterations(0).set_tolerance(-1.0);
        assert_eq!(*normalizer.max_iterations(), 1);
        assert_eq!(
            *normalizer.tolerance(),
            IterativeBiasNormalizer::DEFAULT_TOLERANCE
        );

        normalizer.set_tolerance(f64::NAN);
        assert_eq!(
            *normalizer.tolerance(),
            IterativeBiasNormalizer::DEFAULT_TOLERANCE
        );
    }
}
