#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};

use ligamap_core_rs::num::Float;

/// Symmetric log scale: linear within [-linthresh, linthresh] and logarithmic beyond it.
///
/// f(y) = sign(y) * |y| / t                           for |y| <= t
/// f(y) = sign(y) * (1 + log(|y| / t) / log(base))    for |y| > t
///
/// The same instance must be used for data values and axis ticks.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, Copy, PartialEq, Debug, Dissolve, Getters)]
pub struct SymLog {
    linthresh: f64,
    base: f64,
}

impl Default for SymLog {
    fn default() -> Self {
        Self {
            linthresh: 1.0,
            base: 10.0,
        }
    }
}

impl SymLog {
    const MAX_DECADES: usize = 64;

    pub fn new(linthresh: f64, base: f64) -> Result<Self> {
        ensure!(
            linthresh.is_finite() && linthresh > 0.0,
            "Symlog linear threshold must be a positive number, got {linthresh}"
        );
        ensure!(
            base.is_finite() && base > 1.0,
            "Symlog base must be a finite number > 1, got {base}"
        );
        Ok(Self { linthresh, base })
    }

    pub fn apply<V: Float>(&self, y: V) -> V {
        let (linthresh, base) = match (V::from(self.linthresh), V::from(self.base)) {
            (Some(linthresh), Some(base)) => (linthresh, base),
            _ => return V::nan(),
        };

        let magnitude = y.abs();
        let scaled = if magnitude <= linthresh {
            magnitude / linthresh
        } else {
            V::one() + (magnitude / linthresh).ln() / base.ln()
        };

        if y < V::zero() {
            -scaled
        } else {
            scaled
        }
    }

    /// Reference ticks covering [-max_abs, max_abs]: zero and +-linthresh * base^k.
    /// Returns pairs of (value, transformed value) in ascending order.
    pub fn ticks(&self, max_abs: f64) -> Vec<(f64, f64)> {
        let mut positive = Vec::new();
        if max_abs.is_finite() {
            let mut value = self.linthresh;
            while value <= max_abs && positive.len() < Self::MAX_DECADES {
                positive.push(value);
                value *= self.base;
            }
        }

        let negative = positive.iter().rev().map(|x| -x);
        negative
            .chain(std::iter::once(0.0))
            .chain(positive.iter().copied())
            .map(|x| (x, self.apply(x)))
            .collect()
    }
}
