#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};

use ligamap_core_rs::num::Float;

/// Centered moving average with an odd window. Positions near the edges are averaged over the
/// available neighbours only, there is no padding or wraparound.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Eq, Hash, Debug, Dissolve, Getters)]
pub struct MovingAverage {
    window: usize,
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self {
            window: Self::DEFAULT_WINDOW,
        }
    }
}

impl MovingAverage {
    pub const DEFAULT_WINDOW: usize = 51;

    pub fn new(window: usize) -> Self {
        let mut smoothing = Self::default();
        smoothing.set_window(window);
        smoothing
    }

    /// Set the window size. Zero becomes 1 and even sizes are raised to the next odd number.
    pub fn set_window(&mut self, window: usize) -> &mut Self {
        let adjusted = match window {
            0 => 1,
            x if x % 2 == 0 => x + 1,
            x => x,
        };
        if adjusted != window {
            log::warn!("Smoothing window must be odd and positive, got {window}. Using {adjusted}");
        }
        self.window = adjusted;
        self
    }

    pub fn run<V: Float>(&self, signal: &[V]) -> Vec<V> {
        let half = self.window / 2;
        if half == 0 || signal.is_empty() {
            return signal.to_vec();
        }

        // cumsum[i] = sum of signal[..i]
        let mut cumsum = Vec::with_capacity(signal.len() + 1);
        cumsum.push(V::zero());
        for (ind, value) in signal.iter().enumerate() {
            cumsum.push(cumsum[ind] + *value);
        }

        let last = signal.len() - 1;
        (0..signal.len())
            .map(|ind| {
                let (start, end) = (ind.saturating_sub(half), (ind + half).min(last));
                let total = cumsum[end + 1] - cumsum[start];
                total / V::from(end - start + 1).unwrap_or_else(V::one)
            })
            .collect()
    }
}
