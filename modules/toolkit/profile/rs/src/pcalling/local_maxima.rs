use std::cmp::Ordering;
use std::collections::BTreeSet;

#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};
use itertools::Itertools;

use ligamap_core_rs::num::Float;

use super::peak::Peak;

/// Minimum drop from the summit to the lowest point within the spacing radius.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Prominence {
    /// Fixed prominence in signal units.
    Absolute(f64),
    /// Prominence expressed in standard deviations of the signal.
    Sigmas(f64),
}

impl Default for Prominence {
    fn default() -> Self {
        Prominence::Absolute(0.0)
    }
}

impl Prominence {
    fn sanitized(self) -> Self {
        match self {
            Prominence::Absolute(x) if x.is_finite() && x >= 0.0 => self,
            Prominence::Sigmas(x) if x.is_finite() && x >= 0.0 => self,
            other => {
                log::warn!("Peak prominence must be a non-negative number, got {other:?}. Using 0");
                match other {
                    Prominence::Absolute(_) => Prominence::Absolute(0.0),
                    Prominence::Sigmas(_) => Prominence::Sigmas(0.0),
                }
            }
        }
    }

    /// Resolve the prominence threshold for the given signal.
    pub fn threshold<V: Float>(&self, signal: &[V]) -> V {
        match *self {
            Prominence::Absolute(x) => V::from(x).unwrap_or_else(V::zero),
            Prominence::Sigmas(x) => V::from(x).unwrap_or_else(V::zero) * stddev(signal),
        }
    }
}

/// Population standard deviation, 0 for empty signals.
pub fn stddev<V: Float>(signal: &[V]) -> V {
    if signal.is_empty() {
        return V::zero();
    }
    let length = V::from(signal.len()).unwrap_or_else(V::one);
    let mean = signal.iter().fold(V::zero(), |acc, x| acc + *x) / length;
    let var = signal
        .iter()
        .fold(V::zero(), |acc, x| acc + (*x - mean).powi(2))
        / length;
    var.sqrt()
}

/// Greedy local-maxima caller.
///
/// Candidates are strict rises followed by a non-increase (S[i-1] < S[i] >= S[i+1]). They are
/// visited from the highest to the lowest (ties resolved by position) and accepted if no
/// previously accepted peak is closer than `min_distance` and the summit rises above the
/// lowest point within `min_distance` by at least the prominence.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct PeakDetector {
    min_distance: usize,
    prominence: Prominence,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self {
            min_distance: 1,
            prominence: Prominence::default(),
        }
    }
}

impl PeakDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum distance between accepted peaks. Zero is clamped to 1.
    pub fn set_min_distance(&mut self, min_distance: usize) -> &mut Self {
        if min_distance == 0 {
            log::warn!("Minimum peak spacing must be at least 1, got 0. Using 1");
        }
        self.min_distance = min_distance.max(1);
        self
    }

    pub fn set_prominence(&mut self, prominence: Prominence) -> &mut Self {
        self.prominence = prominence.sanitized();
        self
    }

    fn candidates<V: Float>(signal: &[V]) -> Vec<usize> {
        (1..signal.len().saturating_sub(1))
            .filter(|&ind| signal[ind - 1] < signal[ind] && signal[ind] >= signal[ind + 1])
            .sorted_by(|a, b| {
                signal[*b]
                    .partial_cmp(&signal[*a])
                    .unwrap_or(Ordering::Equal)
                    .then(a.cmp(b))
            })
            .collect()
    }

    pub fn run<V: Float>(&self, signal: &[V]) -> Vec<Peak<V>> {
        let threshold = self.prominence.threshold(signal);
        let reach = self.min_distance;
        let mut accepted: BTreeSet<usize> = BTreeSet::new();

        for ind in Self::candidates(signal) {
            // Suppressed by a higher peak nearby
            let nearby = ind.saturating_sub(reach - 1)..=ind + (reach - 1);
            if accepted.range(nearby).next().is_some() {
                continue;
            }

            let (start, end) = (ind.saturating_sub(reach), (ind + reach).min(signal.len() - 1));
            let lowest = signal[start..=end]
                .iter()
                .fold(signal[ind], |acc, x| acc.min(*x));
            if signal[ind] - lowest < threshold {
                continue;
            }

            accepted.insert(ind);
        }

        accepted
            .into_iter()
            .map(|ind| Peak::new(ind, signal[ind]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(peaks: &[Peak<f64>]) -> Vec<usize> {
        peaks.iter().map(|x| *x.index()).collect()
    }

    #[test]
    fn test_simple_maxima() {
        let signal = [0.0f64, 1.0, 3.0, 2.0, 5.0, 1.0, 0.0];
        let peaks = PeakDetector::new().run(&signal);
        assert_eq!(indices(&peaks), vec![2, 4]);
        assert_eq!(*peaks[1].value(), 5.0);
    }

    #[test]
    fn test_plateaus_and_edges() {
        // Edges are never peaks, the first point of a plateau is
        let signal = [9.0f64, 1.0, 4.0, 4.0, 4.0, 2.0, 8.0];
        assert_eq!(indices(&PeakDetector::new().run(&signal)), vec![2]);

        assert!(PeakDetector::new().run::<f64>(&[]).is_empty());
        assert!(PeakDetector::new().run(&[1.0, 2.0]).is_empty());
    }

    #[test]
    fn test_higher_peak_wins_neighbourhood() {
        let signal = [0.0f64, 2.0, 0.0, 5.0, 0.0, 3.0, 0.0, 0.0, 4.0, 0.0];

        let mut detector = PeakDetector::new();
        detector.set_min_distance(3);
        assert_eq!(indices(&detector.run(&signal)), vec![3, 8]);

        detector.set_min_distance(2);
        assert_eq!(indices(&detector.run(&signal)), vec![1, 3, 5, 8]);
    }

    #[test]
    fn test_prominence_filter() {
        let signal = [0.0f64, 10.0, 9.0, 9.5, 9.0, 0.0];

        let mut detector = PeakDetector::new();
        detector.set_min_distance(1).set_prominence(Prominence::Absolute(1.0));
        assert_eq!(indices(&detector.run(&signal)), vec![1]);

        detector.set_prominence(Prominence::Absolute(0.4));
        assert_eq!(indices(&detector.run(&signal)), vec![1, 3]);
    }

    #[test]
    fn test_prominence_in_sigmas() {
        let signal = [0.0f64, 4.0, 0.0, 1.0, 0.0, 0.0];
        let sigma = stddev(&signal);

        let mut detector = PeakDetector::new();
        detector.set_prominence(Prominence::Sigmas(1.0));
        assert!(sigma > 1.0 && sigma < 4.0);
        assert_eq!(indices(&detector.run(&signal)), vec![1]);
    }

    #[test]
    fn test_degenerate_parameters() {
        let mut detector = PeakDetector::new();
        detector
            .set_min_distance(0)
            .set_prominence(Prominence::Sigmas(f64::NAN));
        assert_eq!(*detector.min_distance(), 1);
        assert_eq!(*detector.prominence(), Prominence::Sigmas(0.0));
    }
}
