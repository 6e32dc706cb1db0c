#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use itertools::Itertools;

/// A point of the partner scatter: genomic position, weight (e.g. odds ratio) and an arbitrary
/// payload carried through to the output (category, partner name, etc).
#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct Candidate<T> {
    position: i64,
    weight: f64,
    tag: T,
}

/// Keeps one max-weight representative per cluster of nearby candidates.
///
/// Candidates are swept by position. A candidate farther than `radius` from the current
/// representative starts a new cluster, otherwise it replaces the representative if its weight
/// is strictly higher. The cluster span is always measured from the current representative, so
/// the first candidate wins weight ties.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Eq, Hash, Debug, Dissolve, Getters)]
pub struct WindowedPeakCollapser {
    radius: i64,
}

impl Default for WindowedPeakCollapser {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
        }
    }
}

impl WindowedPeakCollapser {
    pub const DEFAULT_RADIUS: i64 = 1000;

    pub fn new(radius: i64) -> Self {
        let mut collapser = Self::default();
        collapser.set_radius(radius);
        collapser
    }

    /// Cluster radius in nucleotides. Negative values are clamped to 0.
    pub fn set_radius(&mut self, radius: i64) -> &mut Self {
        if radius < 0 {
            log::warn!("Cluster radius must be non-negative, got {radius}. Using 0");
        }
        self.radius = radius.max(0);
        self
    }

    pub fn run<T>(&self, candidates: impl IntoIterator<Item = Candidate<T>>) -> Vec<Candidate<T>> {
        // Stable sort keeps the input order for identical positions
        let mut sorted = candidates
            .into_iter()
            .sorted_by_key(|x| x.position);

        let mut representative = match sorted.next() {
            Some(first) => first,
            None => return Vec::new(),
        };

        let radius = self.radius.max(0) as u64;
        let mut result = Vec::new();
        for candidate in sorted {
            if candidate.position.abs_diff(representative.position) > radius {
                result.push(std::mem::replace(&mut representative, candidate));
            } else if candidate.weight > representative.weight {
                representative = candidate;
            }
        }
        result.push(representative);

        result
    }
}
