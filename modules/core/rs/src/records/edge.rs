use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

use super::name_key;

/// Aggregated interaction statistic between two named features. Weights (odds ratios or
/// similar enrichment scores) are computed upstream.
#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct WeightedEdge {
    source: String,
    target: String,
    count: u64,
    weight: f64,
    kind: String,
}

impl WeightedEdge {
    /// Name of the feature on the other side of the edge, if `name` is one of its ends.
    /// Names are compared by [`name_key`], the same way the feature catalog matches them.
    pub fn partner_of(&self, name: &str) -> Option<&str> {
        let key = name_key(name);
        if name_key(&self.source) == key {
            Some(&self.target)
        } else if name_key(&self.target) == key {
            Some(&self.source)
        } else {
            None
        }
    }
}
