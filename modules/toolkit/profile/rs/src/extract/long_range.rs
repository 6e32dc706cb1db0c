#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};

use ligamap_core_rs::loc::{Contig, CoordinateWindow};
use ligamap_core_rs::num::Float;
use ligamap_core_rs::records::InteractionEvent;

/// Per-position count of long-range partners along a window.
///
/// An event contributes to the position of its in-window anchor only if the other anchor lies
/// farther than `radius` nucleotides from the window (or on another contig). Events with both
/// anchors in the window, or with the partner in the vicinity of the window, are local
/// structure and are ignored.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Eq, Hash, Debug, Dissolve, Getters)]
pub struct ProfileExtractor {
    radius: i64,
}

impl Default for ProfileExtractor {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
        }
    }
}

impl ProfileExtractor {
    pub const DEFAULT_RADIUS: i64 = 5000;

    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusion radius around the window in nucleotides. Negative values are clamped to 0.
    pub fn set_radius(&mut self, radius: i64) -> &mut Self {
        if radius < 0 {
            log::warn!("Long-range exclusion radius must be non-negative, got {radius}. Using 0");
        }
        self.radius = radius.max(0);
        self
    }

    pub fn run<'a, Ctg: Contig + 'a, V: Float>(
        &self,
        window: &CoordinateWindow<Ctg>,
        events: impl IntoIterator<Item = &'a InteractionEvent<Ctg>>,
    ) -> Vec<V> {
        let mut profile = vec![V::zero(); window.size()];

        for event in events {
            let (first, second) = (&event.first, &event.second);
            let (offset, partner) = match (
                window.offset(&first.contig, first.pos),
                window.offset(&second.contig, second.pos),
            ) {
                (Some(offset), None) => (offset, second),
                (None, Some(offset)) => (offset, first),
                // Intra-window or unrelated events
                _ => continue,
            };

            if window.is_near(&partner.contig, partner.pos, self.radius) {
                continue;
            }
            profile[offset] = profile[offset] + V::one();
        }

        profile
    }
}
