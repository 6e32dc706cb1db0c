#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};

use ligamap_core_rs::loc::{Contig, CoordinateWindow};
use ligamap_core_rs::records::InteractionEvent;

use crate::matrix::ContactMatrix;

/// Bins ligation events into a symmetric count matrix over a coordinate window.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Eq, Hash, Debug, Dissolve, Getters)]
pub struct ContactMatrixBuilder {
    bin_size: usize,
}

/// Number of events that contributed to the matrix and that were dropped for falling outside
/// of the window.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Dissolve, Getters)]
pub struct BinningSummary {
    accepted: usize,
    dropped: usize,
}

impl Default for ContactMatrixBuilder {
    fn default() -> Self {
        Self {
            bin_size: Self::DEFAULT_BIN_SIZE,
        }
    }
}

impl ContactMatrixBuilder {
    pub const DEFAULT_BIN_SIZE: usize = 10;

    pub fn new(bin_size: usize) -> Self {
        let mut builder = Self::default();
        builder.set_bin_size(bin_size);
        builder
    }

    /// Set the bin size in nucleotides. Zero is clamped to a single nucleotide.
    pub fn set_bin_size(&mut self, bin_size: usize) -> &mut Self {
        if bin_size == 0 {
            log::warn!("Bin size must be at least 1 nt, got 0. Using 1 instead");
        }
        self.bin_size = bin_size.max(1);
        self
    }

    /// Number of bins required to cover the window: ceil(window size / bin size).
    pub fn bins<Ctg: Contig>(&self, window: &CoordinateWindow<Ctg>) -> usize {
        window.size().div_ceil(self.bin_size)
    }

    /// Bin all events with both anchors inside the window. Events with any anchor outside of
    /// the window are dropped as a whole.
    pub fn build<'a, Ctg: Contig + 'a>(
        &self,
        window: &CoordinateWindow<Ctg>,
        events: impl IntoIterator<Item = &'a InteractionEvent<Ctg>>,
    ) -> (ContactMatrix<u64>, BinningSummary) {
        let mut matrix = ContactMatrix::zeros(self.bins(window));
        let mut summary = BinningSummary::default();

        for event in events {
            let offsets = (
                window.offset(&event.first.contig, event.first.pos),
                window.offset(&event.second.contig, event.second.pos),
            );
            let (b1, b2) = match offsets {
                (Some(first), Some(second)) => (first / self.bin_size, second / self.bin_size),
                _ => {
                    summary.dropped += 1;
                    continue;
                }
            };

            matrix.add(b1, b2, 1);
            if b1 != b2 {
                matrix.add(b2, b1, 1);
            }
            summary.accepted += 1;
        }

        (matrix, summary)
    }
}
