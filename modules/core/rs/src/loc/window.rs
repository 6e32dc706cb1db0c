use derive_getters::Dissolve;
use eyre::{ensure, OptionExt, Result};

use super::interval::{Contig, Located};
use super::strand::Strand;

/// A feature-centered, strand-aware window [ws, we] with flanks on both sides.
///
/// Offsets inside the window always increase in the 5' -> 3' direction of the feature: on the
/// forward strand the offset of `ws` is 0, on the reverse strand the offset of `we` is 0.
/// Coordinates outside the window have no offset, callers are expected to drop them.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Dissolve)]
pub struct CoordinateWindow<Ctg: Contig> {
    contig: Ctg,
    start: i64,
    end: i64,
    strand: Strand,
}

impl<Ctg: Contig> CoordinateWindow<Ctg> {
    /// Window around [start, end] extended by `flank` nucleotides on each side.
    /// Negative flanks are clamped to zero, and the window never starts before position 1.
    pub fn new(contig: Ctg, start: i64, end: i64, strand: Strand, flank: i64) -> Result<Self> {
        ensure!(
            start <= end,
            "Window core must satisfy start <= end, got [{start}, {end}]"
        );
        let flank = if flank < 0 {
            log::warn!("Negative flank ({flank}) clamped to 0");
            0
        } else {
            flank
        };

        let start = start.saturating_sub(flank).max(1);
        let end = end
            .checked_add(flank)
            .ok_or_eyre(format!("Window end overflows: {end} + {flank}"))?;
        ensure!(
            start <= end,
            "Window [{start}, {end}] doesn't cover any valid (1-based) position"
        );

        Ok(Self {
            contig,
            start,
            end,
            strand,
        })
    }

    /// Window around a feature (or any other located object).
    pub fn around(feature: &impl Located<Contig = Ctg>, flank: i64) -> Result<Self> {
        Self::new(
            feature.contig().clone(),
            feature.start(),
            feature.end(),
            feature.strand(),
            flank,
        )
    }

    /// Number of positions in the window (we - ws + 1).
    pub fn size(&self) -> usize {
        // Non-negative by construction
        (self.end - self.start + 1) as usize
    }

    /// Raw 5' -> 3' offset of the coordinate. Can be negative or exceed the window size for
    /// coordinates outside the window.
    #[inline(always)]
    pub fn to_offset(&self, coord: i64) -> i64 {
        match self.strand {
            Strand::Forward => coord - self.start,
            Strand::Reverse => self.end - coord,
        }
    }

    /// Genomic coordinate at the given 5' -> 3' offset, the inverse of [`Self::to_offset`].
    #[inline(always)]
    pub fn to_coord(&self, offset: i64) -> i64 {
        match self.strand {
            Strand::Forward => self.start + offset,
            Strand::Reverse => self.end - offset,
        }
    }

    /// Offset of the coordinate if it's inside the window, None otherwise.
    #[inline]
    pub fn offset(&self, contig: &Ctg, coord: i64) -> Option<usize> {
        if self.covers(contig, coord) {
            Some(self.to_offset(coord) as usize)
        } else {
            None
        }
    }

    /// Check if the coordinate is within `radius` nucleotides of the window, i.e. inside
    /// [ws - radius, we + radius] on the same contig.
    pub fn is_near(&self, contig: &Ctg, coord: i64, radius: i64) -> bool {
        let radius = radius.max(0);
        &self.contig == contig
            && self.start.saturating_sub(radius) <= coord
            && coord <= self.end.saturating_add(radius)
    }
}

impl<Ctg: Contig> Located for CoordinateWindow<Ctg> {
    type Contig = Ctg;

    fn contig(&self) -> &Ctg {
        &self.contig
    }

    fn start(&self) -> i64 {
        self.start
    }

    fn end(&self) -> i64 {
        self.end
    }

    fn strand(&self) -> Strand {
        self.strand
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loc::GenomicInterval;

    #[test]
    fn test_window_bounds() {
        let feature = GenomicInterval::new("chr1", 1000, 1200, Strand::Forward).unwrap();
        let window = CoordinateWindow::around(&feature, 200).unwrap();
        assert_eq!((window.start(), window.end()), (800, 1400));
        assert_eq!(window.size(), 601);

        // Never extends below position 1
        let window = CoordinateWindow::new("chr1", 50, 60, Strand::Forward, 200).unwrap();
        assert_eq!((window.start(), window.end()), (1, 260));

        // Negative flanks are clamped
        let window = CoordinateWindow::new("chr1", 50, 60, Strand::Forward, -10).unwrap();
        assert_eq!((window.start(), window.end()), (50, 60));

        assert!(CoordinateWindow::new("chr1", 60, 50, Strand::Forward, 0).is_err());
    }

    #[test]
    fn test_window_offsets_follow_strand() {
        let fwd = CoordinateWindow::new("chr1", 100, 200, Strand::Forward, 0).unwrap();
        let rev = CoordinateWindow::new("chr1", 100, 200, Strand::Reverse, 0).unwrap();

        assert_eq!(fwd.offset(&"chr1", 100), Some(0));
        assert_eq!(fwd.offset(&"chr1", 200), Some(100));
        assert_eq!(rev.offset(&"chr1", 100), Some(100));
        assert_eq!(rev.offset(&"chr1", 200), Some(0));

        // 5' -> 3' offsets increase regardless of the strand
        assert!(fwd.to_offset(150) < fwd.to_offset(160));
        assert!(rev.to_offset(160) < rev.to_offset(150));

        for coord in [100, 137, 200] {
            assert_eq!(fwd.to_coord(fwd.to_offset(coord)), coord);
            assert_eq!(rev.to_coord(rev.to_offset(coord)), coord);
        }
    }

    #[test]
    fn test_window_rejects_outside() {
        let window = CoordinateWindow::new("chr1", 100, 200, Strand::Forward, 0).unwrap();
        assert_eq!(window.offset(&"chr1", 99), None);
        assert_eq!(window.offset(&"chr1", 201), None);
        assert_eq!(window.offset(&"chr2", 150), None);
    }

    #[test]
    fn test_window_huge_flank() {
        let window = CoordinateWindow::new("chr1", 1000, 1200, Strand::Forward, i64::MAX);
        assert!(window.is_err());

        let window = CoordinateWindow::new("chr1", 1000, 1200, Strand::Forward, i64::MAX - 1200)
            .unwrap();
        assert_eq!((window.start(), window.end()), (1, i64::MAX));

        let window = CoordinateWindow::new("chr1", i64::MIN, 10, Strand::Forward, 5).unwrap();
        assert_eq!((window.start(), window.end()), (1, 15));
    }

    #[test]
    fn test_window_proximity() {
        let window = CoordinateWindow::new("chr1", 100, 200, Strand::Reverse, 0).unwrap();
        assert!(window.is_near(&"chr1", 50, 50));
        assert!(!window.is_near(&"chr1", 49, 50));
        assert!(window.is_near(&"chr1", 250, 50));
        assert!(!window.is_near(&"chr1", 251, 50));
        assert!(!window.is_near(&"chr2", 150, 50));
    }
}
