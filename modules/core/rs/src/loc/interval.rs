use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

use derive_getters::Dissolve;
use eyre::{ensure, Result};
use impl_tools::autoimpl;

use super::strand::Strand;

/// Contig is an object that refers to an actual assembly contig (chromosome). Depending on the
/// context, can be encoded by a string, a number, etc.
pub trait Contig: Hash + Eq + Ord + Clone + Default + Debug + Send + Sync {}

impl<T: Hash + Eq + Ord + Clone + Default + Debug + Send + Sync> Contig for T {}

/// Closed genomic interval [start, end] on a stranded contig. Coordinates are 1-based, and a
/// single-nucleotide interval has start == end.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Dissolve)]
pub struct GenomicInterval<Ctg: Contig> {
    contig: Ctg,
    start: i64,
    end: i64,
    strand: Strand,
}

/// Trait for types that can be viewed as a stranded genomic interval.
#[autoimpl(for <T: trait + ?Sized> &T, Box<T>, Rc<T>, Arc<T>)]
#[allow(clippy::len_without_is_empty)]
pub trait Located {
    type Contig: Contig;

    /// Contig of the interval-like object.
    fn contig(&self) -> &Self::Contig;

    /// First covered position (inclusive).
    fn start(&self) -> i64;

    /// Last covered position (inclusive).
    fn end(&self) -> i64;

    /// Strand of the interval-like object.
    fn strand(&self) -> Strand;

    /// Number of covered positions.
    fn len(&self) -> i64 {
        self.end() - self.start() + 1
    }

    /// Check if the position on the given contig is covered.
    fn covers(&self, contig: &Self::Contig, pos: i64) -> bool {
        self.contig() == contig && self.start() <= pos && pos <= self.end()
    }

    /// Central position, rounded towards the start.
    fn midpoint(&self) -> i64 {
        self.start() + (self.end() - self.start()) / 2
    }
}

impl<Ctg: Contig> GenomicInterval<Ctg> {
    pub fn new(contig: Ctg, start: i64, end: i64, strand: Strand) -> Result<Self> {
        ensure!(
            start <= end,
            "Invalid genomic interval: start ({start}) > end ({end})"
        );
        Ok(Self {
            contig,
            start,
            end,
            strand,
        })
    }
}

impl<Ctg: Contig> Located for GenomicInterval<Ctg> {
    type Contig = Ctg;

    #[inline(always)]
    fn contig(&self) -> &Ctg {
        &self.contig
    }

    #[inline(always)]
    fn start(&self) -> i64 {
        self.start
    }

    #[inline(always)]
    fn end(&self) -> i64 {
        self.end
    }

    #[inline(always)]
    fn strand(&self) -> Strand {
        self.strand
    }
}

impl<Ctg: Contig + Display> Display for GenomicInterval<Ctg> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}[{}]",
            self.contig, self.start, self.end, self.strand
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_new() {
        assert!(GenomicInterval::new("chr1", 10, 20, Strand::Forward).is_ok());
        assert!(GenomicInterval::new("chr1", 10, 10, Strand::Reverse).is_ok());
        assert!(GenomicInterval::new("chr1", 11, 10, Strand::Forward).is_err());
    }

    #[test]
    fn test_interval_ops() {
        let interval = GenomicInterval::new("chr1", 10, 19, Strand::Forward).unwrap();
        assert_eq!(interval.len(), 10);
        assert_eq!(interval.midpoint(), 14);

        assert!(interval.covers(&"chr1", 10));
        assert!(interval.covers(&"chr1", 19));
        assert!(!interval.covers(&"chr1", 20));
        assert!(!interval.covers(&"chr2", 15));
    }

    #[test]
    fn test_interval_display() {
        let interval = GenomicInterval::new("chrX", 1, 5, Strand::Reverse).unwrap();
        assert_eq!(interval.to_string(), "chrX:1-5[-]");
    }
}
