use derive_more::Constructor;

use crate::loc::Contig;

/// One side of a ligation event.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Constructor)]
pub struct Anchor<Ctg: Contig> {
    pub contig: Ctg,
    pub pos: i64,
}

/// A single observed ligation event: an unordered pair of genomic coordinates.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Constructor)]
pub struct InteractionEvent<Ctg: Contig> {
    pub first: Anchor<Ctg>,
    pub second: Anchor<Ctg>,
}

impl<Ctg: Contig> InteractionEvent<Ctg> {
    /// Event with both anchors on the same contig.
    pub fn intra(contig: Ctg, first: i64, second: i64) -> Self {
        Self {
            first: Anchor::new(contig.clone(), first),
            second: Anchor::new(contig, second),
        }
    }

    pub fn anchors(&self) -> [&Anchor<Ctg>; 2] {
        [&self.first, &self.second]
    }

    pub fn is_intra(&self) -> bool {
        self.first.contig == self.second.contig
    }
}
