use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

use crate::loc::{Contig, GenomicInterval, Located, Strand};

/// Lookup key of a feature name: surrounding whitespace is ignored and case is folded.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Named annotation record (gene, snoRNA, repeat, etc.) with its genomic location.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Constructor, Dissolve, Getters)]
pub struct AnnotatedFeature<Ctg: Contig> {
    name: String,
    kind: String,
    interval: GenomicInterval<Ctg>,
}

impl<Ctg: Contig> Located for AnnotatedFeature<Ctg> {
    type Contig = Ctg;

    fn contig(&self) -> &Ctg {
        self.interval.contig()
    }

    fn start(&self) -> i64 {
        self.interval.start()
    }

    fn end(&self) -> i64 {
        self.interval.end()
    }

    fn strand(&self) -> Strand {
        self.interval.strand()
    }
}
