#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_more::Constructor;
use eyre::{OptionExt, Result, WrapErr};

use ligamap_core_rs::loc::GenomicInterval;
use ligamap_core_rs::records::{Anchor, AnnotatedFeature, InteractionEvent, WeightedEdge};

use super::parse;

/// Explicit mapping of table columns (0-based) to record fields.
pub trait Schema {
    type Record;

    fn parse(&self, fields: &[&str]) -> Result<Self::Record>;
}

/// Columns of a chimeric pairs table: contig and position of both anchors.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Constructor)]
pub struct EventSchema {
    pub first_contig: usize,
    pub first_pos: usize,
    pub second_contig: usize,
    pub second_pos: usize,
}

impl Default for EventSchema {
    fn default() -> Self {
        Self::new(0, 1, 2, 3)
    }
}

impl Schema for EventSchema {
    type Record = InteractionEvent<String>;

    fn parse(&self, fields: &[&str]) -> Result<Self::Record> {
        let first = Anchor::new(
            parse::text(fields, self.first_contig, "first contig")?,
            parse::coordinate(fields, self.first_pos, "first position")?,
        );
        let second = Anchor::new(
            parse::text(fields, self.second_contig, "second contig")?,
            parse::coordinate(fields, self.second_pos, "second position")?,
        );
        Ok(InteractionEvent::new(first, second))
    }
}

/// Columns of an annotation table. `kind` is optional, features without it are tagged with
/// `default_kind`. With `zero_based` set, starts are converted from 0-based half-open (BED)
/// coordinates to 1-based closed ones.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureSchema {
    pub contig: usize,
    pub start: usize,
    pub end: usize,
    pub name: usize,
    pub strand: usize,
    pub kind: Option<usize>,
    pub default_kind: String,
    pub zero_based: bool,
}

impl Default for FeatureSchema {
    /// BED6 layout
    fn default() -> Self {
        Self {
            contig: 0,
            start: 1,
            end: 2,
            name: 3,
            strand: 5,
            kind: None,
            default_kind: "feature".to_owned(),
            zero_based: true,
        }
    }
}

impl Schema for FeatureSchema {
    type Record = AnnotatedFeature<String>;

    fn parse(&self, fields: &[&str]) -> Result<Self::Record> {
        let contig = parse::text(fields, self.contig, "contig")?;
        let mut start = parse::coordinate(fields, self.start, "start")?;
        let end = parse::coordinate(fields, self.end, "end")?;
        if self.zero_based {
            start = start
                .checked_add(1)
                .ok_or_eyre("Feature start overflows when converted to 1-based")?;
        }
        let strand = parse::strand(fields, self.strand)?;
        let interval = GenomicInterval::new(contig, start, end, strand)
            .wrap_err("Invalid feature coordinates")?;

        let name = parse::text(fields, self.name, "name")?;
        let kind = match self.kind {
            Some(ind) => parse::text(fields, ind, "feature type")?,
            None => self.default_kind.clone(),
        };
        Ok(AnnotatedFeature::new(name, kind, interval))
    }
}

/// Columns of an aggregated feature-to-feature interaction table.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeSchema {
    pub source: usize,
    pub target: usize,
    pub count: usize,
    pub weight: usize,
    pub kind: Option<usize>,
}

impl Default for EdgeSchema {
    fn default() -> Self {
        Self {
            source: 0,
            target: 1,
            count: 2,
            weight: 3,
            kind: None,
        }
    }
}

impl Schema for EdgeSchema {
    type Record = WeightedEdge;

    fn parse(&self, fields: &[&str]) -> Result<Self::Record> {
        let kind = match self.kind {
            Some(ind) => parse::text(fields, ind, "interaction type")?,
            None => String::new(),
        };
        Ok(WeightedEdge::new(
            parse::text(fields, self.source, "source")?,
            parse::text(fields, self.target, "target")?,
            parse::count(fields, self.count, "count")?,
            parse::weight(fields, self.weight, "weight")?,
            kind,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ligamap_core_rs::loc::{Located, Strand};

    #[test]
    fn test_event_schema() {
        let schema = EventSchema::new(1, 2, 4, 3);
        let event = schema
            .parse(&["read1", "chr1", "100", "250", "chr2"])
            .unwrap();
        assert_eq!(event.first, Anchor::new("chr1".to_owned(), 100));
        assert_eq!(event.second, Anchor::new("chr2".to_owned(), 250));

        assert!(schema.parse(&["read1", "chr1", "x", "250", "chr2"]).is_err());
        assert!(schema.parse(&["read1", "chr1", "100"]).is_err());
    }

    #[test]
    fn test_feature_schema_bed() {
        let feature = FeatureSchema::default()
            .parse(&["chr3", "99", "200", "SNORD3A", "0", "-"])
            .unwrap();
        assert_eq!(feature.name(), "SNORD3A");
        assert_eq!(feature.kind(), "feature");
        assert_eq!((feature.start(), feature.end()), (100, 200));
        assert_eq!(feature.strand(), Strand::Reverse);

        // Empty features are rejected
        assert!(FeatureSchema::default()
            .parse(&["chr3", "200", "199", "x", "0", "+"])
            .is_err());
    }

    #[test]
    fn test_feature_schema_start_overflow() {
        let max = i64::MAX.to_string();
        let result = FeatureSchema::default().parse(&["chr1", &max, &max, "x", "0", "+"]);
        assert!(result.is_err());

        // 1-based tables take the coordinate as is
        let schema = FeatureSchema {
            zero_based: false,
            ..Default::default()
        };
        let feature = schema.parse(&["chr1", &max, &max, "x", "0", "+"]).unwrap();
        assert_eq!(feature.start(), i64::MAX);
    }

    #[test]
    fn test_feature_schema_custom() {
        let schema = FeatureSchema {
            contig: 1,
            start: 2,
            end: 3,
            name: 0,
            strand: 4,
            kind: Some(5),
            default_kind: String::new(),
            zero_based: false,
        };
        let feature = schema
            .parse(&["GAPDH", "chr12", "6534512", "6538374", "+", "protein_coding"])
            .unwrap();
        assert_eq!(feature.kind(), "protein_coding");
        assert_eq!(feature.start(), 6534512);
    }

    #[test]
    fn test_edge_schema() {
        let schema = EdgeSchema {
            kind: Some(4),
            ..Default::default()
        };
        let edge = schema.parse(&["U3", "SNORD3A", "12", "3.5", "snoRNA-mRNA"]).unwrap();
        assert_eq!(edge.source(), "U3");
        assert_eq!(*edge.count(), 12);
        assert_eq!(*edge.weight(), 3.5);
        assert_eq!(edge.kind(), "snoRNA-mRNA");

        assert!(schema.parse(&["U3", "SNORD3A", "12", "NaN", "x"]).is_err());
    }
}
