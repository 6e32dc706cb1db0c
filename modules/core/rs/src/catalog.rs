use ahash::{HashMap, HashMapExt};

use crate::loc::Contig;
use crate::records::{name_key, AnnotatedFeature};

/// Annotation lookup by case-insensitive feature name.
///
/// When several records share a name, the first inserted one is kept.
#[derive(Clone, Debug)]
pub struct FeatureCatalog<Ctg: Contig> {
    features: Vec<AnnotatedFeature<Ctg>>,
    index: HashMap<String, usize>,
}

impl<Ctg: Contig> Default for FeatureCatalog<Ctg> {
    fn default() -> Self {
        Self {
            features: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<Ctg: Contig> FeatureCatalog<Ctg> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a feature to the catalog. Returns false if the name was already taken.
    pub fn insert(&mut self, feature: AnnotatedFeature<Ctg>) -> bool {
        let key = name_key(feature.name());
        if self.index.contains_key(&key) {
            log::warn!(
                "Duplicated feature name {:?}, keeping the first record",
                feature.name()
            );
            return false;
        }
        self.index.insert(key, self.features.len());
        self.features.push(feature);
        true
    }

    pub fn get(&self, name: &str) -> Option<&AnnotatedFeature<Ctg>> {
        self.index
            .get(&name_key(name))
            .map(|&ind| &self.features[ind])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&name_key(name))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotatedFeature<Ctg>> {
        self.features.iter()
    }
}

impl<Ctg: Contig> Extend<AnnotatedFeature<Ctg>> for FeatureCatalog<Ctg> {
    fn extend<T: IntoIterator<Item = AnnotatedFeature<Ctg>>>(&mut self, iter: T) {
        for feature in iter {
            self.insert(feature);
        }
    }
}

impl<Ctg: Contig> FromIterator<AnnotatedFeature<Ctg>> for FeatureCatalog<Ctg> {
    fn from_iter<T: IntoIterator<Item = AnnotatedFeature<Ctg>>>(iter: T) -> Self {
        let mut catalog = Self::new();
        catalog.extend(iter);
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loc::{GenomicInterval, Located, Strand};

    fn feature(name: &str, start: i64) -> AnnotatedFeature<String> {
        AnnotatedFeature::new(
            name.to_owned(),
            "gene".to_owned(),
            GenomicInterval::new("chr1".to_owned(), start, start + 100, Strand::Forward).unwrap(),
        )
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let catalog: FeatureCatalog<String> =
            [feature("GAPDH", 100), feature("Malat1", 500)].into_iter().collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("gapdh").map(|x| x.name().as_str()), Some("GAPDH"));
        assert_eq!(catalog.get(" MALAT1 ").map(|x| x.name().as_str()), Some("Malat1"));
        assert!(catalog.get("ACTB").is_none());
    }

    #[test]
    fn test_duplicates_keep_first() {
        let mut catalog = FeatureCatalog::new();
        assert!(catalog.insert(feature("U3", 100)));
        assert!(!catalog.insert(feature("u3", 900)));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("U3").map(|x| x.start()), Some(100));
    }
}
