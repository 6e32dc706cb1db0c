use std::collections::hash_map::Entry;
use std::collections::BTreeMap;

use ahash::{HashMap, HashMapExt};
use eyre::{Result, WrapErr};

use ligamap_core_rs::loc::{Contig, CoordinateWindow, Located};
use ligamap_core_rs::records::{name_key, AnnotatedFeature, InteractionEvent, WeightedEdge};
use ligamap_core_rs::FeatureCatalog;
use ligamap_profile_rs::Prominence;
use ligamap_scatter_rs::Candidate;

use crate::config::{Normalization, QueryConfig};
use crate::outputs::{ContactMap, ContigTrack, Partner, PartnerScatter, ProfileTrack};

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct MapKey {
    feature: String,
    flank: i64,
    bin_size: usize,
    normalization: Normalization,
    max_iterations: usize,
    tolerance: u64,
}

impl MapKey {
    fn new(feature: &str, config: &QueryConfig) -> Self {
        // Raw maps don't depend on ICE parameters
        let (max_iterations, tolerance) = match config.normalization() {
            Normalization::Raw => (0, 0),
            Normalization::Ice => (
                *config.ice_max_iterations(),
                config.ice_tolerance().to_bits(),
            ),
        };
        Self {
            feature: name_key(feature),
            flank: *config.flank(),
            bin_size: *config.bin_size(),
            normalization: *config.normalization(),
            max_iterations,
            tolerance,
        }
    }
}

/// Query engine over one dataset: annotation, raw ligation events and aggregated edges.
///
/// Features are looked up by case-insensitive name, unknown names yield `None`. Every query
/// takes an explicit config which is sanitized before use. Contact maps are memoized per
/// (feature, flank, bin size, normalization) since they are the most expensive to compute.
#[derive(Clone, Debug)]
pub struct Explorer<Ctg: Contig> {
    catalog: FeatureCatalog<Ctg>,
    events: Vec<InteractionEvent<Ctg>>,
    edges: Vec<WeightedEdge>,
    maps: HashMap<MapKey, ContactMap<Ctg>>,
}

impl<Ctg: Contig> Explorer<Ctg> {
    pub fn new(
        catalog: FeatureCatalog<Ctg>,
        events: Vec<InteractionEvent<Ctg>>,
        edges: Vec<WeightedEdge>,
    ) -> Self {
        Self {
            catalog,
            events,
            edges,
            maps: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &FeatureCatalog<Ctg> {
        &self.catalog
    }

    pub fn events(&self) -> &[InteractionEvent<Ctg>] {
        &self.events
    }

    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    /// Number of memoized contact maps.
    pub fn cached(&self) -> usize {
        self.maps.len()
    }

    pub fn clear_cache(&mut self) {
        self.maps.clear();
    }

    fn window_of(
        feature: &AnnotatedFeature<Ctg>,
        config: &QueryConfig,
    ) -> Result<CoordinateWindow<Ctg>> {
        CoordinateWindow::around(feature, *config.flank())
            .wrap_err_with(|| format!("Failed to build a window around {}", feature.name()))
    }

    /// Window around the feature for the given config.
    pub fn window(
        &self,
        name: &str,
        config: &QueryConfig,
    ) -> Result<Option<CoordinateWindow<Ctg>>> {
        let config = config.sanitized();
        match self.catalog.get(name) {
            None => Ok(None),
            Some(feature) => Self::window_of(feature, &config).map(Some),
        }
    }

    fn build_map(
        window: CoordinateWindow<Ctg>,
        events: &[InteractionEvent<Ctg>],
        config: &QueryConfig,
    ) -> ContactMap<Ctg> {
        let builder = config.builder();
        let (counts, summary) = builder.build(&window, events);
        log::debug!(
            "Binned {} events into {} bins around {:?}:{}-{} ({} dropped)",
            summary.accepted(),
            counts.size(),
            window.contig(),
            window.start(),
            window.end(),
            summary.dropped()
        );

        let floats = counts.to_float::<f64>();
        let (matrix, biases, iterations, converged) = match config.normalizer() {
            None => (floats, None, 0, true),
            Some(normalizer) => {
                let (matrix, biases, iterations, converged) = normalizer.run(&floats).dissolve();
                (matrix, Some(biases), iterations, converged)
            }
        };
        ContactMap::new(
            window,
            *builder.bin_size(),
            counts,
            matrix,
            summary,
            biases,
            iterations,
            converged,
        )
    }

    /// Contact map around the feature, computed once per distinct set of map parameters.
    pub fn contact_map(
        &mut self,
        name: &str,
        config: &QueryConfig,
    ) -> Result<Option<&ContactMap<Ctg>>> {
        let config = config.sanitized();
        let feature = match self.catalog.get(name) {
            Some(feature) => feature,
            None => return Ok(None),
        };

        let map = match self.maps.entry(MapKey::new(feature.name(), &config)) {
            Entry::Occupied(entry) => {
                log::debug!("Using the cached contact map for {}", feature.name());
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let window = Self::window_of(feature, &config)?;
                entry.insert(Self::build_map(window, &self.events, &config))
            }
        };
        Ok(Some(map))
    }

    /// Smoothed long-range profile along the feature window with called peaks.
    pub fn profile(&self, name: &str, config: &QueryConfig) -> Result<Option<ProfileTrack<Ctg>>> {
        let config = config.sanitized();
        let feature = match self.catalog.get(name) {
            Some(feature) => feature,
            None => return Ok(None),
        };
        let window = Self::window_of(feature, &config)?;

        let raw: Vec<f64> = config.extractor().run(&window, &self.events);
        let smoothed = config.smoother().run(&raw);
        let prominence = Prominence::Sigmas(*config.prominence_factor()).threshold(&smoothed);
        let peaks = config.detector().run(&smoothed);

        Ok(Some(ProfileTrack::new(window, raw, smoothed, peaks, prominence)))
    }

    /// Partners of the feature placed at their midpoints and weighted by the edge weight,
    /// collapsed to one representative per cluster on each contig.
    ///
    /// Partners missing from the annotation can't be placed and are only counted.
    pub fn partner_scatter(&self, name: &str, config: &QueryConfig) -> Option<PartnerScatter<Ctg>> {
        let config = config.sanitized();
        let feature = self.catalog.get(name)?;

        let (mut partners, mut unresolved) = (0, 0);
        let mut bycontig: BTreeMap<Ctg, Vec<Candidate<Partner>>> = BTreeMap::new();
        for edge in &self.edges {
            let partner = match edge.partner_of(feature.name()) {
                Some(partner) => partner,
                None => continue,
            };
            partners += 1;

            let located = match self.catalog.get(partner) {
                Some(located) => located,
                None => {
                    log::debug!(
                        "Partner {partner} of {} is missing from the annotation",
                        feature.name()
                    );
                    unresolved += 1;
                    continue;
                }
            };
            let tag = Partner::new(
                located.name().clone(),
                located.kind().clone(),
                edge.kind().clone(),
                *edge.count(),
            );
            bycontig
                .entry(located.contig().clone())
                .or_default()
                .push(Candidate::new(located.midpoint(), *edge.weight(), tag));
        }

        let collapser = config.collapser();
        let scale = config.symlog();
        let mut maxweight: f64 = 0.0;
        let tracks: Vec<_> = bycontig
            .into_iter()
            .map(|(contig, candidates)| {
                let points = collapser.run(candidates);
                let display = points.iter().map(|x| scale.apply(*x.weight())).collect();
                for point in &points {
                    if point.weight().is_finite() {
                        maxweight = maxweight.max(point.weight().abs());
                    }
                }
                ContigTrack::new(contig, points, display)
            })
            .collect();

        let ticks = scale.ticks(maxweight);
        Some(PartnerScatter::new(
            feature.name().clone(),
            tracks,
            scale,
            ticks,
            partners,
            unresolved,
        ))
    }
}
