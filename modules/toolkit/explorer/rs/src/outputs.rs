use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

use ligamap_contacts_rs::{BinningSummary, ContactMatrix};
use ligamap_core_rs::loc::{Contig, CoordinateWindow};
use ligamap_profile_rs::Peak;
use ligamap_scatter_rs::{Candidate, SymLog};

/// Binned contacts around a feature: raw counts, the matrix for display (normalized or raw
/// counts cast to floats) and the normalization report.
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct ContactMap<Ctg: Contig> {
    window: CoordinateWindow<Ctg>,
    bin_size: usize,
    counts: ContactMatrix<u64>,
    matrix: ContactMatrix<f64>,
    summary: BinningSummary,
    // None for raw maps
    biases: Option<Vec<f64>>,
    iterations: usize,
    converged: bool,
}

impl<Ctg: Contig> ContactMap<Ctg> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        window: CoordinateWindow<Ctg>,
        bin_size: usize,
        counts: ContactMatrix<u64>,
        matrix: ContactMatrix<f64>,
        summary: BinningSummary,
        biases: Option<Vec<f64>>,
        iterations: usize,
        converged: bool,
    ) -> Self {
        Self {
            window,
            bin_size,
            counts,
            matrix,
            summary,
            biases,
            iterations,
            converged,
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.biases.is_some()
    }
}

/// Long-range interaction profile along a window with called peaks. Indices of both profiles
/// and peaks are 5' -> 3' offsets within the window.
#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct ProfileTrack<Ctg: Contig> {
    window: CoordinateWindow<Ctg>,
    raw: Vec<f64>,
    smoothed: Vec<f64>,
    peaks: Vec<Peak<f64>>,
    prominence: f64,
}

impl<Ctg: Contig> ProfileTrack<Ctg> {
    /// Genomic coordinates of the called peaks, in the order of peaks.
    pub fn peak_coordinates(&self) -> Vec<i64> {
        self.peaks
            .iter()
            .map(|peak| self.window.to_coord(*peak.index() as i64))
            .collect()
    }
}

/// Payload of a scatter point: the partner feature and the edge statistics.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Constructor, Dissolve, Getters)]
pub struct Partner {
    name: String,
    kind: String,
    interaction: String,
    count: u64,
}

/// Collapsed partners located on a single contig, with weights in display coordinates.
#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct ContigTrack<Ctg: Contig> {
    contig: Ctg,
    points: Vec<Candidate<Partner>>,
    display: Vec<f64>,
}

/// Decluttered partner scatter of a feature. Tracks are ordered by contig, the display scale
/// and its reference ticks are shared by all tracks.
#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct PartnerScatter<Ctg: Contig> {
    feature: String,
    tracks: Vec<ContigTrack<Ctg>>,
    scale: SymLog,
    ticks: Vec<(f64, f64)>,
    partners: usize,
    unresolved: usize,
}

impl<Ctg: Contig> PartnerScatter<Ctg> {
    /// Number of representatives left after collapsing.
    pub fn len(&self) -> usize {
        self.tracks.iter().map(|x| x.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
