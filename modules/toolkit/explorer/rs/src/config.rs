#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};
#[cfg(feature = "bitcode")]
use eyre::{Result, WrapErr};

use ligamap_contacts_rs::{ContactMatrixBuilder, IterativeBiasNormalizer};
use ligamap_profile_rs::{MovingAverage, PeakDetector, ProfileExtractor, Prominence};
use ligamap_scatter_rs::{SymLog, WindowedPeakCollapser};

/// How raw contact counts are turned into the displayed matrix.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Normalization {
    Raw,
    #[default]
    Ice,
}

/// All parameters of a single query, passed explicitly with every call.
///
/// Setters store values as is, [`QueryConfig::sanitized`] clamps them to valid ranges. The
/// explorer always works with a sanitized copy.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct QueryConfig {
    flank: i64,
    bin_size: usize,
    normalization: Normalization,
    ice_max_iterations: usize,
    ice_tolerance: f64,
    long_range_radius: i64,
    smoothing_window: usize,
    peak_spacing: usize,
    prominence_factor: f64,
    collapse_radius: i64,
    symlog_threshold: f64,
    symlog_base: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            flank: 200,
            bin_size: ContactMatrixBuilder::DEFAULT_BIN_SIZE,
            normalization: Normalization::default(),
            ice_max_iterations: IterativeBiasNormalizer::DEFAULT_MAX_ITERATIONS,
            ice_tolerance: IterativeBiasNormalizer::DEFAULT_TOLERANCE,
            long_range_radius: ProfileExtractor::DEFAULT_RADIUS,
            smoothing_window: MovingAverage::DEFAULT_WINDOW,
            peak_spacing: 50,
            prominence_factor: 1.0,
            collapse_radius: WindowedPeakCollapser::DEFAULT_RADIUS,
            symlog_threshold: 1.0,
            symlog_base: 10.0,
        }
    }
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_flank(&mut self, flank: i64) -> &mut Self {
        self.flank = flank;
        self
    }

    pub fn set_bin_size(&mut self, bin_size: usize) -> &mut Self {
        self.bin_size = bin_size;
        self
    }

    pub fn set_normalization(&mut self, normalization: Normalization) -> &mut Self {
        self.normalization = normalization;
        self
    }

    pub fn set_ice_max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.ice_max_iterations = max_iterations;
        self
    }

    pub fn set_ice_tolerance(&mut self, tolerance: f64) -> &mut Self {
        self.ice_tolerance = tolerance;
        self
    }

    pub fn set_long_range_radius(&mut self, radius: i64) -> &mut Self {
        self.long_range_radius = radius;
        self
    }

    pub fn set_smoothing_window(&mut self, window: usize) -> &mut Self {
        self.smoothing_window = window;
        self
    }

    pub fn set_peak_spacing(&mut self, spacing: usize) -> &mut Self {
        self.peak_spacing = spacing;
        self
    }

    pub fn set_prominence_factor(&mut self, factor: f64) -> &mut Self {
        self.prominence_factor = factor;
        self
    }

    pub fn set_collapse_radius(&mut self, radius: i64) -> &mut Self {
        self.collapse_radius = radius;
        self
    }

    pub fn set_symlog(&mut self, threshold: f64, base: f64) -> &mut Self {
        self.symlog_threshold = threshold;
        self.symlog_base = base;
        self
    }

    /// Copy of the config with every parameter clamped to its valid range.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut result = self.clone();

        if result.flank < 0 {
            log::warn!("Negative flank ({}) clamped to 0", result.flank);
            result.flank = 0;
        }
        if result.bin_size == 0 {
            log::warn!("Bin size must be at least 1 nt, got 0. Using 1 instead");
            result.bin_size = 1;
        }
        if result.ice_max_iterations == 0 {
            log::warn!("ICE requires at least one iteration, got 0. Using 1 instead");
            result.ice_max_iterations = 1;
        }
        if !(result.ice_tolerance.is_finite() && result.ice_tolerance > 0.0) {
            log::warn!(
                "ICE tolerance must be a positive number, got {}. Using {} instead",
                result.ice_tolerance,
                defaults.ice_tolerance
            );
            result.ice_tolerance = defaults.ice_tolerance;
        }
        if result.long_range_radius < 0 {
            log::warn!(
                "Long-range radius must be non-negative, got {}. Using 0",
                result.long_range_radius
            );
            result.long_range_radius = 0;
        }
        if result.smoothing_window % 2 == 0 {
            let window = result.smoothing_window + 1;
            log::warn!(
                "Smoothing window must be odd, got {}. Using {window} instead",
                result.smoothing_window
            );
            result.smoothing_window = window;
        }
        if result.peak_spacing == 0 {
            log::warn!("Minimum peak spacing must be at least 1, got 0. Using 1");
            result.peak_spacing = 1;
        }
        if !(result.prominence_factor.is_finite() && result.prominence_factor >= 0.0) {
            log::warn!(
                "Peak prominence factor must be a non-negative number, got {}. Using 0",
                result.prominence_factor
            );
            result.prominence_factor = 0.0;
        }
        if result.collapse_radius < 0 {
            log::warn!(
                "Cluster radius must be non-negative, got {}. Using 0",
                result.collapse_radius
            );
            result.collapse_radius = 0;
        }
        if !(result.symlog_threshold.is_finite() && result.symlog_threshold > 0.0) {
            log::warn!(
                "Symlog linear threshold must be a positive number, got {}. Using {} instead",
                result.symlog_threshold,
                defaults.symlog_threshold
            );
            result.symlog_threshold = defaults.symlog_threshold;
        }
        if !(result.symlog_base.is_finite() && result.symlog_base > 1.0) {
            log::warn!(
                "Symlog base must be a finite number > 1, got {}. Using {} instead",
                result.symlog_base,
                defaults.symlog_base
            );
            result.symlog_base = defaults.symlog_base;
        }
        result
    }

    pub fn builder(&self) -> ContactMatrixBuilder {
        ContactMatrixBuilder::new(self.bin_size)
    }

    /// ICE normalizer, None for raw counts.
    pub fn normalizer(&self) -> Option<IterativeBiasNormalizer> {
        match self.normalization {
            Normalization::Raw => None,
            Normalization::Ice => {
                let mut normalizer = IterativeBiasNormalizer::new();
                normalizer
                    .set_max_iterations(self.ice_max_iterations)
                    .set_tolerance(self.ice_tolerance);
                Some(normalizer)
            }
        }
    }

    pub fn extractor(&self) -> ProfileExtractor {
        let mut extractor = ProfileExtractor::new();
        extractor.set_radius(self.long_range_radius);
        extractor
    }

    pub fn smoother(&self) -> MovingAverage {
        MovingAverage::new(self.smoothing_window)
    }

    /// Peak caller with prominence expressed in standard deviations of the smoothed profile.
    pub fn detector(&self) -> PeakDetector {
        let mut detector = PeakDetector::new();
        detector
            .set_min_distance(self.peak_spacing)
            .set_prominence(Prominence::Sigmas(self.prominence_factor));
        detector
    }

    pub fn collapser(&self) -> WindowedPeakCollapser {
        WindowedPeakCollapser::new(self.collapse_radius)
    }

    pub fn symlog(&self) -> SymLog {
        SymLog::new(self.symlog_threshold, self.symlog_base).unwrap_or_else(|err| {
            log::warn!("{err}. Using the default symlog scale");
            SymLog::default()
        })
    }

    /// Compact binary snapshot of the config, e.g. to restore the last used settings.
    #[cfg(feature = "bitcode")]
    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Restore a snapshot created by [`QueryConfig::to_bytes`]. The result is sanitized.
    #[cfg(feature = "bitcode")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let config: Self = bitcode::decode(bytes).wrap_err("Malformed query config snapshot")?;
        Ok(config.sanitized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = QueryConfig::default();
        assert_eq!(config.sanitized(), config);
        assert_eq!(config.normalization(), &Normalization::Ice);
        assert!(config.normalizer().is_some());
    }

    #[test]
    fn test_degenerate_values_clamped() {
        let mut config = QueryConfig::new();
        config
            .set_flank(-10)
            .set_bin_size(0)
            .set_ice_max_iterations(0)
            .set_ice_tolerance(0.0)
            .set_long_range_radius(-1)
            .set_smoothing_window(0)
            .set_peak_spacing(0)
            .set_prominence_factor(f64::NAN)
            .set_collapse_radius(-5)
            .set_symlog(-1.0, 0.5);

        let config = config.sanitized();
        assert_eq!(*config.flank(), 0);
        assert_eq!(*config.bin_size(), 1);
        assert_eq!(*config.ice_max_iterations(), 1);
        assert_eq!(
            *config.ice_tolerance(),
            IterativeBiasNormalizer::DEFAULT_TOLERANCE
        );
        assert_eq!(*config.long_range_radius(), 0);
        assert_eq!(*config.smoothing_window(), 1);
        assert_eq!(*config.peak_spacing(), 1);
        assert_eq!(*config.prominence_factor(), 0.0);
        assert_eq!(*config.collapse_radius(), 0);
        assert_eq!(*config.symlog_threshold(), 1.0);
        assert_eq!(*config.symlog_base(), 10.0);

        // Sanitizing is idempotent
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn test_even_smoothing_window() {
        let mut config = QueryConfig::new();
        config.set_smoothing_window(20);
        assert_eq!(*config.sanitized().smoothing_window(), 21);
        assert_eq!(*config.sanitized().smoother().window(), 21);
    }

    #[test]
    fn test_components() {
        let mut config = QueryConfig::new();
        config
            .set_bin_size(25)
            .set_normalization(Normalization::Raw)
            .set_peak_spacing(7)
            .set_prominence_factor(2.0)
            .set_collapse_radius(300)
            .set_symlog(2.0, 2.0);

        assert_eq!(*config.builder().bin_size(), 25);
        assert!(config.normalizer().is_none());
        assert_eq!(*config.detector().min_distance(), 7);
        assert_eq!(*config.detector().prominence(), Prominence::Sigmas(2.0));
        assert_eq!(*config.collapser().radius(), 300);
        assert_eq!(config.symlog(), SymLog::new(2.0, 2.0).unwrap());
    }

    #[cfg(feature = "bitcode")]
    #[test]
    fn test_snapshot() -> Result<()> {
        let mut config = QueryConfig::new();
        config.set_flank(350).set_normalization(Normalization::Raw);
        let restored = QueryConfig::from_bytes(&config.to_bytes())?;
        assert_eq!(restored, config);

        // Snapshots are re-sanitized
        config.set_bin_size(0);
        let restored = QueryConfig::from_bytes(&config.to_bytes())?;
        assert_eq!(*restored.bin_size(), 1);

        assert!(QueryConfig::from_bytes(&[1, 2, 3]).is_err());
        Ok(())
    }
}
