pub use long_range::ProfileExtractor;
pub use smoothing::MovingAverage;

mod long_range;
mod smoothing;
