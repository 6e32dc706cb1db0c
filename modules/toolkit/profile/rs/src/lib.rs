pub use extract::{MovingAverage, ProfileExtractor};
pub use pcalling::{Peak, PeakDetector, Prominence};

pub mod extract;
pub mod pcalling;
