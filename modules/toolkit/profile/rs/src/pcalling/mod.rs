pub use local_maxima::{stddev, PeakDetector, Prominence};
pub use peak::Peak;

mod local_maxima;
mod peak;
