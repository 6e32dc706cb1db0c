pub use collapse::{Candidate, WindowedPeakCollapser};
pub use symlog::SymLog;

mod collapse;
mod symlog;
