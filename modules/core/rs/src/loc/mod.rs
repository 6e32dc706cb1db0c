pub use interval::{Contig, GenomicInterval, Located};
pub use strand::Strand;
pub use window::CoordinateWindow;

mod interval;
mod strand;
mod window;
