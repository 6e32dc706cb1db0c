pub use config::{Normalization, QueryConfig};
pub use explorer::Explorer;
pub use outputs::{ContactMap, ContigTrack, Partner, PartnerScatter, ProfileTrack};

mod config;
mod explorer;
mod outputs;
