pub mod compression;
pub mod table;
mod traits;

pub use compression::Compression;
pub use traits::ReadRecord;
