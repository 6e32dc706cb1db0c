pub use catalog::FeatureCatalog;

pub mod catalog;
pub mod loc;
pub mod num;
pub mod records;
