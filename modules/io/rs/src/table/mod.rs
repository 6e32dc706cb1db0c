pub use dialect::Dialect;
pub use reader::{ReadSummary, Reader};
pub use schema::{EdgeSchema, EventSchema, FeatureSchema, Schema};

mod dialect;
pub mod parse;
mod reader;
mod schema;
