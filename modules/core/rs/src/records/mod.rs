pub use edge::WeightedEdge;
pub use event::{Anchor, InteractionEvent};
pub use feature::{name_key, AnnotatedFeature};

mod edge;
mod event;
mod feature;
