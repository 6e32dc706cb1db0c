pub use builder::{BinningSummary, ContactMatrixBuilder};
pub use ice::{IterativeBiasNormalizer, Normalized};
pub use matrix::ContactMatrix;

mod builder;
mod ice;
mod matrix;
