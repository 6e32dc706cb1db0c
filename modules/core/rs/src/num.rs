use std::fmt::Debug;

/// T values are float numbers
pub trait Float: ::num::Float + Debug + Default {}

impl<T: ::num::Float + Debug + Default> Float for T {}
