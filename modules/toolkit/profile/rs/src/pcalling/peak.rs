use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

/// Local maximum of a profile: position within the profile and the signal value at it.
#[derive(Clone, Copy, PartialEq, PartialOrd, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Peak<V> {
    index: usize,
    value: V,
}
