//! Dispatch - timestamped elements buffered by followers

use serde::{Deserialize, Serialize};

use crate::Stamp;

/// Anything that carries a stamp readable without touching its payload.
pub trait Stamped {
    type Stamp: Stamp;

    fn stamp(&self) -> Self::Stamp;
}

/// Stamp type of a [`Stamped`] element
pub type StampOf<D> = <D as Stamped>::Stamp;

/// Offset (delay) type of a [`Stamped`] element
pub type OffsetOf<D> = <StampOf<D> as Stamp>::Offset;

/// Generic stamped value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch<S, V> {
    /// Sequencing stamp
    pub stamp: S,

    /// Opaque payload
    pub value: V,
}

impl<S, V> Dispatch<S, V> {
    #[inline]
    pub fn new(stamp: S, value: V) -> Self {
        Self { stamp, value }
    }

    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }
}

impl<S: Stamp, V> Stamped for Dispatch<S, V> {
    type Stamp = S;

    #[inline]
    fn stamp(&self) -> S {
        self.stamp
    }
}
