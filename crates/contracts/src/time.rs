//! Stamp - time model shared by drivers and followers
//!
//! A stamp is any totally ordered scalar that can be shifted back by an
//! offset. Followers only ever subtract a configured delay from a stamp and
//! compare the result against buffered stamps.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Sub;
use std::time::{Duration, Instant};

/// Ordered timestamp with an associated offset type.
pub trait Stamp: Copy + Ord + fmt::Debug {
    /// Type of a difference between two stamps (the delay type).
    type Offset: Copy + fmt::Debug;

    /// Computes `self - offset`.
    ///
    /// Returns `None` when the result falls below the representable range of
    /// the stamp type. No stamp can precede such a boundary.
    ///
    /// Offsets are delays and are expected to be non-negative. For signed
    /// integer stamps a negative offset that overflows upward saturates at
    /// the type's `MAX`, so every smaller stamp precedes the boundary.
    fn checked_sub_offset(self, offset: Self::Offset) -> Option<Self>;
}

macro_rules! impl_unsigned_stamp {
    ($($t:ty),* $(,)?) => {
        $(
            impl Stamp for $t {
                type Offset = $t;

                #[inline]
                fn checked_sub_offset(self, offset: $t) -> Option<Self> {
                    self.checked_sub(offset)
                }
            }
        )*
    };
}

macro_rules! impl_signed_stamp {
    ($($t:ty),* $(,)?) => {
        $(
            impl Stamp for $t {
                type Offset = $t;

                #[inline]
                fn checked_sub_offset(self, offset: $t) -> Option<Self> {
                    match self.checked_sub(offset) {
                        Some(stamp) => Some(stamp),
                        None if offset < 0 => Some(<$t>::MAX),
                        None => None,
                    }
                }
            }
        )*
    };
}

impl_unsigned_stamp!(u32, u64, usize);
impl_signed_stamp!(i32, i64);

impl Stamp for Duration {
    type Offset = Duration;

    #[inline]
    fn checked_sub_offset(self, offset: Duration) -> Option<Self> {
        self.checked_sub(offset)
    }
}

impl Stamp for Instant {
    type Offset = Duration;

    #[inline]
    fn checked_sub_offset(self, offset: Duration) -> Option<Self> {
        self.checked_sub(offset)
    }
}

/// Simulation timestamp (seconds, f64)
///
/// Totally ordered through [`f64::total_cmp`], so it can key ordered
/// queues. Note that `-0.0` sorts before `0.0` under this order.
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(pub f64);

impl SimTime {
    /// Create a stamp from seconds
    #[inline]
    pub const fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Seconds since simulation start
    #[inline]
    pub const fn as_secs(self) -> f64 {
        self.0
    }
}

impl PartialEq for SimTime {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Sub<f64> for SimTime {
    type Output = SimTime;

    #[inline]
    fn sub(self, rhs: f64) -> SimTime {
        SimTime(self.0 - rhs)
    }
}

impl Stamp for SimTime {
    type Offset = f64;

    #[inline]
    fn checked_sub_offset(self, offset: f64) -> Option<Self> {
        Some(self - offset)
    }
}

impl From<f64> for SimTime {
    #[inline]
    fn from(secs: f64) -> Self {
        Self(secs)
    }
}

impl fmt::Debug for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimTime({})", self.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}s", self.0)
    }
}
