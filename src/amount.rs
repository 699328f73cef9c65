use core::fmt::{Debug, Display};
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use num_traits::{CheckedAdd, CheckedSub, Zero};

/// A capacity or flow amount.
///
/// Amounts are signed so that cancelling flow on a reverse edge can be written as a negative
/// delta. Capacities, flows and excesses held by the solvers are never negative.
pub trait Amount:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Ord
    + AddAssign
    + SubAssign
    + CheckedAdd
    + CheckedSub
    + Zero
    + Debug
    + Display
    + Default
{
    /// Sums `amounts`, or `None` on overflow.
    fn checked_sum<I: IntoIterator<Item = Self>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::zero(), |acc, a| acc.checked_add(&a))
    }
}

impl Amount for i32 {}

impl Amount for i64 {}
