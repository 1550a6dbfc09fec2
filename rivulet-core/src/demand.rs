// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Backpressure accounting.
//!
//! A [`Demand`] is the number of further values a subscriber is willing to
//! accept. Demand only ever grows through requests and shrinks through
//! deliveries; all arithmetic saturates and [`Demand::Unlimited`] absorbs any
//! finite addend.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign};

/// How many more values a subscriber will accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Demand {
    /// No upper bound; the producer may deliver freely.
    Unlimited,
    /// At most this many further values.
    Max(usize),
}

impl Demand {
    /// Demand for nothing. Requesting it is a no-op.
    pub const NONE: Demand = Demand::Max(0);

    /// Demand for nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self::NONE
    }

    /// Unbounded demand.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self::Unlimited
    }

    /// Demand for at most `count` values.
    #[must_use]
    pub const fn max(count: usize) -> Self {
        Self::Max(count)
    }

    /// Returns `true` if no value may be delivered.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::Max(0))
    }

    /// Returns `true` if the demand is unbounded.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// Returns `true` if at least one value may be delivered.
    #[must_use]
    pub const fn has_capacity(&self) -> bool {
        !self.is_none()
    }

    /// The finite bound, or `None` when unbounded.
    #[must_use]
    pub const fn as_max(&self) -> Option<usize> {
        match self {
            Self::Unlimited => None,
            Self::Max(count) => Some(*count),
        }
    }

    /// Saturating addition; a finite sum that overflows becomes unbounded.
    #[must_use]
    pub fn saturating_add(self, other: Demand) -> Demand {
        match (self, other) {
            (Self::Max(a), Self::Max(b)) => a.checked_add(b).map_or(Self::Unlimited, Self::Max),
            _ => Self::Unlimited,
        }
    }

    /// Saturating multiplication by a finite factor.
    ///
    /// Used by operators that need several upstream values per emitted value.
    #[must_use]
    pub fn saturating_mul(self, factor: usize) -> Demand {
        match self {
            Self::Unlimited => Self::Unlimited,
            Self::Max(count) => count.checked_mul(factor).map_or(Self::Unlimited, Self::Max),
        }
    }

    /// Records `count` deliveries against this demand.
    ///
    /// Unbounded demand is unaffected; finite demand never drops below zero.
    #[must_use]
    pub fn saturating_sub(self, count: usize) -> Demand {
        match self {
            Self::Unlimited => Self::Unlimited,
            Self::Max(current) => Self::Max(current.saturating_sub(count)),
        }
    }

    /// Consumes one unit of demand if any is available.
    ///
    /// Returns `false`, leaving the demand untouched, when nothing may be delivered.
    pub fn take_one(&mut self) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Max(0) => false,
            Self::Max(count) => {
                *count -= 1;
                true
            }
        }
    }
}

impl Default for Demand {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<usize> for Demand {
    fn from(count: usize) -> Self {
        Self::Max(count)
    }
}

impl Add for Demand {
    type Output = Demand;

    fn add(self, rhs: Demand) -> Demand {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Demand {
    fn add_assign(&mut self, rhs: Demand) {
        *self = self.saturating_add(rhs);
    }
}

impl Ord for Demand {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Unlimited, Self::Unlimited) => Ordering::Equal,
            (Self::Unlimited, Self::Max(_)) => Ordering::Greater,
            (Self::Max(_), Self::Unlimited) => Ordering::Less,
            (Self::Max(a), Self::Max(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Demand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => write!(f, "unlimited"),
            Self::Max(count) => write!(f, "max({count})"),
        }
    }
}
