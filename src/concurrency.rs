//! The bound a [`Limiter`] enforces.
//!
//! A bound is either a positive integer or [`Concurrency::Unbounded`].
//! Anything else is rejected with [`InvalidConcurrency`] before a limiter can
//! be built, whether it arrives as a number, as text or through a
//! configuration file:
//!
//! ```
//! use std::convert::TryFrom;
//! use tower_fifo_limit::Concurrency;
//!
//! assert_eq!(Concurrency::try_from(4.0).unwrap().get(), Some(4));
//! assert_eq!("unbounded".parse::<Concurrency>().unwrap(), Concurrency::Unbounded);
//! assert!(Concurrency::try_from(1.2).is_err());
//! assert!("zero".parse::<Concurrency>().is_err());
//! ```
//!
//! [`Limiter`]: crate::Limiter

use crate::error::InvalidConcurrency;
use serde::{
    de::{self, Deserialize, Deserializer, Visitor},
    Serialize, Serializer,
};
use std::{convert::TryFrom, fmt, num::NonZeroUsize, str::FromStr};

/// Maximum number of work items a [`Limiter`](crate::Limiter) runs at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Concurrency {
    /// At most this many items are active at a time.
    Bounded(NonZeroUsize),
    /// Every queued item is admitted on the next dispatch.
    Unbounded,
}

impl Concurrency {
    /// Create a bound of `max` concurrent items. Fails if `max` is zero.
    pub fn new(max: usize) -> Result<Self, InvalidConcurrency> {
        NonZeroUsize::new(max)
            .map(Concurrency::Bounded)
            .ok_or_else(|| InvalidConcurrency::new(max))
    }

    /// A bound that never holds work back.
    pub const fn unbounded() -> Self {
        Concurrency::Unbounded
    }

    /// The numeric bound, or `None` when unbounded.
    pub fn get(&self) -> Option<usize> {
        match self {
            Concurrency::Bounded(max) => Some(max.get()),
            Concurrency::Unbounded => None,
        }
    }

    /// Returns `true` if one more item may start while `active` are running.
    pub(crate) fn admits(&self, active: usize) -> bool {
        match self {
            Concurrency::Bounded(max) => active < max.get(),
            Concurrency::Unbounded => true,
        }
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concurrency::Bounded(max) => fmt::Display::fmt(max, f),
            Concurrency::Unbounded => f.pad("unbounded"),
        }
    }
}

impl From<NonZeroUsize> for Concurrency {
    fn from(max: NonZeroUsize) -> Self {
        Concurrency::Bounded(max)
    }
}

impl TryFrom<usize> for Concurrency {
    type Error = InvalidConcurrency;

    fn try_from(max: usize) -> Result<Self, Self::Error> {
        Concurrency::new(max)
    }
}

impl TryFrom<i64> for Concurrency {
    type Error = InvalidConcurrency;

    fn try_from(max: i64) -> Result<Self, Self::Error> {
        usize::try_from(max)
            .map_err(|_| InvalidConcurrency::new(max))
            .and_then(Concurrency::new)
    }
}

impl TryFrom<f64> for Concurrency {
    type Error = InvalidConcurrency;

    /// `f64::INFINITY` maps to [`Concurrency::Unbounded`]; any other value
    /// must be a whole number of at least one.
    fn try_from(max: f64) -> Result<Self, Self::Error> {
        if max == f64::INFINITY {
            return Ok(Concurrency::Unbounded);
        }

        if !max.is_finite() || max.fract() != 0.0 || max < 1.0 || max > usize::MAX as f64 {
            return Err(InvalidConcurrency::new(max));
        }

        Concurrency::new(max as usize)
    }
}

impl FromStr for Concurrency {
    type Err = InvalidConcurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if ["unbounded", "infinity", "inf"]
            .iter()
            .any(|name| trimmed.eq_ignore_ascii_case(name))
        {
            return Ok(Concurrency::Unbounded);
        }

        match trimmed.parse::<usize>() {
            Ok(max) => Concurrency::new(max),
            Err(_) => Err(InvalidConcurrency::new(format_args!("{:?}", s))),
        }
    }
}

impl Serialize for Concurrency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Concurrency::Bounded(max) => serializer.serialize_u64(max.get() as u64),
            Concurrency::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

impl<'de> Deserialize<'de> for Concurrency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ConcurrencyVisitor)
    }
}

struct ConcurrencyVisitor;

impl<'de> Visitor<'de> for ConcurrencyVisitor {
    type Value = Concurrency;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a positive integer or \"unbounded\"")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Err(E::custom(InvalidConcurrency::new(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Concurrency::try_from(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        usize::try_from(v)
            .map_err(|_| InvalidConcurrency::new(v))
            .and_then(Concurrency::new)
            .map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Concurrency::try_from(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(E::custom(InvalidConcurrency::new("null")))
    }
}
