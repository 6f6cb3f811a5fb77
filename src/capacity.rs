use core::fmt;
use core::marker::PhantomData;
use core::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, Unexpected, Visitor};
use serde::{Serialize, Serializer};

use crate::error::Error;
use crate::int::Int;

/// Spellings accepted for an unbounded capacity.
const UNBOUNDED: [&str; 4] = ["inf", "infinity", "unbounded", "∞"];

/// The capacity of an edge.
///
/// `Unbounded` compares greater than every finite value, so it never wins a bottleneck against a
/// finite edge. It is what the super-source and super-sink links are made of.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capacity<T> {
    Finite(T),
    Unbounded,
}

impl<T: Int> Capacity<T> {
    pub fn finite(&self) -> Option<T> {
        match self {
            Self::Finite(c) => Some(*c),
            Self::Unbounded => None,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Self::Finite(c) => *c > T::zero(),
            Self::Unbounded => true,
        }
    }

    /// Capacity left once `flow` units are carried. A negative `flow` (flow cancelled on the
    /// paired edge) raises the residual, which saturates at the largest value of `T`.
    pub fn residual(self, flow: T) -> Self {
        match self {
            Self::Finite(c) => Self::Finite(c.saturating_sub(&flow)),
            Self::Unbounded => Self::Unbounded,
        }
    }

    /// Sum of two capacities, `None` on overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => a.checked_add(&b).map(Self::Finite),
            _ => Some(Self::Unbounded),
        }
    }
}

impl<T> From<T> for Capacity<T>
where
    T: Int,
{
    fn from(c: T) -> Self {
        Self::Finite(c)
    }
}

impl<T: fmt::Display> fmt::Display for Capacity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(c) => c.fmt(f),
            Self::Unbounded => f.pad("inf"),
        }
    }
}

impl<T: Int> FromStr for Capacity<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if UNBOUNDED.iter().any(|u| s.eq_ignore_ascii_case(u)) {
            Ok(Self::Unbounded)
        } else {
            s.parse()
                .map(Self::Finite)
                .map_err(|_| Error::InvalidCapacity(s.into()))
        }
    }
}

impl<T: Serialize> Serialize for Capacity<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(c) => c.serialize(serializer),
            Self::Unbounded => serializer.serialize_str(UNBOUNDED[0]),
        }
    }
}

struct CapacityVisitor<T>(PhantomData<T>);

impl<'de, T: Int> Visitor<'de> for CapacityVisitor<T> {
    type Value = Capacity<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer capacity or `inf`")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        T::from_i64(v)
            .map(Capacity::Finite)
            .ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        T::from_u64(v)
            .map(Capacity::Finite)
            .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    // self-describing formats (csv included) hand `inf` over as a float
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_infinite() && v.is_sign_positive() {
            return Ok(Capacity::Unbounded);
        }
        T::from_f64(v)
            .filter(|c| c.to_f64() == Some(v))
            .map(Capacity::Finite)
            .ok_or_else(|| E::invalid_value(Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de, T: Int> Deserialize<'de> for Capacity<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CapacityVisitor(PhantomData))
    }
}
