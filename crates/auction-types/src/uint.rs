//! 256-bit unsigned integer used for every id, price and timestamp.
//!
//! Contract amounts routinely exceed 2^53, so values never pass through
//! `f64`. Narrowing to a native width is always explicit and checked.

use crate::error::ParseUintError;
use primitive_types::U256;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint(U256);

impl Uint {
    pub const ZERO: Uint = Uint(U256::zero());

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Uint) -> Option<Uint> {
        self.0.checked_add(other.0).map(Uint)
    }

    /// `None` when the value does not fit.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0 > U256::from(u64::MAX) {
            None
        } else {
            Some(self.0.low_u64())
        }
    }

    /// `None` when the value does not fit. Used for NEAR deposits (yocto).
    pub fn to_u128(&self) -> Option<u128> {
        if self.0 > U256::from(u128::MAX) {
            None
        } else {
            Some(self.0.low_u128())
        }
    }

    /// `None` when the value exceeds `i64::MAX`.
    pub fn to_i64(&self) -> Option<i64> {
        self.to_u64().and_then(|v| i64::try_from(v).ok())
    }
}

impl From<u64> for Uint {
    fn from(value: u64) -> Self {
        Uint(U256::from(value))
    }
}

impl From<u128> for Uint {
    fn from(value: u128) -> Self {
        Uint(U256::from(value))
    }
}

impl From<U256> for Uint {
    fn from(value: U256) -> Self {
        Uint(value)
    }
}

impl fmt::Display for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Accepts decimal digits or a `0x`-prefixed hex string.
impl FromStr for Uint {
    type Err = ParseUintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseUintError::Empty);
        }

        if let Some(hex) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ParseUintError::Invalid(s.to_string()));
            }
            return U256::from_str_radix(hex, 16)
                .map(Uint)
                .map_err(|_| ParseUintError::Overflow(s.to_string()));
        }

        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseUintError::Invalid(s.to_string()));
        }
        U256::from_dec_str(trimmed)
            .map(Uint)
            .map_err(|_| ParseUintError::Overflow(s.to_string()))
    }
}

// Decimal string on the wire, like NEAR's `U128` JSON type.
impl Serialize for Uint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Uint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UintVisitor)
    }
}

struct UintVisitor;

impl<'de> Visitor<'de> for UintVisitor {
    type Value = Uint;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative integer or an integer string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Uint, E> {
        Ok(Uint::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Uint, E> {
        Ok(Uint::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Uint, E> {
        u64::try_from(v)
            .map(Uint::from)
            .map_err(|_| E::custom(format!("negative integer: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Uint, E> {
        v.parse().map_err(E::custom)
    }
}
