// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Amounts in the smallest currency unit (micro-STX).

use core::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::parse_positive;
use crate::error::{TipError, TipResult};

/// A credited tip amount. Always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MicroStx(pub u128);

impl MicroStx {
    pub fn parse(raw: &str) -> TipResult<Self> {
        parse_positive(raw)
            .map(Self)
            .ok_or_else(|| TipError::invalid("invalid amountMicroStx"))
    }

    pub fn get(self) -> u128 {
        self.0
    }
}

impl fmt::Display for MicroStx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for MicroStx {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        decimal::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for MicroStx {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match decimal::deserialize(deserializer)? {
            0 => Err(serde::de::Error::custom("amount must be positive")),
            v => Ok(MicroStx(v)),
        }
    }
}

/// Cumulative tips on a post, as reported by the store's atomic increment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipTotals {
    #[serde(rename = "total_tip_micro_stx", with = "decimal")]
    pub total: u128,
    #[serde(rename = "tip_count")]
    pub count: u64,
}

impl TipTotals {
    /// Totals after one more tip of `amount`. `None` on overflow.
    pub fn credited(self, amount: MicroStx) -> Option<Self> {
        Some(Self {
            total: self.total.checked_add(amount.get())?,
            count: self.count.checked_add(1)?,
        })
    }
}

/// Serde adapter for u128 values carried as decimal strings.
///
/// Serializes as a string (JSON numbers lose precision past 2^53 in most
/// clients) and deserializes from either a string or an integer, since
/// relational backends report numeric columns both ways.
pub mod decimal {
    use core::fmt;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(v as u128)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
            u128::try_from(v).map_err(|_| E::custom("negative amount"))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            super::super::parse_decimal(v)
                .ok_or_else(|| E::custom(format!("invalid decimal string {:?}", v)))
        }
    }
}
