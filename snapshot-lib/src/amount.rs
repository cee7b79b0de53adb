//! Raw smallest-unit quantities.
//!
//! Every vote or token quantity is an arbitrary precision integer: totals
//! for 18-decimals tokens routinely exceed what a `u64` (let alone an
//! `f64`) can hold exactly. Amounts are kept signed at the snapshot level
//! so that a corrupted upstream value can be detected and reported instead
//! of being silently clamped.

use crate::Error;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;

pub type RawAmount = BigInt;
pub type VoteAmount = BigUint;

/// Checks that a quantity coming from the data layer is not negative.
pub fn non_negative(field: &'static str, value: &RawAmount) -> Result<VoteAmount, Error> {
    match value.sign() {
        Sign::Minus => Err(Error::NegativeQuantity {
            field,
            value: value.to_string(),
        }),
        _ => Ok(value.magnitude().clone()),
    }
}

pub fn parse_raw_amount(s: &str) -> Result<RawAmount, Error> {
    s.trim().parse::<BigInt>().map_err(|e| Error::InvalidAmount {
        value: s.to_string(),
        reason: e.to_string(),
    })
}

pub fn unit(decimals: u32) -> VoteAmount {
    BigUint::from(10u8).pow(decimals)
}

/// Converts a smallest-unit amount into whole token units, rounding toward zero.
pub fn whole_units(raw: &VoteAmount, decimals: u32) -> VoteAmount {
    if decimals == 0 {
        return raw.clone();
    }
    raw / unit(decimals)
}

pub fn is_positive(value: &VoteAmount) -> bool {
    !value.is_zero()
}

pub(crate) mod deser {
    use super::RawAmount;
    use serde::de::{self, Deserializer, Visitor};
    use std::fmt;

    struct RawAmountVisitor;

    impl<'de> Visitor<'de> for RawAmountVisitor {
        type Value = RawAmount;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a decimal string holding an integer")
        }

        // subgraph BigInt values are transported as strings
        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            super::parse_raw_amount(v).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.into())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.into())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
            Ok(v.into())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
            Ok(v.into())
        }
    }

    pub fn raw_amount<'de, D>(deserializer: D) -> Result<RawAmount, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawAmountVisitor)
    }

    pub fn optional_raw_amount<'de, D>(deserializer: D) -> Result<Option<RawAmount>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptionalVisitor;

        impl<'de> Visitor<'de> for OptionalVisitor {
            type Value = Option<RawAmount>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an optional raw amount")
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                raw_amount(deserializer).map(Some)
            }
        }

        deserializer.deserialize_option(OptionalVisitor)
    }

    pub fn serialize_raw_amount<S>(value: &RawAmount, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn serialize_optional_raw_amount<S>(
        value: &Option<RawAmount>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match value {
            Some(value) => serializer.serialize_some(&value.to_string()),
            None => serializer.serialize_none(),
        }
    }
}
