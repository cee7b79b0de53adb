use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

pub const ADDRESS_LENGTH: usize = 20;
pub const DEFAULT_SHORTEN_CHARS: usize = 4;

/// An account identifier as handed out by the chain and the indexer.
///
/// The raw bytes are the canonical form, so two addresses that only differ
/// in the letter case of their hex encoding compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Sentinel used on-chain for "no delegation recorded".
    pub const ZERO: Address = Address([0; ADDRESS_LENGTH]);

    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Format-layer validation: `0x` (optional) followed by exactly 40 hex digits.
    pub fn is_valid(s: &str) -> bool {
        s.parse::<Address>().is_ok()
    }

    /// `0x` + lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 mixed case encoding: a hex letter is uppercased when the
    /// matching nibble of the keccak hash of the lowercase hex is >= 8.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());
        let mut encoded = String::with_capacity(2 + lower.len());
        encoded.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if nibble >= 8 {
                encoded.push(c.to_ascii_uppercase());
            } else {
                encoded.push(c);
            }
        }
        encoded
    }

    /// Fixed prefix/suffix truncation of the checksummed form, e.g.
    /// `0x5aAe...eAed` for `chars == 4`.
    pub fn shorten(&self, chars: usize) -> String {
        let checksummed = self.to_checksum();
        let digits = &checksummed[2..];
        let chars = chars.min(digits.len() / 2);
        format!(
            "0x{}...{}",
            &digits[..chars],
            &digits[digits.len() - chars..]
        )
    }

    #[cfg(any(test, feature = "test-api"))]
    pub fn from_index(index: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 8..].copy_from_slice(&index.to_be_bytes());
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != ADDRESS_LENGTH * 2 {
            return Err(Error::InvalidAddress {
                value: s.to_string(),
                reason: format!("expected {} hex digits", ADDRESS_LENGTH * 2),
            });
        }
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| Error::InvalidAddress {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct AddressVisitor;

        impl<'de> Visitor<'de> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 20 byte account address")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                <[u8; ADDRESS_LENGTH]>::try_from(v)
                    .map(Address)
                    .map_err(|_| E::invalid_length(v.len(), &self))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(AddressVisitor)
        } else {
            deserializer.deserialize_bytes(AddressVisitor)
        }
    }
}

#[cfg(any(test, feature = "proptest"))]
mod arbitrary {
    use super::*;
    use proptest::prelude::*;

    impl Arbitrary for Address {
        type Parameters = ();
        type Strategy = BoxedStrategy<Address>;

        fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
            any::<[u8; ADDRESS_LENGTH]>().prop_map(Address).boxed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_tokens, Configure, Token};
    use test_strategy::proptest;

    const MIXED: &str = "0xAbCdEf0123456789aBcDeF0123456789ABCDEF01";

    #[test]
    fn parse_is_case_insensitive() {
        let lower: Address = MIXED.to_lowercase().parse().unwrap();
        let upper: Address = MIXED.to_uppercase().replace("0X", "0x").parse().unwrap();
        let mixed: Address = MIXED.parse().unwrap();
        assert_eq!(lower, mixed);
        assert_eq!(upper, mixed);
        assert_eq!(mixed.to_string(), MIXED.to_lowercase());
    }

    #[test]
    fn prefix_is_optional() {
        let without: Address = MIXED.trim_start_matches("0x").parse().unwrap();
        assert_eq!(without, MIXED.parse().unwrap());
    }

    #[test]
    fn rejects_malformed() {
        assert!(!Address::is_valid("0x1"));
        assert!(!Address::is_valid(""));
        assert!(!Address::is_valid("0xzz23456789abcdef0123456789abcdef01234567"));
        assert!(!Address::is_valid(&format!("{}00", MIXED)));
        assert!(matches!(
            "0xABC".parse::<Address>(),
            Err(Error::InvalidAddress { .. })
        ));
    }

    #[test]
    fn shorten_keeps_prefix_and_suffix() {
        let address: Address = MIXED.parse().unwrap();
        assert_eq!(address.shorten(DEFAULT_SHORTEN_CHARS), "0xabCD...EF01");
        assert_eq!(address.shorten(6), "0xabCDeF...CDEF01");
        // never overlaps
        assert_eq!(address.shorten(100).len(), 2 + 20 + 3 + 20);
    }

    #[test]
    fn checksum_matches_eip55() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let address: Address = expected.to_lowercase().parse().unwrap();
            assert_eq!(address.to_checksum(), expected);
        }
        let address: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        assert_eq!(address.shorten(DEFAULT_SHORTEN_CHARS), "0x5aAe...eAed");
    }

    #[test]
    fn zero_sentinel() {
        let zero: Address = "0x0000000000000000000000000000000000000000".parse().unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero, Address::ZERO);
        assert!(!Address::from_index(1).is_zero());
    }

    #[test]
    fn serde_readable() {
        let address: Address = MIXED.parse().unwrap();
        assert_tokens(
            &address.readable(),
            &[Token::Str("0xabcdef0123456789abcdef0123456789abcdef01")],
        );
    }

    #[proptest]
    fn display_parses_back(address: Address) {
        assert_eq!(address.to_string().parse::<Address>().unwrap(), address);
        assert_eq!(
            address.to_string().to_uppercase().parse::<Address>().unwrap(),
            address
        );
    }
}
