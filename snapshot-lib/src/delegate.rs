use crate::address::Address;
use crate::amount::{deser, non_negative, RawAmount, VoteAmount};
use crate::Error;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifies a snapshot, usually the block number it was indexed at.
pub type SnapshotId = u64;

/// A single proposal vote cast by a delegate. Only the number of these
/// matters for the delegate list, the remaining fields are kept for
/// completeness.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ProposalVote {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub support: Option<bool>,
}

/// A delegate as delivered by the indexer.
///
/// The identifier is kept as a plain string so that a single malformed
/// entry can be excluded from a view without failing the whole document.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct RawDelegateRecord {
    pub id: String,
    #[serde(
        deserialize_with = "deser::raw_amount",
        serialize_with = "deser::serialize_raw_amount"
    )]
    pub delegated_votes_raw: RawAmount,
    /// Human readable (decimals scaled) value computed upstream.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub delegated_votes: Option<Decimal>,
    #[serde(default)]
    pub votes: Vec<ProposalVote>,
    #[serde(rename = "EOA", default)]
    pub is_externally_owned: bool,
    #[serde(rename = "handle", default)]
    pub display_handle: Option<String>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
}

impl RawDelegateRecord {
    pub fn new(id: impl Into<String>, delegated_votes_raw: impl Into<RawAmount>) -> Self {
        Self {
            id: id.into(),
            delegated_votes_raw: delegated_votes_raw.into(),
            delegated_votes: None,
            votes: Vec::new(),
            is_externally_owned: true,
            display_handle: None,
            image_url: None,
        }
    }

    /// Validates the identifier first, then the vote count.
    pub fn validate(&self) -> Result<DelegateRecord, Error> {
        let id = self.id.parse::<Address>()?;
        let delegated_votes_raw = non_negative("delegatedVotesRaw", &self.delegated_votes_raw)?;
        Ok(DelegateRecord {
            id,
            delegated_votes_raw,
            delegated_votes: self.delegated_votes,
            votes: self.votes.clone(),
            is_externally_owned: self.is_externally_owned,
            display_handle: self
                .display_handle
                .clone()
                .filter(|handle| !handle.trim().is_empty()),
            image_url: self.image_url.clone(),
        })
    }
}

/// A delegate whose identifier and vote count passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct DelegateRecord {
    pub id: Address,
    pub delegated_votes_raw: VoteAmount,
    pub delegated_votes: Option<Decimal>,
    pub votes: Vec<ProposalVote>,
    pub is_externally_owned: bool,
    pub display_handle: Option<String>,
    pub image_url: Option<String>,
}

/// Protocol wide aggregates published alongside the delegate list.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct GlobalData {
    /// Denominator for every vote share in the snapshot.
    #[serde(
        deserialize_with = "deser::raw_amount",
        serialize_with = "deser::serialize_raw_amount"
    )]
    pub delegated_votes_raw: RawAmount,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub delegated_votes: Option<Decimal>,
}

impl GlobalData {
    pub fn new(delegated_votes_raw: impl Into<RawAmount>) -> Self {
        Self {
            delegated_votes_raw: delegated_votes_raw.into(),
            delegated_votes: None,
        }
    }
}

/// Delegates and totals taken at the same point in time.
///
/// Both halves always travel together so that a share is never computed
/// against a total coming from a different refresh.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DelegatesSnapshot {
    #[serde(default)]
    pub id: Option<SnapshotId>,
    /// Ordered by the indexer, usually by vote count descending.
    pub delegates: Vec<RawDelegateRecord>,
    #[serde(default)]
    pub global: Option<GlobalData>,
}

impl DelegatesSnapshot {
    pub fn global_total(&self) -> Option<&RawAmount> {
        self.global.as_ref().map(|global| &global.delegated_votes_raw)
    }
}

// Upstream decimals may not fit into a `Decimal`; they are only used as a
// cross check so an unrepresentable value is dropped instead of failing the
// whole document.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;
    use std::str::FromStr;

    struct LenientDecimalVisitor;

    impl<'de> Visitor<'de> for LenientDecimalVisitor {
        type Value = Option<Decimal>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a decimal number or string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let parsed = Decimal::from_str(v.trim())
                .or_else(|_| Decimal::from_scientific(v.trim()))
                .ok();
            if parsed.is_none() {
                tracing::debug!(value = v, "dropping unrepresentable upstream decimal");
            }
            Ok(parsed)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(v)))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(Decimal::from(v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Decimal::try_from(v).ok())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(LenientDecimalVisitor)
}

#[cfg(any(test, feature = "proptest"))]
mod arbitrary {
    use super::*;
    use proptest::prelude::*;

    impl Arbitrary for RawDelegateRecord {
        type Parameters = ();
        type Strategy = BoxedStrategy<RawDelegateRecord>;

        fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
            (
                any::<Address>(),
                any::<u128>(),
                0..64usize,
                any::<bool>(),
                proptest::option::of("[a-z]{1,12}"),
            )
                .prop_map(|(id, votes_raw, n_votes, eoa, handle)| RawDelegateRecord {
                    id: id.to_string(),
                    delegated_votes_raw: votes_raw.into(),
                    delegated_votes: None,
                    votes: vec![ProposalVote::default(); n_votes],
                    is_externally_owned: eoa,
                    display_handle: handle,
                    image_url: None,
                })
                .boxed()
        }
    }

    impl Arbitrary for DelegatesSnapshot {
        type Parameters = ();
        type Strategy = BoxedStrategy<DelegatesSnapshot>;

        fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
            (
                proptest::collection::vec(any::<RawDelegateRecord>(), 0..32),
                any::<Option<SnapshotId>>(),
            )
                .prop_map(|(delegates, id)| {
                    // the indexer publishes a total covering every delegate
                    let total = delegates
                        .iter()
                        .map(|d| d.delegated_votes_raw.clone())
                        .sum::<RawAmount>();
                    DelegatesSnapshot {
                        id,
                        delegates,
                        global: Some(GlobalData::new(total)),
                    }
                })
                .boxed()
        }
    }
}
