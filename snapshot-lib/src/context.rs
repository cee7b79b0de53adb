use crate::address::Address;
use crate::amount::{deser, RawAmount};
use serde::{Deserialize, Deserializer, Serialize};

/// What is known about the connected account at one point in time.
///
/// Every field may be absent: `None` on an amount means "not loaded yet",
/// which callers must never confuse with a zero balance.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserVotingContext {
    #[serde(default, deserialize_with = "optional_address")]
    pub self_address: Option<Address>,
    #[serde(
        default,
        deserialize_with = "deser::optional_raw_amount",
        serialize_with = "deser::serialize_optional_raw_amount"
    )]
    pub token_balance_raw: Option<RawAmount>,
    #[serde(
        default,
        deserialize_with = "deser::optional_raw_amount",
        serialize_with = "deser::serialize_optional_raw_amount"
    )]
    pub available_votes_raw: Option<RawAmount>,
    /// `None` and [`Address::ZERO`] both mean that no delegation was recorded.
    #[serde(default, deserialize_with = "optional_address")]
    pub delegate_target: Option<Address>,
}

impl UserVotingContext {
    pub fn new(self_address: Address) -> Self {
        Self {
            self_address: Some(self_address),
            ..Default::default()
        }
    }

    pub fn with_balance(mut self, balance: impl Into<RawAmount>) -> Self {
        self.token_balance_raw = Some(balance.into());
        self
    }

    pub fn with_available_votes(mut self, votes: impl Into<RawAmount>) -> Self {
        self.available_votes_raw = Some(votes.into());
        self
    }

    pub fn with_delegate(mut self, delegate: Address) -> Self {
        self.delegate_target = Some(delegate);
        self
    }

    /// The delegation target, with the zero sentinel folded into `None`.
    pub fn recorded_delegate(&self) -> Option<&Address> {
        self.delegate_target
            .as_ref()
            .filter(|target| !target.is_zero())
    }
}

// empty strings are how some wallets report a missing delegatee
fn optional_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(D::Error::custom),
    }
}
