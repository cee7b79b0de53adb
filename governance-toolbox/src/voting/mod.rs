//! Effective voting weight and delegation state of the connected account.

use crate::utils::to_significant;
use num_traits::Zero;
use snapshot_lib::amount::non_negative;
use snapshot_lib::{Address, ProtocolSettings, RawAmount, UserVotingContext, VoteAmount};
use thiserror::Error;

const HEADLINE_SIGNIFICANT_DIGITS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("voting context holds a negative quantity")]
    NegativeQuantity(#[source] snapshot_lib::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegationState {
    NoWallet,
    /// The balance has not been loaded yet.
    Loading,
    Undelegated,
    SelfDelegated,
    DelegatedToOther(Address),
    NoBalance,
}

impl DelegationState {
    pub fn describe(&self, settings: &ProtocolSettings) -> Option<String> {
        match self {
            Self::DelegatedToOther(target) => Some(format!(
                "Delegated to: {}",
                target.shorten(settings.address_chars)
            )),
            Self::SelfDelegated => Some("Self delegated".to_string()),
            Self::Undelegated => Some("Not delegated".to_string()),
            Self::NoWallet | Self::Loading | Self::NoBalance => None,
        }
    }
}

/// Voting weight as far as it is known; `Unknown` is never the same as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectiveVotes {
    Known(VoteAmount),
    Unknown,
}

impl EffectiveVotes {
    pub fn known(&self) -> Option<&VoteAmount> {
        match self {
            Self::Known(votes) => Some(votes),
            Self::Unknown => None,
        }
    }
}

impl From<Option<VoteAmount>> for EffectiveVotes {
    fn from(votes: Option<VoteAmount>) -> Self {
        votes.map(Self::Known).unwrap_or(Self::Unknown)
    }
}

/// The delegation action the account can take next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegationAction {
    Delegate,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotingStatus {
    pub effective_votes: EffectiveVotes,
    pub state: DelegationState,
    pub action: Option<DelegationAction>,
}

impl VotingStatus {
    fn unknown(state: DelegationState) -> Self {
        Self {
            effective_votes: EffectiveVotes::Unknown,
            state,
            action: None,
        }
    }

    /// `"1.23 votes"`, scaled by the token decimals.
    pub fn headline(&self, settings: &ProtocolSettings) -> Option<String> {
        self.effective_votes.known().map(|votes| {
            format!(
                "{} votes",
                to_significant(votes, settings.token_decimals, HEADLINE_SIGNIFICANT_DIGITS)
            )
        })
    }

    /// True when the account is known to have no votes at all and should be
    /// told to acquire tokens first.
    pub fn needs_tokens_hint(&self) -> bool {
        self.effective_votes.known().map_or(false, Zero::is_zero)
    }
}

/// Whether a balance is known and strictly positive.
pub fn has_tokens(balance: Option<&RawAmount>) -> bool {
    balance.map_or(false, |balance| *balance > RawAmount::zero())
}

/// Whether the account may change an existing delegation.
pub fn can_update_delegation(ctx: &UserVotingContext) -> bool {
    has_tokens(ctx.token_balance_raw.as_ref())
}

fn checked(
    field: &'static str,
    value: Option<&RawAmount>,
) -> Result<Option<VoteAmount>, StatusError> {
    value
        .map(|value| non_negative(field, value))
        .transpose()
        .map_err(|e| {
            tracing::error!(error = %e, "refusing to classify corrupted voting context");
            StatusError::NegativeQuantity(e)
        })
}

/// Classifies the account's delegation and computes the votes it can cast.
///
/// When the account delegated to someone else only the votes delegated
/// to it count, its own balance is part of the delegate's tally. Otherwise
/// the balance is added to the available votes, which covers the window
/// where the vote checkpoint has not caught up with a balance change yet.
/// The votes stay unknown until both the balance and the available votes
/// are loaded.
pub fn classify(ctx: &UserVotingContext) -> Result<VotingStatus, StatusError> {
    let balance = checked("tokenBalanceRaw", ctx.token_balance_raw.as_ref())?;
    let available = checked("availableVotesRaw", ctx.available_votes_raw.as_ref())?;

    let me = match &ctx.self_address {
        Some(me) => me,
        None => return Ok(VotingStatus::unknown(DelegationState::NoWallet)),
    };

    let state = match (ctx.recorded_delegate(), &balance) {
        (Some(target), _) if target == me => DelegationState::SelfDelegated,
        (Some(target), _) => DelegationState::DelegatedToOther(*target),
        (None, None) => DelegationState::Loading,
        (None, Some(balance)) if balance.is_zero() => DelegationState::NoBalance,
        (None, Some(_)) => DelegationState::Undelegated,
    };

    let has_balance = balance.as_ref().map_or(false, |b| !b.is_zero());
    let action = match state {
        DelegationState::Undelegated => Some(DelegationAction::Delegate),
        DelegationState::SelfDelegated | DelegationState::DelegatedToOther(_) if has_balance => {
            Some(DelegationAction::Update)
        }
        _ => None,
    };

    let effective_votes = match (&state, balance, available) {
        (DelegationState::NoWallet | DelegationState::Loading, _, _) => EffectiveVotes::Unknown,
        // either input still loading
        (_, None, _) | (_, _, None) => EffectiveVotes::Unknown,
        (DelegationState::DelegatedToOther(_), Some(_), Some(available)) => {
            EffectiveVotes::Known(available)
        }
        (DelegationState::NoBalance, Some(_), Some(available)) if available.is_zero() => {
            EffectiveVotes::Unknown
        }
        (_, Some(balance), Some(available)) => EffectiveVotes::Known(balance + available),
    };

    Ok(VotingStatus {
        effective_votes,
        state,
        action,
    })
}
