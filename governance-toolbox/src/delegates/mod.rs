//! Ranked, percentage annotated view over a delegate snapshot.
//!
//! The order of the delegates is the one published by the indexer and is
//! never changed here: the displayed rank is just the position of the
//! record in its snapshot.

pub mod memo;
mod share;

pub use memo::RankedViewMemo;
pub use share::{SharePercent, UNDEFINED_PLACEHOLDER};

use crate::utils::group_thousands;
use crate::voting::has_tokens;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use snapshot_lib::amount::{non_negative, whole_units};
use snapshot_lib::{
    Address, DelegateRecord, DelegatesSnapshot, NameMap, ProtocolSettings, RawAmount,
    RawDelegateRecord, VoteAmount,
};
use thiserror::Error;
use tracing::{error, warn};

pub const EOA_LABEL: &str = "EOA";
pub const CONTRACT_LABEL: &str = "Smart Contract";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("delegate {id:?} has an invalid identifier")]
    InvalidIdentifier {
        id: String,
        #[source]
        source: snapshot_lib::Error,
    },
    #[error("delegate {id:?} has a negative vote count")]
    NegativeQuantity {
        id: String,
        #[source]
        source: snapshot_lib::Error,
    },
}

/// A record left out of the view, with the rank it would have had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub rank: usize,
    pub error: RecordError,
}

/// One row of the delegate list, with every display string precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDelegate {
    /// 1-based position in the snapshot.
    pub rank: usize,
    pub id: Address,
    /// Resolved name, or the shortened address.
    pub name: String,
    /// Shortened address when the delegate has a handle, the account kind otherwise.
    pub detail: String,
    pub display_handle: Option<String>,
    pub image_url: Option<String>,
    pub is_externally_owned: bool,
    pub proposals_voted: usize,
    pub delegated_votes_raw: VoteAmount,
    pub share: SharePercent,
    pub share_display: String,
    /// Whole token units, truncated toward zero.
    pub votes: VoteAmount,
    pub votes_display: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankedDelegates {
    pub rows: Vec<RankedDelegate>,
    pub rejected: Vec<RejectedRecord>,
    /// Set when the global total itself could not be used.
    pub total_issue: Option<snapshot_lib::Error>,
}

impl RankedDelegates {
    /// Whether the "delegate" action should be offered next to each row.
    pub fn can_delegate(&self, balance: Option<&RawAmount>) -> bool {
        has_tokens(balance)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RankedView {
    /// The snapshot has not been delivered yet.
    Loading,
    Ready(RankedDelegates),
}

impl RankedView {
    pub fn rows(&self) -> &[RankedDelegate] {
        match self {
            Self::Loading => &[],
            Self::Ready(delegates) => &delegates.rows,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

pub fn rank_snapshot(
    snapshot: Option<&DelegatesSnapshot>,
    names: &NameMap,
    settings: &ProtocolSettings,
) -> RankedView {
    match snapshot {
        Some(snapshot) => rank_delegates(
            Some(snapshot.delegates.as_slice()),
            snapshot.global_total(),
            names,
            settings,
        ),
        None => RankedView::Loading,
    }
}

/// Builds the ranked view for `records`, keeping their order.
///
/// `global_total` must come from the same snapshot as `records`. A missing,
/// zero or negative total leaves every share undefined. Records with an
/// invalid identifier or a negative vote count are left out and reported,
/// the rest of the list is unaffected.
pub fn rank_delegates(
    records: Option<&[RawDelegateRecord]>,
    global_total: Option<&RawAmount>,
    names: &NameMap,
    settings: &ProtocolSettings,
) -> RankedView {
    let records = match records {
        Some(records) => records,
        None => return RankedView::Loading,
    };

    let mut view = RankedDelegates::default();

    let total = match global_total.map(|total| non_negative("globalDelegatedVotesRaw", total)) {
        Some(Ok(total)) => Some(total),
        Some(Err(e)) => {
            error!(error = %e, "unusable global vote total, shares are undefined");
            view.total_issue = Some(e);
            None
        }
        None => None,
    };

    for (i, raw) in records.iter().enumerate() {
        let rank = i + 1;
        match validate(raw) {
            Ok(record) => view
                .rows
                .push(ranked_delegate(rank, record, total.as_ref(), names, settings)),
            Err(e) => {
                match &e {
                    RecordError::InvalidIdentifier { source, .. } => {
                        warn!(
                            rank,
                            error = %source,
                            "excluding delegate with invalid identifier"
                        )
                    }
                    RecordError::NegativeQuantity { source, .. } => {
                        error!(
                            rank,
                            error = %source,
                            "excluding delegate with corrupted vote count"
                        )
                    }
                }
                view.rejected.push(RejectedRecord { rank, error: e });
            }
        }
    }

    RankedView::Ready(view)
}

fn validate(raw: &RawDelegateRecord) -> Result<DelegateRecord, RecordError> {
    raw.validate().map_err(|source| match source {
        snapshot_lib::Error::NegativeQuantity { .. } => RecordError::NegativeQuantity {
            id: raw.id.clone(),
            source,
        },
        _ => RecordError::InvalidIdentifier {
            id: raw.id.clone(),
            source,
        },
    })
}

fn ranked_delegate(
    rank: usize,
    record: DelegateRecord,
    total: Option<&VoteAmount>,
    names: &NameMap,
    settings: &ProtocolSettings,
) -> RankedDelegate {
    let short_address = record.id.shorten(settings.address_chars);

    let name = names
        .get(&record.id)
        .cloned()
        .unwrap_or_else(|| short_address.clone());
    let detail = match (&record.display_handle, record.is_externally_owned) {
        (Some(_), _) => short_address,
        (None, true) => EOA_LABEL.to_string(),
        (None, false) => CONTRACT_LABEL.to_string(),
    };

    let share = SharePercent::of(&record.delegated_votes_raw, total);
    if let (Some(fraction), Some(total)) = (share.as_fraction(), total) {
        if record.delegated_votes_raw > *total {
            warn!(
                delegate = %record.id,
                share = %fraction,
                "delegate holds more votes than the global total"
            );
        }
    }

    let votes = whole_units(&record.delegated_votes_raw, settings.token_decimals);
    if let Some(upstream) = record.delegated_votes {
        cross_check_votes(&record.id, &votes, upstream);
    }

    RankedDelegate {
        rank,
        id: record.id,
        name,
        detail,
        display_handle: record.display_handle,
        image_url: record.image_url,
        is_externally_owned: record.is_externally_owned,
        proposals_voted: record.votes.len(),
        share_display: share.display(settings.percent_decimals),
        share,
        votes_display: format!("{} Votes", group_thousands(&votes)),
        votes,
        delegated_votes_raw: record.delegated_votes_raw,
    }
}

// The displayed count is derived from the raw value; the upstream scaled
// value is only used to detect a decimals mismatch.
fn cross_check_votes(id: &Address, votes: &VoteAmount, upstream: Decimal) -> bool {
    let consistent = upstream
        .trunc()
        .to_u128()
        .map(|upstream| VoteAmount::from(upstream) == *votes)
        .unwrap_or(false);
    if !consistent {
        warn!(
            delegate = %id,
            %votes,
            %upstream,
            "upstream delegated votes disagree with the raw amount"
        );
    }
    consistent
}
