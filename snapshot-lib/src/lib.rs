//! Snapshot data model for delegation based token governance.
//!
//! Everything in here is an immutable value delivered by the data layer:
//! the delegate list with its global vote total, the connected account's
//! balances and delegation, and the static protocol settings. Computations
//! over these values live in `governance-toolbox`.

pub mod address;
pub mod amount;
pub mod context;
pub mod delegate;
pub mod settings;

pub use address::Address;
pub use amount::{RawAmount, VoteAmount};
pub use context::UserVotingContext;
pub use delegate::{
    DelegateRecord, DelegatesSnapshot, GlobalData, ProposalVote, RawDelegateRecord, SnapshotId,
};
pub use settings::{name_map_from_raw, NameMap, ProtocolSettings};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid address {value:?}: {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("invalid amount {value:?}: {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("{field} is negative ({value}), upstream data is corrupted")]
    NegativeQuantity { field: &'static str, value: String },
}
