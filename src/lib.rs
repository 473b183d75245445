#![cfg_attr(not(feature = "std"), no_std)]

//! # Hot Potato — Settlement Engine
//!
//! **Role:** Game state machine, economic bookkeeper, and sponsor registrar
//! for the Hot Potato contest.
//!
//! ## What this engine does
//! - Records escalating-price "takes" of the potato (one pending attempt at a
//!   time, at most 50 participants per round, one play per account per round).
//! - Settles each attempt after a two-block delay from a keccak draw over the
//!   previous block hash; 80% of draws promote the caller to holder and
//!   escalate the price, the rest end the round.
//! - On a round end, pays the creator fee and splits the contract balance per
//!   participant head, tolerating individual transfer failures so a single
//!   griefing recipient can never freeze the game.
//! - Runs the sponsor slot: a refundable promotional deposit that a challenger
//!   replaces only by posting at least 120% of the incumbent's amount.
//! - Reconciles three monetary views at all times: the pot balance, the
//!   sponsor-reserved portion, and the spendable remainder.
//!
//! ## What this engine does NOT contain
//! - The host ledger itself: block numbers, block hashes, the contract's
//!   native balance, and value transfers arrive through the [`Ledger`] seam.
//! - Off-chain indexing; downstream consumers rebuild analytics from the
//!   emitted [`Event`] stream alone.
//! - Randomness beacons, claim flows, or governance.

extern crate alloc;

pub mod constants;
pub mod engine;
pub mod entropy;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod math;

pub use engine::{HotPotato, PendingTake, SponsorSlot};
pub use errors::Error;
pub use events::Event;
pub use ledger::{Address, BlockNumber, Ledger};

#[cfg(test)]
mod test_ledger;
