//! The engine object.
//!
//! One value of [`HotPotato`] is the whole game: immutable deployment
//! configuration plus all mutable round state. Five concerns live here
//! because they share one set of accounting invariants — the entry
//! controller, the settlement engine, the round lifecycle, the sponsor
//! sub-protocol, and the accounting core that ties them together.
//!
//! Monetary discipline, in the order the code enforces it:
//! 1. `pot_balance ≥ sponsor_reserved` between operations; the spendable
//!    remainder is [`HotPotato::available_pot`].
//! 2. Checks, then effects, then interactions: every decision-relevant state
//!    mutation lands before the transfer it relates to, and the pending
//!    ticket is consumed before any post-decision transfer.
//! 3. Transfers out are best-effort everywhere: a refusing recipient costs
//!    itself its own payout and nothing else.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use primitive_types::U256;

use crate::constants::{
    BPS_DENOMINATOR, MAX_PARTICIPANTS, MAX_SPONSOR_MESSAGE_LEN, OUTCOME_MODULUS,
    SETTLE_DELAY_BLOCKS, SPONSOR_MIN_DEPOSIT, SPONSOR_OUTBID_BPS, WIN_THRESHOLD,
};
use crate::entropy;
use crate::errors::Error;
use crate::events::Event;
use crate::ledger::{Address, BlockNumber, Ledger};
use crate::math::ceil_mul_div;

// =========================================================================
// STATE TYPES
// =========================================================================

/// The single take awaiting settlement.
#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct PendingTake {
    pub player: Address,
    pub amount_paid: U256,
    /// Block the take was committed in; the entropy block is two later.
    pub take_block: BlockNumber,
    pub round_id: u64,
}

/// The incumbent sponsor: a refundable deposit plus a promotional message.
#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct SponsorSlot {
    pub sponsor: Address,
    pub amount: U256,
    pub message: Vec<u8>,
}

/// Mutual-exclusion gate across every value-bearing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReentrancyStatus {
    NotEntered,
    Entered,
}

// =========================================================================
// ENGINE
// =========================================================================

#[derive(Debug, Clone)]
pub struct HotPotato {
    // ── Immutable configuration ───────────────────────────────────────
    base_entry_price: U256,
    price_multiplier_bps: u64,
    keeper_reward: U256,
    creator_fee: U256,
    creator_address: Address,

    // ── Round state ───────────────────────────────────────────────────
    current_entry_price: U256,
    current_holder: Option<Address>,
    current_round_id: u64,

    // ── Accounting ────────────────────────────────────────────────────
    /// Funds the engine accounts for as in-play.
    pot_balance: U256,
    /// Portion of the pot earmarked for the incumbent sponsor's refund.
    sponsor_reserved: U256,

    // ── Settlement ────────────────────────────────────────────────────
    pending: Option<PendingTake>,

    // ── Per-round rosters (keyed by round id, dropped on finalisation) ─
    participants: BTreeMap<u64, Vec<Address>>,
    has_played: BTreeMap<u64, BTreeSet<Address>>,
    sponsor: Option<SponsorSlot>,

    // ── Safety ────────────────────────────────────────────────────────
    reentrancy: ReentrancyStatus,
    paused: bool,

    // ── Lifetime statistics ───────────────────────────────────────────
    total_takes: u64,
    total_rounds_ended: u64,
}

impl HotPotato {
    // ---------------------------------------------------------------------
    // Constructor
    // ---------------------------------------------------------------------

    /// Deploy the engine.
    ///
    /// `price_multiplier_bps` is the per-win escalation factor in basis
    /// points (10 000 = 1.0×) and must be at least 10 000 so the price never
    /// de-escalates. `keeper_reward` and `creator_fee` may be zero.
    pub fn new(
        base_entry_price: U256,
        price_multiplier_bps: u64,
        keeper_reward: U256,
        creator_fee: U256,
        creator_address: Address,
    ) -> Result<Self, Error> {
        if creator_address.is_zero() {
            return Err(Error::ZeroCreator);
        }
        if base_entry_price.is_zero() || price_multiplier_bps < BPS_DENOMINATOR {
            return Err(Error::InvalidConfiguration);
        }

        Ok(Self {
            base_entry_price,
            price_multiplier_bps,
            keeper_reward,
            creator_fee,
            creator_address,
            current_entry_price: base_entry_price,
            current_holder: None,
            current_round_id: 1,
            pot_balance: U256::zero(),
            sponsor_reserved: U256::zero(),
            pending: None,
            participants: BTreeMap::new(),
            has_played: BTreeMap::new(),
            sponsor: None,
            reentrancy: ReentrancyStatus::NotEntered,
            paused: false,
            total_takes: 0,
            total_rounds_ended: 0,
        })
    }

    // =====================================================================
    // ENTRY CONTROLLER — take the potato
    // =====================================================================

    /// Take the potato: pay the current entry price and install the pending
    /// settlement ticket.
    ///
    /// The 50th seat of a round is free — its settlement is a forced loss,
    /// so the final entrant only carries the round to its distribution.
    /// Overpayment is accepted and credited to the pot.
    pub fn enter<L: Ledger>(&mut self, env: &mut L) -> Result<(), Error> {
        self.acquire_gate()?;
        let result = self.enter_inner(env);
        self.release_gate();
        result
    }

    fn enter_inner<L: Ledger>(&mut self, env: &mut L) -> Result<(), Error> {
        self.assert_not_paused()?;

        if self.pending.is_some() {
            return Err(Error::PendingAttemptExists);
        }

        let round_id = self.current_round_id;
        let joined = self.round_len(round_id);
        if joined >= MAX_PARTICIPANTS {
            return Err(Error::MaxParticipantsReached);
        }

        let takes_final_seat = joined == MAX_PARTICIPANTS - 1;
        let required = if takes_final_seat {
            U256::zero()
        } else {
            self.current_entry_price
        };
        let value = env.transferred_value();
        if value < required {
            return Err(Error::InvalidAmount {
                provided: value,
                expected: required,
            });
        }

        let sender = env.caller();
        if self
            .has_played
            .get(&round_id)
            .map_or(false, |played| played.contains(&sender))
        {
            return Err(Error::AlreadyPlayedThisRound { round_id });
        }

        let credited = self.pot_balance.checked_add(value).ok_or(Error::Overflow)?;

        // ── Effects (no failure below this line) ──────────────────────
        self.has_played.entry(round_id).or_default().insert(sender);
        self.participants.entry(round_id).or_default().push(sender);

        if !value.is_zero() {
            self.pot_balance = credited;
            env.emit_event(Event::PotUpdated {
                new_pot: self.pot_balance,
            });
        }

        let take_block = env.block_number();
        self.pending = Some(PendingTake {
            player: sender,
            amount_paid: value,
            take_block,
            round_id,
        });
        self.total_takes = self.total_takes.saturating_add(1);

        env.emit_event(Event::Take {
            player: sender,
            price_paid: value,
            target_block: take_block,
            round_id,
        });
        Ok(())
    }

    // =====================================================================
    // SETTLEMENT ENGINE
    // =====================================================================

    /// Settle the pending take. The caller becomes the keeper and earns the
    /// keeper reward (best-effort).
    ///
    /// Requires the entropy block to exist (`take_block + 2 ≤ now`) and its
    /// predecessor hash to still be inside the host's hash window. The draw
    /// is `keccak256(prev_hash ‖ player ‖ round_id)`; residues 0–7 of 10 win.
    /// A round at the participant cap settles as a forced loss, including
    /// the case where this very settlement's win fills the cap.
    pub fn settle<L: Ledger>(&mut self, env: &mut L) -> Result<(), Error> {
        self.acquire_gate()?;
        let result = self.settle_inner(env);
        self.release_gate();
        result
    }

    fn settle_inner<L: Ledger>(&mut self, env: &mut L) -> Result<(), Error> {
        let (player, take_block, round_id) = match &self.pending {
            Some(ticket) => (ticket.player, ticket.take_block, ticket.round_id),
            None => return Err(Error::NoPendingAttempt),
        };

        let current_block = env.block_number();
        if current_block < take_block.saturating_add(SETTLE_DELAY_BLOCKS) {
            return Err(Error::TooSoonToSettle);
        }
        let prev_hash = env.block_hash(current_block - 1);
        if prev_hash.is_zero() {
            return Err(Error::StaleBlockhash);
        }

        // Keeper reward, best-effort: a failure leaves the funds in the pot.
        let keeper = env.caller();
        let keeper_reward = self.keeper_reward;
        let _ = self.try_pay(env, keeper, keeper_reward);

        let randomness = entropy::outcome_seed(prev_hash, player, round_id);
        let at_cap = self.round_len(self.current_round_id) >= MAX_PARTICIPANTS;
        let win = !at_cap && entropy::is_win(randomness);

        // Consume the ticket before any post-decision transfer.
        self.pending = None;

        if win {
            self.settle_win(env, player);
            // The winning entry can itself be the 50th: the round still
            // terminates this settlement.
            if self.round_len(self.current_round_id) >= MAX_PARTICIPANTS {
                self.settle_lose(env);
            }
        } else {
            self.settle_lose(env);
        }

        env.emit_event(Event::Settle {
            player,
            win,
            randomness,
            round_id,
        });
        Ok(())
    }

    // =====================================================================
    // WIN PATH
    // =====================================================================

    fn settle_win<L: Ledger>(&mut self, env: &mut L, player: Address) {
        self.current_holder = Some(player);
        self.current_entry_price = ceil_mul_div(
            self.current_entry_price,
            U256::from(self.price_multiplier_bps),
            U256::from(BPS_DENOMINATOR),
        );

        env.emit_event(Event::NewHolder {
            holder: player,
            round_id: self.current_round_id,
            new_price: self.current_entry_price,
        });
        env.emit_event(Event::PotUpdated {
            new_pot: self.pot_balance,
        });
    }

    // =====================================================================
    // LOSE PATH — round finalisation
    // =====================================================================

    /// Pay the creator fee, split the contract balance per participant head,
    /// clear the sponsor slot, and open the next round.
    ///
    /// The distribution divides the *actual* contract balance, not the pot:
    /// stray deposits and drift from earlier tolerated transfer failures all
    /// flow back to players, so no value is permanently stranded.
    fn settle_lose<L: Ledger>(&mut self, env: &mut L) {
        let round_id = self.current_round_id;

        // 1. Creator fee, best-effort, capped by the spendable pot.
        let creator_pay = self.creator_fee.min(self.available_pot());
        let creator = self.creator_address;
        let _ = self.try_pay(env, creator, creator_pay);

        // 2. Per-head distribution. Finalised rosters are dropped here;
        //    nothing reads them after the round closes.
        let roster = self.participants.remove(&round_id).unwrap_or_default();
        self.has_played.remove(&round_id);
        let heads = roster.len();

        let balance_after_fees = env.contract_balance();
        let per_share = if heads == 0 || balance_after_fees.is_zero() {
            U256::zero()
        } else {
            balance_after_fees / U256::from(heads as u64)
        };

        let mut paid_total = U256::zero();
        if !per_share.is_zero() {
            for participant in &roster {
                if env.transfer(*participant, per_share) {
                    paid_total = paid_total.saturating_add(per_share);
                } else {
                    env.emit_event(Event::ParticipantPayoutFailed {
                        participant: *participant,
                        amount: per_share,
                        round_id,
                    });
                }
            }
        }
        self.pot_balance = self.pot_balance.saturating_sub(paid_total);

        env.emit_event(Event::RoundEnded {
            round_id,
            payout_amount: paid_total,
            num_eligible: heads as u32,
            pot_after: self.pot_balance,
        });
        env.emit_event(Event::PotUpdated {
            new_pot: self.pot_balance,
        });

        // 3. Clear the sponsor slot. The deposit stays in the pot,
        //    un-reserved, and feeds the next round's distribution.
        if !self.sponsor_reserved.is_zero() || self.sponsor.is_some() {
            self.sponsor_reserved = U256::zero();
            self.sponsor = None;
            env.emit_event(Event::SponsorCleared { round_id });
        }

        // 4. Open the next round.
        self.current_round_id = self.current_round_id.saturating_add(1);
        self.current_holder = None;
        self.current_entry_price = self.base_entry_price;
        self.total_rounds_ended = self.total_rounds_ended.saturating_add(1);
    }

    // =====================================================================
    // SPONSOR SUB-PROTOCOL
    // =====================================================================

    /// Post a refundable deposit to hold the sponsor slot for the current
    /// round, attaching a promotional message of at most 256 bytes.
    ///
    /// A fresh slot costs at least 1e18. Replacing an incumbent requires at
    /// least `⌈incumbent · 1.2⌉`; the incumbent's deposit is refunded
    /// best-effort. New funds are credited before the refund leaves, and the
    /// incumbent's reservation is released before the transfer is attempted,
    /// so a refusing recipient can neither trap liquidity nor keep its
    /// amount locked as reserved.
    pub fn sponsor<L: Ledger>(&mut self, env: &mut L, message: Vec<u8>) -> Result<(), Error> {
        self.acquire_gate()?;
        let result = self.sponsor_inner(env, message);
        self.release_gate();
        result
    }

    fn sponsor_inner<L: Ledger>(&mut self, env: &mut L, message: Vec<u8>) -> Result<(), Error> {
        self.assert_not_paused()?;

        let value = env.transferred_value();
        let floor = U256::from(SPONSOR_MIN_DEPOSIT);
        if value < floor {
            return Err(Error::InvalidAmount {
                provided: value,
                expected: floor,
            });
        }
        if message.len() > MAX_SPONSOR_MESSAGE_LEN {
            return Err(Error::MessageTooLong);
        }

        let sender = env.caller();
        let round_id = self.current_round_id;

        match self.sponsor.clone() {
            None => {
                let credited = self.pot_balance.checked_add(value).ok_or(Error::Overflow)?;
                let reserved = self
                    .sponsor_reserved
                    .checked_add(value)
                    .ok_or(Error::Overflow)?;

                self.pot_balance = credited;
                self.sponsor_reserved = reserved;
                self.sponsor = Some(SponsorSlot {
                    sponsor: sender,
                    amount: value,
                    message: message.clone(),
                });

                env.emit_event(Event::PotUpdated {
                    new_pot: self.pot_balance,
                });
                env.emit_event(Event::SponsorUpdated {
                    sponsor: sender,
                    amount: value,
                    message,
                    round_id,
                });
            }
            Some(incumbent) => {
                let min_next = ceil_mul_div(
                    incumbent.amount,
                    U256::from(SPONSOR_OUTBID_BPS),
                    U256::from(BPS_DENOMINATOR),
                );
                if value < min_next {
                    return Err(Error::InvalidAmount {
                        provided: value,
                        expected: min_next,
                    });
                }

                let credited = self.pot_balance.checked_add(value).ok_or(Error::Overflow)?;
                let reserved = self
                    .sponsor_reserved
                    .checked_add(value)
                    .ok_or(Error::Overflow)?;

                // Credit the challenger's funds first: refund liquidity is
                // guaranteed before anything leaves.
                self.pot_balance = credited;
                self.sponsor_reserved = reserved;
                env.emit_event(Event::PotUpdated {
                    new_pot: self.pot_balance,
                });

                // Release the incumbent's reservation before the transfer;
                // a failing recipient must not keep its amount reserved.
                self.sponsor_reserved = self.sponsor_reserved.saturating_sub(incumbent.amount);

                if env.transfer(incumbent.sponsor, incumbent.amount) {
                    self.pot_balance = self.pot_balance.saturating_sub(incumbent.amount);
                } else {
                    env.emit_event(Event::SponsorRefundFailed {
                        previous_sponsor: incumbent.sponsor,
                        amount: incumbent.amount,
                        round_id,
                    });
                }

                env.emit_event(Event::SponsorReplaced {
                    previous_sponsor: incumbent.sponsor,
                    refund_amount: incumbent.amount,
                    round_id,
                });

                self.sponsor = Some(SponsorSlot {
                    sponsor: sender,
                    amount: value,
                    message: message.clone(),
                });
                env.emit_event(Event::SponsorUpdated {
                    sponsor: sender,
                    amount: value,
                    message,
                    round_id,
                });
            }
        }
        Ok(())
    }

    // =====================================================================
    // PASSIVE DEPOSITS
    // =====================================================================

    /// Credit value that arrived without matching any operation.
    pub fn deposit<L: Ledger>(&mut self, env: &mut L) -> Result<(), Error> {
        self.acquire_gate()?;
        let result = self.deposit_inner(env);
        self.release_gate();
        result
    }

    fn deposit_inner<L: Ledger>(&mut self, env: &mut L) -> Result<(), Error> {
        let value = env.transferred_value();
        if !value.is_zero() {
            self.credit_pot(env, value)?;
        }
        Ok(())
    }

    // =====================================================================
    // ADMIN
    // =====================================================================

    /// Replace the creator address. Creator only; zero is rejected.
    pub fn update_creator<L: Ledger>(
        &mut self,
        env: &mut L,
        new_creator: Address,
    ) -> Result<(), Error> {
        self.only_creator(env)?;
        if new_creator.is_zero() {
            return Err(Error::ZeroCreator);
        }
        self.creator_address = new_creator;
        Ok(())
    }

    /// Pause or resume new entries and sponsorships. Creator only.
    ///
    /// Settlement and deposits stay live while paused so a pending ticket
    /// can always resolve and inbound value is never refused.
    pub fn set_paused<L: Ledger>(&mut self, env: &mut L, paused: bool) -> Result<(), Error> {
        self.only_creator(env)?;
        self.paused = paused;
        Ok(())
    }

    // =====================================================================
    // VIEW FUNCTIONS
    // =====================================================================

    /// Whether a take is awaiting settlement.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending take, if any.
    pub fn pending(&self) -> Option<&PendingTake> {
        self.pending.as_ref()
    }

    /// Earliest block at which the pending take can settle.
    pub fn pending_target_block(&self) -> Option<BlockNumber> {
        self.pending
            .as_ref()
            .map(|ticket| ticket.take_block.saturating_add(SETTLE_DELAY_BLOCKS))
    }

    /// Spendable pot: `pot_balance − sponsor_reserved`, saturating at 0.
    pub fn available_pot(&self) -> U256 {
        self.pot_balance.saturating_sub(self.sponsor_reserved)
    }

    /// The incumbent sponsor, if any.
    pub fn current_sponsor(&self) -> Option<&SponsorSlot> {
        self.sponsor.as_ref()
    }

    pub fn base_entry_price(&self) -> U256 {
        self.base_entry_price
    }

    pub fn price_multiplier_bps(&self) -> u64 {
        self.price_multiplier_bps
    }

    pub fn current_entry_price(&self) -> U256 {
        self.current_entry_price
    }

    pub fn current_round_id(&self) -> u64 {
        self.current_round_id
    }

    pub fn current_holder(&self) -> Option<Address> {
        self.current_holder
    }

    pub fn creator_address(&self) -> Address {
        self.creator_address
    }

    pub fn keeper_reward(&self) -> U256 {
        self.keeper_reward
    }

    pub fn creator_fee(&self) -> U256 {
        self.creator_fee
    }

    pub fn pot_balance(&self) -> U256 {
        self.pot_balance
    }

    pub fn sponsor_reserved(&self) -> U256 {
        self.sponsor_reserved
    }

    /// Participant head-count of the current round.
    pub fn participant_count(&self) -> usize {
        self.round_len(self.current_round_id)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Lifetime counters: `(total_takes, total_rounds_ended)`.
    pub fn get_stats(&self) -> (u64, u64) {
        (self.total_takes, self.total_rounds_ended)
    }

    // =====================================================================
    // ACCOUNTING CORE — internal helpers
    // =====================================================================

    fn round_len(&self, round_id: u64) -> usize {
        self.participants.get(&round_id).map_or(0, Vec::len)
    }

    fn credit_pot<L: Ledger>(&mut self, env: &mut L, amount: U256) -> Result<(), Error> {
        self.pot_balance = self
            .pot_balance
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        env.emit_event(Event::PotUpdated {
            new_pot: self.pot_balance,
        });
        Ok(())
    }

    /// Best-effort payment out of the spendable pot.
    ///
    /// Clamps `amount` to [`Self::available_pot`], attempts the transfer,
    /// and books the paid amount out of the pot only on success. Returns
    /// `(ok, paid)`; a clamped-to-zero payment succeeds trivially.
    fn try_pay<L: Ledger>(&mut self, env: &mut L, to: Address, amount: U256) -> (bool, U256) {
        let pay = amount.min(self.available_pot());
        if pay.is_zero() {
            return (true, U256::zero());
        }
        if env.transfer(to, pay) {
            self.pot_balance = self.pot_balance.saturating_sub(pay);
            env.emit_event(Event::PotUpdated {
                new_pot: self.pot_balance,
            });
            (true, pay)
        } else {
            (false, U256::zero())
        }
    }

    // =====================================================================
    // GUARDS
    // =====================================================================

    fn acquire_gate(&mut self) -> Result<(), Error> {
        if self.reentrancy == ReentrancyStatus::Entered {
            return Err(Error::ReentrancyDetected);
        }
        self.reentrancy = ReentrancyStatus::Entered;
        Ok(())
    }

    fn release_gate(&mut self) {
        self.reentrancy = ReentrancyStatus::NotEntered;
    }

    fn assert_not_paused(&self) -> Result<(), Error> {
        if self.paused {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    fn only_creator<L: Ledger>(&self, env: &L) -> Result<(), Error> {
        if env.caller() != self.creator_address {
            return Err(Error::NotCreator);
        }
        Ok(())
    }
}

// Residues and threshold are compile-time partners; keep them visibly sane.
const _: () = assert!(WIN_THRESHOLD < OUTCOME_MODULUS);

// =========================================================================
// UNIT TESTS
// =========================================================================
