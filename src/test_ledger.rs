//! In-memory [`Ledger`] implementation driving the engine in tests.
//!
//! Mirrors the host contract the engine is written against: attached value
//! lands on the contract balance before the call runs, transfers either move
//! balance or fail without side effects, and block hashes come from a
//! sliding window that tests can override per block.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use primitive_types::{H256, U256};

use crate::constants::{BLOCKHASH_WINDOW, SETTLE_DELAY_BLOCKS};
use crate::engine::HotPotato;
use crate::entropy;
use crate::events::Event;
use crate::ledger::{Address, BlockNumber, Ledger};

pub fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

/// 1e18, the unit all scenario amounts are quoted in.
pub fn one_token() -> U256 {
    U256::from(1_000_000_000_000_000_000u128)
}

/// Keeper reward used across the test suite (0.02 tokens).
pub const KEEPER_REWARD: u128 = 20_000_000_000_000_000;

/// Creator fee used across the test suite (0.1 tokens).
pub const CREATOR_FEE: u128 = 100_000_000_000_000_000;

pub fn creator() -> Address {
    addr(0xC0)
}

/// Engine with the reference configuration of the end-to-end scenarios:
/// base price 1e18, multiplier 12 000 bps, keeper reward 2e16, fee 1e17.
pub fn deploy_standard() -> HotPotato {
    HotPotato::new(
        one_token(),
        12_000,
        U256::from(KEEPER_REWARD),
        U256::from(CREATOR_FEE),
        creator(),
    )
    .expect("reference configuration is valid")
}

/// Search the hash space for a previous-block hash that makes the draw for
/// `(player, round_id)` come out as `win`.
pub fn find_hash_with_outcome(player: Address, round_id: u64, win: bool) -> H256 {
    (1u64..)
        .map(H256::from_low_u64_be)
        .find(|hash| entropy::is_win(entropy::outcome_seed(*hash, player, round_id)) == win)
        .expect("both outcomes are reachable")
}

pub struct TestLedger {
    caller: Address,
    value: U256,
    block: BlockNumber,
    hash_overrides: BTreeMap<BlockNumber, H256>,
    contract_balance: U256,
    balances: BTreeMap<Address, U256>,
    rejecting: BTreeSet<Address>,
    pub events: Vec<Event>,
}

impl TestLedger {
    pub fn new() -> Self {
        Self {
            caller: Address::zero(),
            value: U256::zero(),
            block: 1,
            hash_overrides: BTreeMap::new(),
            contract_balance: U256::zero(),
            balances: BTreeMap::new(),
            rejecting: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    /// Begin an external call: fix the caller and attached value, and credit
    /// that value to the contract balance the way the host does before the
    /// engine runs.
    pub fn push_call(&mut self, caller: Address, value: U256) {
        self.caller = caller;
        self.value = value;
        self.contract_balance += value;
    }

    pub fn set_block(&mut self, block: BlockNumber) {
        self.block = block;
    }

    pub fn set_block_hash(&mut self, number: BlockNumber, hash: H256) {
        self.hash_overrides.insert(number, hash);
    }

    /// Simulate the host having no hash for `number`.
    pub fn void_block_hash(&mut self, number: BlockNumber) {
        self.hash_overrides.insert(number, H256::zero());
    }

    /// Make every transfer to `to` fail, like a recipient that reverts.
    pub fn reject_transfers_to(&mut self, to: Address) {
        self.rejecting.insert(to);
    }

    /// Value delivered to `who` by engine transfers so far.
    pub fn balance_of(&self, who: Address) -> U256 {
        self.balances.get(&who).copied().unwrap_or_default()
    }

    /// Drop value on the contract outside any engine operation — the stray
    /// deposit the lose path's balance-based split is designed to absorb.
    pub fn fund_contract(&mut self, amount: U256) {
        self.contract_balance += amount;
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        core::mem::take(&mut self.events)
    }

    /// Undo the value credit of the last `push_call`, the way a host reverts
    /// the attached value of a failed transaction.
    pub fn revert_call(&mut self) {
        self.contract_balance -= self.value;
        self.value = U256::zero();
    }

    /// Advance to the pending ticket's settlement horizon, pin the entropy
    /// hash to the requested outcome, and settle as `keeper`.
    pub fn settle_pending(&mut self, game: &mut HotPotato, keeper: Address, win: bool) {
        let ticket = game.pending().expect("a take must be pending").clone();
        let horizon = ticket.take_block + SETTLE_DELAY_BLOCKS;
        if self.block < horizon {
            self.block = horizon;
        }
        let hash = find_hash_with_outcome(ticket.player, ticket.round_id, win);
        self.hash_overrides.insert(self.block - 1, hash);
        self.push_call(keeper, U256::zero());
        game.settle(self).expect("settlement must succeed");
    }
}

impl Ledger for TestLedger {
    fn caller(&self) -> Address {
        self.caller
    }

    fn transferred_value(&self) -> U256 {
        self.value
    }

    fn block_number(&self) -> BlockNumber {
        self.block
    }

    fn block_hash(&self, number: BlockNumber) -> H256 {
        if number >= self.block {
            return H256::zero();
        }
        if let Some(hash) = self.hash_overrides.get(&number) {
            return *hash;
        }
        if self.block - number > BLOCKHASH_WINDOW {
            return H256::zero();
        }
        // Deterministic non-zero filler for blocks no test pinned.
        H256::from_low_u64_be(number.wrapping_mul(0x9e37_79b9_7f4a_7c15) | 1)
    }

    fn contract_balance(&self) -> U256 {
        self.contract_balance
    }

    fn transfer(&mut self, to: Address, amount: U256) -> bool {
        if self.rejecting.contains(&to) {
            return false;
        }
        if amount > self.contract_balance {
            return false;
        }
        self.contract_balance -= amount;
        *self.balances.entry(to).or_insert(U256::zero()) += amount;
        true
    }

    fn emit_event(&mut self, event: Event) {
        self.events.push(event);
    }
}
