//! The narrow seam between the engine and the host ledger.
//!
//! The engine never talks to a chain runtime directly. Everything it needs
//! from the outside world — call context, block data, the contract's native
//! balance, value transfers, and the event sink — arrives through [`Ledger`].
//! The host adapter implements this trait; tests drive the engine with an
//! in-memory implementation.

use primitive_types::{H160, H256, U256};

use crate::events::Event;

/// Account identifier (20-byte H160).
pub type Address = H160;

/// Host block height.
pub type BlockNumber = u64;

/// Host-supplied call context and chain primitives.
///
/// One value of this trait is scoped to a single external call: `caller` and
/// `transferred_value` describe that call, and stay fixed for its duration.
pub trait Ledger {
    /// The account that signed the current call.
    fn caller(&self) -> Address;

    /// Native value attached to the current call. Already credited to the
    /// contract's balance by the host before the engine runs.
    fn transferred_value(&self) -> U256;

    /// Current block height.
    fn block_number(&self) -> BlockNumber;

    /// Hash of block `number`.
    ///
    /// Returns zero for the current block, future blocks, and any block
    /// outside the host's sliding window (see
    /// [`BLOCKHASH_WINDOW`](crate::constants::BLOCKHASH_WINDOW)).
    fn block_hash(&self, number: BlockNumber) -> H256;

    /// The contract's actual native balance, including value that arrived
    /// outside the engine's accounting.
    fn contract_balance(&self) -> U256;

    /// Transactional value transfer out of the contract.
    ///
    /// `false` means the transfer did not happen and no balance moved; the
    /// engine treats every such failure as non-fatal. The recipient may run
    /// arbitrary code during this call, which is why every operation sits
    /// behind the engine's reentrancy gate.
    fn transfer(&mut self, to: Address, amount: U256) -> bool;

    /// Append a domain event to the host's event stream.
    fn emit_event(&mut self, event: Event);
}
