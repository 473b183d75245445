//! Domain events.
//!
//! Names and payloads are a compatibility surface: off-chain indexers rebuild
//! round analytics from this stream alone, in emission order. Within one
//! settlement the `NewHolder` / `RoundEnded` / `PotUpdated` events of the
//! win and lose paths precede the closing `Settle`.

use alloc::vec::Vec;
use primitive_types::U256;

use crate::ledger::{Address, BlockNumber};

#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Event {
    /// A player took the potato and a settlement ticket was installed.
    Take {
        player: Address,
        price_paid: U256,
        /// Block the take was committed in; settlement is possible two
        /// blocks later.
        target_block: BlockNumber,
        round_id: u64,
    },

    /// A pending take was settled. Emitted after the events of whichever
    /// path (win, lose, or win-then-forced-loss) the draw dispatched to.
    Settle {
        player: Address,
        win: bool,
        randomness: U256,
        round_id: u64,
    },

    /// The winning player became the holder and the entry price escalated.
    NewHolder {
        holder: Address,
        round_id: u64,
        new_price: U256,
    },

    /// A round was finalised by the lose path.
    ///
    /// | Field           | Meaning                                          |
    /// |-----------------|--------------------------------------------------|
    /// | `payout_amount` | Total actually delivered to participants         |
    /// | `num_eligible`  | Participant head-count the pot was split over    |
    /// | `pot_after`     | Pot balance remaining after the distribution     |
    RoundEnded {
        round_id: u64,
        payout_amount: U256,
        num_eligible: u32,
        pot_after: U256,
    },

    /// The pot balance changed.
    PotUpdated { new_pot: U256 },

    /// A sponsor was installed (fresh slot or replacement).
    SponsorUpdated {
        sponsor: Address,
        amount: U256,
        message: Vec<u8>,
        round_id: u64,
    },

    /// An incumbent sponsor was outbid and its deposit refund attempted.
    SponsorReplaced {
        previous_sponsor: Address,
        refund_amount: U256,
        round_id: u64,
    },

    /// The sponsor slot was cleared by a round end; the deposit stays in the
    /// pot, un-reserved.
    SponsorCleared { round_id: u64 },

    /// A participant's share could not be delivered; the loop continued.
    ParticipantPayoutFailed {
        participant: Address,
        amount: U256,
        round_id: u64,
    },

    /// A displaced sponsor rejected its refund; the deposit stays in the pot.
    SponsorRefundFailed {
        previous_sponsor: Address,
        amount: U256,
        round_id: u64,
    },
}
