//! Typed failures surfaced to callers.

use primitive_types::U256;

/// Every way an operation can be rejected.
///
/// A returned error means the operation was a no-op: no state changed and no
/// event was emitted. Tolerated transfer failures (keeper reward, creator
/// fee, participant shares, sponsor refunds) are *not* errors; they surface
/// as diagnostic events instead.
#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Error {
    /// Attached value is below what the operation requires.
    InvalidAmount { provided: U256, expected: U256 },
    /// A take is already awaiting settlement.
    PendingAttemptExists,
    /// There is no take to settle.
    NoPendingAttempt,
    /// The entropy block has not been produced yet.
    TooSoonToSettle,
    /// The entropy block hash has left the host's sliding window.
    StaleBlockhash,
    /// The caller already took the potato this round.
    AlreadyPlayedThisRound { round_id: u64 },
    /// The round already holds the maximum number of participants.
    MaxParticipantsReached,
    /// Caller is not the creator.
    NotCreator,
    /// The creator address may not be zero.
    ZeroCreator,
    /// Sponsor message exceeds 256 bytes.
    MessageTooLong,
    /// A nested call re-entered the engine during a value transfer.
    ReentrancyDetected,
    /// Engine is paused.
    ContractPaused,
    /// Constructor arguments violate the configuration constraints.
    InvalidConfiguration,
    /// An arithmetic operation overflowed.
    Overflow,
}
