//! Protocol constants.

/// Denominator for all basis-point calculations.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Hard participation ceiling per round.
///
/// Doubles as the forced-loss trigger: the 50th entrant plays free and the
/// settlement that follows must end the round, so a round terminates even if
/// the draw keeps producing wins.
pub const MAX_PARTICIPANTS: usize = 50;

/// Blocks between a take and the earliest settlement of it.
///
/// Two blocks guarantee the block hash used for entropy does not exist yet
/// when the take is committed.
pub const SETTLE_DELAY_BLOCKS: u64 = 2;

/// Modulus of the outcome draw.
pub const OUTCOME_MODULUS: u64 = 10;

/// Draw residues below this threshold promote the caller to holder
/// (8 of 10 = 80% win probability).
pub const WIN_THRESHOLD: u64 = 8;

/// Minimum sponsor deposit: 1 token (18 decimals).
pub const SPONSOR_MIN_DEPOSIT: u128 = 1_000_000_000_000_000_000;

/// A replacement sponsor must post at least 120% of the incumbent's amount.
pub const SPONSOR_OUTBID_BPS: u64 = 12_000;

/// Maximum sponsor message length in bytes.
pub const MAX_SPONSOR_MESSAGE_LEN: usize = 256;

/// Width of the host's sliding block-hash window. Hashes older than this are
/// unavailable and settlement of a stale ticket is rejected.
pub const BLOCKHASH_WINDOW: u64 = 256;
