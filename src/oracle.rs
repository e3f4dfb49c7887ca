// Randomness oracle integration for the lottery program
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{hash::Hash, msg};

use crate::error::LotteryError;

/// Execution parameters forwarded to the oracle with every request.
///
/// The program never interprets these; they are fixed at initialization and
/// echoed in the request log so the off-chain coordinator knows which key,
/// subscription and callback budget to use.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OracleParams {
    /// Proving key hash (gas lane) the coordinator should sign with
    pub key_hash: [u8; 32],
    /// Subscription that pays for the request
    pub subscription_id: u64,
    /// Confirmations the coordinator waits before answering
    pub request_confirmations: u16,
    /// Compute budget for the fulfillment transaction
    pub callback_compute_units: u32,
    /// Number of random words requested
    pub num_words: u32,
}

impl OracleParams {
    pub const LEN: usize = 32 + 8 + 2 + 4 + 4;
}

/// Outbound side of the oracle exchange.
pub trait RandomnessOracle {
    /// Issue a randomness request and return its identifier. The answer
    /// arrives later through the fulfillment instruction.
    fn request_randomness(&mut self, params: &OracleParams) -> Result<u64, LotteryError>;
}

/// Request queue announced through the program log.
///
/// Identifiers are sequential and start at 1; the coordinator watches the
/// log for `Randomness request` lines and answers with `FulfillRandomness`.
pub struct LoggedRequestQueue {
    last_request_id: u64,
}

impl LoggedRequestQueue {
    pub fn new(last_request_id: u64) -> Self {
        Self { last_request_id }
    }

    pub fn last_request_id(&self) -> u64 {
        self.last_request_id
    }
}

impl RandomnessOracle for LoggedRequestQueue {
    fn request_randomness(&mut self, params: &OracleParams) -> Result<u64, LotteryError> {
        let request_id = self
            .last_request_id
            .checked_add(1)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        msg!(
            "Randomness request {}: key_hash={}, subscription={}, confirmations={}, compute_units={}, words={}",
            request_id,
            Hash::new_from_array(params.key_hash),
            params.subscription_id,
            params.request_confirmations,
            params.callback_compute_units,
            params.num_words
        );

        self.last_request_id = request_id;
        Ok(request_id)
    }
}

/// Reduce a 256-bit little-endian random word modulo the participant count.
///
/// Plain modulo, so the draw carries the usual bias when 2^256 is not a
/// multiple of `participant_count`.
pub fn winner_index(random_word: &[u8; 32], participant_count: u64) -> u64 {
    if participant_count == 0 {
        return 0;
    }

    let modulus = participant_count as u128;
    random_word
        .iter()
        .rev()
        .fold(0u128, |acc, byte| ((acc << 8) | *byte as u128) % modulus) as u64
}
