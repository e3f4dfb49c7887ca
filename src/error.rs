use solana_program::{
    decode_error::DecodeError, msg, program_error::PrintProgramError, program_error::ProgramError,
};
use thiserror::Error;

use crate::state::LotteryStatus;

/// Errors that may be returned by the Lottery program
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LotteryError {
    /// Payment is below the entrance fee
    #[error("Payment is below the entrance fee")]
    InsufficientPayment,

    /// Lottery is not accepting entries
    #[error("Lottery is not open")]
    LotteryNotOpen,

    /// Participant capacity of the lottery account is exhausted
    #[error("Lottery is full")]
    LotteryFull,

    /// Upkeep was triggered while the round is not eligible to close
    #[error("Upkeep not needed (pool: {pool}, participants: {participant_count}, status: {status:?})")]
    UpkeepNotNeeded {
        pool: u64,
        participant_count: u64,
        status: LotteryStatus,
    },

    /// Request id does not match the pending randomness request
    #[error("Unknown randomness request")]
    UnknownRequest,

    /// Fulfillment was not sent by the configured oracle
    #[error("Caller is not the configured randomness oracle")]
    UnauthorizedOracle,

    /// Round has no participants to draw from
    ///
    /// `perform_upkeep` only closes rounds with at least one entry, so this
    /// fires only on an account whose participant list was emptied while a
    /// request was pending.
    #[error("Round has no participants")]
    EmptyRound,

    /// Prize could not be moved to the winner
    #[error("Payout to the winner failed")]
    PayoutFailed,

    /// Integer overflow in lamport or counter arithmetic
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

impl LotteryError {
    /// Custom program error code for this variant.
    pub fn code(&self) -> u32 {
        match self {
            Self::InsufficientPayment => 0,
            Self::LotteryNotOpen => 1,
            Self::LotteryFull => 2,
            Self::UpkeepNotNeeded { .. } => 3,
            Self::UnknownRequest => 4,
            Self::UnauthorizedOracle => 5,
            Self::EmptyRound => 6,
            Self::PayoutFailed => 7,
            Self::ArithmeticOverflow => 8,
        }
    }
}

impl From<LotteryError> for ProgramError {
    fn from(e: LotteryError) -> Self {
        ProgramError::Custom(e.code())
    }
}

impl<T> DecodeError<T> for LotteryError {
    fn type_of() -> &'static str {
        "Lottery Error"
    }
}

impl PrintProgramError for LotteryError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
