use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    clock::UnixTimestamp,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    program_pack::IsInitialized,
    pubkey::Pubkey,
};

use crate::oracle::OracleParams;

/// Status of the current round
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LotteryStatus {
    /// Round is open for entries
    Open,
    /// Randomness requested, waiting for the oracle
    Closing,
}

/// The single outstanding randomness request
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    /// Identifier returned by the oracle
    pub request_id: u64,
    /// Round the request was issued for
    pub round: u64,
    /// When the request was issued
    pub requested_at: UnixTimestamp,
}

impl PendingRequest {
    pub const LEN: usize = 8 + 8 + 8;
}

/// Parameters fixed when the lottery account is created
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LotteryConfig {
    /// Minimum payment per entry, in lamports
    pub entrance_fee: u64,
    /// Seconds that must pass after a reset before the round may close
    pub interval: i64,
    /// Capacity of the participant list
    pub max_participants: u32,
    /// The only key allowed to fulfill randomness requests
    pub oracle: Pubkey,
    /// Opaque parameters passed along with each request
    pub oracle_params: OracleParams,
}

/// Lottery account data
///
/// Mutated only through `enter`, `perform_upkeep` and `fulfill`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Lottery {
    pub(crate) is_initialized: bool,
    pub(crate) authority: Pubkey,
    pub(crate) oracle: Pubkey,
    pub(crate) oracle_params: OracleParams,
    pub(crate) entrance_fee: u64,
    pub(crate) interval: i64,
    pub(crate) max_participants: u32,
    pub(crate) status: LotteryStatus,
    pub(crate) round: u64,
    pub(crate) last_closed_at: UnixTimestamp,
    pub(crate) pool: u64,
    pub(crate) last_request_id: u64,
    pub(crate) pending_request: Option<PendingRequest>,
    pub(crate) recent_winner: Option<Pubkey>,
    pub(crate) participants: Vec<Pubkey>,
}

impl IsInitialized for Lottery {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Lottery {
    /// Serialized size with an empty participant list
    pub const BASE_LEN: usize = 1
        + 32
        + 32
        + OracleParams::LEN
        + 8
        + 8
        + 4
        + 1
        + 8
        + 8
        + 8
        + 8
        + (1 + PendingRequest::LEN)
        + (1 + 32)
        + 4;

    /// Account size needed to hold `max_participants` entries
    pub fn space(max_participants: u32) -> usize {
        Self::BASE_LEN + 32 * max_participants as usize
    }

    /// Fresh round: open, empty, with `now` as the last reset.
    pub fn new(authority: Pubkey, config: LotteryConfig, now: UnixTimestamp) -> Self {
        Self {
            is_initialized: true,
            authority,
            oracle: config.oracle,
            oracle_params: config.oracle_params,
            entrance_fee: config.entrance_fee,
            interval: config.interval,
            max_participants: config.max_participants,
            status: LotteryStatus::Open,
            round: 1,
            last_closed_at: now,
            pool: 0,
            last_request_id: 0,
            pending_request: None,
            recent_winner: None,
            participants: Vec::new(),
        }
    }

    /// Decode account data. Trailing capacity is ignored.
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        Self::deserialize(&mut &data[..]).map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Load an initialized lottery from a program-owned account.
    pub fn load(lottery_info: &AccountInfo, program_id: &Pubkey) -> Result<Self, ProgramError> {
        if lottery_info.owner != program_id {
            msg!("Lottery account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let lottery = Self::unpack(&lottery_info.data.borrow())?;
        if !lottery.is_initialized {
            msg!("Lottery is not initialized");
            return Err(ProgramError::UninitializedAccount);
        }
        Ok(lottery)
    }

    pub fn save(&self, lottery_info: &AccountInfo) -> ProgramResult {
        let mut data = lottery_info.data.borrow_mut();
        self.serialize(&mut &mut data[..])
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))
    }

    pub fn authority(&self) -> &Pubkey {
        &self.authority
    }

    pub fn oracle(&self) -> &Pubkey {
        &self.oracle
    }

    pub fn oracle_params(&self) -> &OracleParams {
        &self.oracle_params
    }

    pub fn entrance_fee(&self) -> u64 {
        self.entrance_fee
    }

    pub fn interval(&self) -> i64 {
        self.interval
    }

    pub fn max_participants(&self) -> u32 {
        self.max_participants
    }

    pub fn status(&self) -> LotteryStatus {
        self.status
    }

    /// Number of the current round, starting at 1
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn last_closed_at(&self) -> UnixTimestamp {
        self.last_closed_at
    }

    pub fn pool(&self) -> u64 {
        self.pool
    }

    pub fn last_request_id(&self) -> u64 {
        self.last_request_id
    }

    pub fn pending_request(&self) -> Option<&PendingRequest> {
        self.pending_request.as_ref()
    }

    pub fn recent_winner(&self) -> Option<&Pubkey> {
        self.recent_winner.as_ref()
    }

    pub fn participant(&self, index: usize) -> Option<&Pubkey> {
        self.participants.get(index)
    }

    pub fn participant_count(&self) -> u64 {
        self.participants.len() as u64
    }

    pub fn participants(&self) -> &[Pubkey] {
        &self.participants
    }
}
