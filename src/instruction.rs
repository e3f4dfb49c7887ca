use arrayref::array_ref;
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};
use std::mem::size_of;

use crate::oracle::OracleParams;

#[derive(Clone, Debug, PartialEq)]
pub enum LotteryInstruction {
    /// Create the lottery account and open the first round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The authority creating the lottery, pays for the account
    /// 1. `[signer, writable]` The lottery account (new keypair)
    /// 2. `[]` The oracle authority allowed to fulfill randomness requests
    /// 3. `[]` The system program
    InitializeLottery {
        /// Minimum payment per entry in lamports
        entrance_fee: u64,
        /// Seconds between a reset and the next eligible close
        interval: u64,
        /// Capacity of the participant list
        max_participants: u32,
        /// Parameters echoed with every randomness request
        oracle_params: OracleParams,
    },

    /// Enter the current round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The participant paying the entry
    /// 1. `[writable]` The lottery account
    /// 2. `[]` The system program
    EnterLottery {
        /// Lamports paid, at least the entrance fee
        amount: u64,
    },

    /// Report whether the round may close (return data: one byte, 0 or 1)
    ///
    /// Accounts expected:
    /// 0. `[]` The lottery account
    CheckUpkeep {},

    /// Close the round and request randomness
    ///
    /// Accounts expected:
    /// 0. `[signer]` The automation caller (anyone)
    /// 1. `[writable]` The lottery account
    PerformUpkeep {},

    /// Oracle callback carrying the random word for a pending request
    ///
    /// Accounts expected:
    /// 0. `[signer]` The oracle authority
    /// 1. `[writable]` The lottery account
    /// 2. `[writable]` The winner, receives the pool
    FulfillRandomness {
        /// Identifier of the pending request
        request_id: u64,
        /// 256-bit little-endian random value
        random_word: [u8; 32],
    },
}

impl LotteryInstruction {
    /// Unpacks a byte buffer into a LotteryInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        let (tag, rest) = input
            .split_first()
            .ok_or(ProgramError::InvalidInstructionData)?;

        Ok(match tag {
            0 => {
                let (entrance_fee, rest) = Self::unpack_u64(rest)?;
                let (interval, rest) = Self::unpack_u64(rest)?;
                let (max_participants, rest) = Self::unpack_u32(rest)?;
                let (key_hash, rest) = Self::unpack_bytes32(rest)?;
                let (subscription_id, rest) = Self::unpack_u64(rest)?;
                let (request_confirmations, rest) = Self::unpack_u16(rest)?;
                let (callback_compute_units, rest) = Self::unpack_u32(rest)?;
                let (num_words, _) = Self::unpack_u32(rest)?;
                Self::InitializeLottery {
                    entrance_fee,
                    interval,
                    max_participants,
                    oracle_params: OracleParams {
                        key_hash,
                        subscription_id,
                        request_confirmations,
                        callback_compute_units,
                        num_words,
                    },
                }
            }
            1 => {
                let (amount, _) = Self::unpack_u64(rest)?;
                Self::EnterLottery { amount }
            }
            2 => Self::CheckUpkeep {},
            3 => Self::PerformUpkeep {},
            4 => {
                let (request_id, rest) = Self::unpack_u64(rest)?;
                let (random_word, _) = Self::unpack_bytes32(rest)?;
                Self::FulfillRandomness {
                    request_id,
                    random_word,
                }
            }
            _ => return Err(ProgramError::InvalidInstructionData),
        })
    }

    /// Packs a LotteryInstruction into a byte buffer
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(size_of::<Self>());
        match *self {
            Self::InitializeLottery {
                entrance_fee,
                interval,
                max_participants,
                ref oracle_params,
            } => {
                buf.push(0);
                buf.extend_from_slice(&entrance_fee.to_le_bytes());
                buf.extend_from_slice(&interval.to_le_bytes());
                buf.extend_from_slice(&max_participants.to_le_bytes());
                buf.extend_from_slice(&oracle_params.key_hash);
                buf.extend_from_slice(&oracle_params.subscription_id.to_le_bytes());
                buf.extend_from_slice(&oracle_params.request_confirmations.to_le_bytes());
                buf.extend_from_slice(&oracle_params.callback_compute_units.to_le_bytes());
                buf.extend_from_slice(&oracle_params.num_words.to_le_bytes());
            }
            Self::EnterLottery { amount } => {
                buf.push(1);
                buf.extend_from_slice(&amount.to_le_bytes());
            }
            Self::CheckUpkeep {} => buf.push(2),
            Self::PerformUpkeep {} => buf.push(3),
            Self::FulfillRandomness {
                request_id,
                ref random_word,
            } => {
                buf.push(4);
                buf.extend_from_slice(&request_id.to_le_bytes());
                buf.extend_from_slice(random_word);
            }
        }
        buf
    }

    fn unpack_u16(input: &[u8]) -> Result<(u16, &[u8]), ProgramError> {
        let (bytes, rest) = Self::split_field(input, 2)?;
        Ok((u16::from_le_bytes(*array_ref![bytes, 0, 2]), rest))
    }

    fn unpack_u32(input: &[u8]) -> Result<(u32, &[u8]), ProgramError> {
        let (bytes, rest) = Self::split_field(input, 4)?;
        Ok((u32::from_le_bytes(*array_ref![bytes, 0, 4]), rest))
    }

    fn unpack_u64(input: &[u8]) -> Result<(u64, &[u8]), ProgramError> {
        let (bytes, rest) = Self::split_field(input, 8)?;
        Ok((u64::from_le_bytes(*array_ref![bytes, 0, 8]), rest))
    }

    fn unpack_bytes32(input: &[u8]) -> Result<([u8; 32], &[u8]), ProgramError> {
        let (bytes, rest) = Self::split_field(input, 32)?;
        Ok((*array_ref![bytes, 0, 32], rest))
    }

    fn split_field(input: &[u8], len: usize) -> Result<(&[u8], &[u8]), ProgramError> {
        if input.len() < len {
            return Err(ProgramError::InvalidInstructionData);
        }
        Ok(input.split_at(len))
    }
}

/// Create initialize_lottery instruction
#[allow(clippy::too_many_arguments)]
pub fn initialize_lottery(
    program_id: &Pubkey,
    authority: &Pubkey,
    lottery_account: &Pubkey,
    oracle: &Pubkey,
    entrance_fee: u64,
    interval: u64,
    max_participants: u32,
    oracle_params: OracleParams,
) -> Instruction {
    let data = LotteryInstruction::InitializeLottery {
        entrance_fee,
        interval,
        max_participants,
        oracle_params,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new(*authority, true),
        AccountMeta::new(*lottery_account, true),
        AccountMeta::new_readonly(*oracle, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

/// Create enter_lottery instruction
pub fn enter_lottery(
    program_id: &Pubkey,
    participant: &Pubkey,
    lottery_account: &Pubkey,
    amount: u64,
) -> Instruction {
    let data = LotteryInstruction::EnterLottery { amount }.pack();

    let accounts = vec![
        AccountMeta::new(*participant, true),
        AccountMeta::new(*lottery_account, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

/// Create check_upkeep instruction
pub fn check_upkeep(program_id: &Pubkey, lottery_account: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new_readonly(*lottery_account, false)],
        data: LotteryInstruction::CheckUpkeep {}.pack(),
    }
}

/// Create perform_upkeep instruction
pub fn perform_upkeep(program_id: &Pubkey, caller: &Pubkey, lottery_account: &Pubkey) -> Instruction {
    let accounts = vec![
        AccountMeta::new_readonly(*caller, true),
        AccountMeta::new(*lottery_account, false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data: LotteryInstruction::PerformUpkeep {}.pack(),
    }
}

/// Create fulfill_randomness instruction
pub fn fulfill_randomness(
    program_id: &Pubkey,
    oracle: &Pubkey,
    lottery_account: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    random_word: [u8; 32],
) -> Instruction {
    let data = LotteryInstruction::FulfillRandomness {
        request_id,
        random_word,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new_readonly(*oracle, true),
        AccountMeta::new(*lottery_account, false),
        AccountMeta::new(*winner, false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}
