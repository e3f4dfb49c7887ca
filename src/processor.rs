use crate::error::LotteryError;
use crate::events::LotteryEvent;
use crate::instruction::LotteryInstruction;
use crate::oracle::{LoggedRequestQueue, OracleParams};
use crate::state::{Lottery, LotteryConfig};
use crate::utils::{lamports_to_sol, LamportPayout};

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, set_return_data},
    program_error::ProgramError,
    program_pack::IsInitialized,
    pubkey::Pubkey,
    system_instruction, system_program,
    sysvar::{clock::Clock, rent::Rent, Sysvar},
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = LotteryInstruction::unpack(instruction_data)?;

        match instruction {
            LotteryInstruction::InitializeLottery {
                entrance_fee,
                interval,
                max_participants,
                oracle_params,
            } => {
                msg!("Instruction: Initialize Lottery");
                Self::process_initialize_lottery(
                    accounts,
                    entrance_fee,
                    interval,
                    max_participants,
                    oracle_params,
                    program_id,
                )
            }
            LotteryInstruction::EnterLottery { amount } => {
                msg!("Instruction: Enter Lottery");
                Self::process_enter_lottery(accounts, amount, program_id)
            }
            LotteryInstruction::CheckUpkeep {} => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(accounts, program_id)
            }
            LotteryInstruction::PerformUpkeep {} => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(accounts, program_id)
            }
            LotteryInstruction::FulfillRandomness {
                request_id,
                random_word,
            } => {
                msg!("Instruction: Fulfill Randomness");
                Self::process_fulfill_randomness(accounts, request_id, random_word, program_id)
            }
        }
    }

    /// Process the InitializeLottery instruction
    ///
    /// Creates the lottery account sized for `max_participants` and opens
    /// round 1 with the current time as the last reset.
    fn process_initialize_lottery(
        accounts: &[AccountInfo],
        entrance_fee: u64,
        interval: u64,
        max_participants: u32,
        oracle_params: OracleParams,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let oracle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !authority_info.is_signer {
            msg!("Authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        if *system_program_info.key != system_program::id() {
            return Err(ProgramError::IncorrectProgramId);
        }

        let interval = i64::try_from(interval).map_err(|_| {
            msg!("Interval {} is out of range", interval);
            ProgramError::InvalidArgument
        })?;
        if max_participants == 0 {
            msg!("Lottery needs room for at least one participant");
            return Err(ProgramError::InvalidArgument);
        }

        let space = Lottery::space(max_participants);
        if lottery_info.owner == program_id {
            if Lottery::unpack(&lottery_info.data.borrow())?.is_initialized() {
                msg!("Lottery account is already initialized");
                return Err(ProgramError::AccountAlreadyInitialized);
            }
            if lottery_info.data_len() < space {
                msg!("Lottery account needs {} bytes", space);
                return Err(ProgramError::AccountDataTooSmall);
            }
        } else {
            if !lottery_info.is_signer {
                msg!("New lottery account must sign the transaction");
                return Err(ProgramError::MissingRequiredSignature);
            }
            let rent = Rent::get()?;
            invoke(
                &system_instruction::create_account(
                    authority_info.key,
                    lottery_info.key,
                    rent.minimum_balance(space),
                    space as u64,
                    program_id,
                ),
                &[
                    authority_info.clone(),
                    lottery_info.clone(),
                    system_program_info.clone(),
                ],
            )?;
        }

        let clock = Clock::get()?;
        let config = LotteryConfig {
            entrance_fee,
            interval,
            max_participants,
            oracle: *oracle_info.key,
            oracle_params,
        };
        let lottery = Lottery::new(*authority_info.key, config, clock.unix_timestamp);
        lottery.save(lottery_info)?;

        msg!(
            "Lottery initialized: EntranceFee={} SOL, Interval={}s, Capacity={}, Oracle={}",
            lamports_to_sol(entrance_fee),
            interval,
            max_participants,
            oracle_info.key
        );
        Ok(())
    }

    /// Process the EnterLottery instruction
    fn process_enter_lottery(
        accounts: &[AccountInfo],
        amount: u64,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let participant_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !participant_info.is_signer {
            msg!("Participant must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let mut lottery = Lottery::load(lottery_info, program_id)?;
        lottery
            .enter(*participant_info.key, amount)
            .map_err(reject)?;

        invoke(
            &system_instruction::transfer(participant_info.key, lottery_info.key, amount),
            &[
                participant_info.clone(),
                lottery_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        lottery.save(lottery_info)?;

        LotteryEvent::EntryRecorded {
            round: lottery.round(),
            participant: *participant_info.key,
            amount,
        }
        .emit()?;
        msg!(
            "Entry {} recorded, pool is {} lamports",
            lottery.participant_count(),
            lottery.pool()
        );
        Ok(())
    }

    /// Process the CheckUpkeep instruction
    ///
    /// Read-only; the answer is the return data byte.
    fn process_check_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let lottery_info = next_account_info(account_info_iter)?;

        let lottery = Lottery::load(lottery_info, program_id)?;
        let clock = Clock::get()?;
        let check = lottery.upkeep_check(clock.unix_timestamp);

        msg!(
            "Upkeep: open={}, interval_elapsed={}, has_participants={}, has_balance={}",
            check.is_open,
            check.interval_elapsed,
            check.has_participants,
            check.has_balance
        );
        set_return_data(&[check.is_needed() as u8]);
        Ok(())
    }

    /// Process the PerformUpkeep instruction
    fn process_perform_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let caller_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;

        if !caller_info.is_signer {
            msg!("Upkeep caller must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let mut lottery = Lottery::load(lottery_info, program_id)?;
        let clock = Clock::get()?;
        let mut queue = LoggedRequestQueue::new(lottery.last_request_id());

        let request_id = lottery
            .perform_upkeep(clock.unix_timestamp, &mut queue)
            .map_err(reject)?;

        lottery.save(lottery_info)?;

        LotteryEvent::RandomnessRequested {
            round: lottery.round(),
            request_id,
        }
        .emit()?;
        Ok(())
    }

    /// Process the FulfillRandomness instruction
    ///
    /// Only the oracle named at initialization may call this. The winner
    /// account must be the participant selected by the random word.
    fn process_fulfill_randomness(
        accounts: &[AccountInfo],
        request_id: u64,
        random_word: [u8; 32],
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let oracle_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        if !oracle_info.is_signer {
            msg!("Oracle must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let mut lottery = Lottery::load(lottery_info, program_id)?;
        let clock = Clock::get()?;
        let mut payout = LamportPayout::new(lottery_info, winner_info);

        let settlement = lottery
            .fulfill(
                oracle_info.key,
                request_id,
                &random_word,
                clock.unix_timestamp,
                &mut payout,
            )
            .map_err(reject)?;

        lottery.save(lottery_info)?;

        LotteryEvent::WinnerPicked {
            round: settlement.round,
            winner: settlement.winner,
            prize: settlement.prize,
        }
        .emit()?;
        msg!(
            "Round {} won by {} (index {}), prize {} SOL",
            settlement.round,
            settlement.winner,
            settlement.winner_index,
            lamports_to_sol(settlement.prize)
        );
        Ok(())
    }
}

/// Log a lottery error with its context before handing it to the runtime.
fn reject(err: LotteryError) -> ProgramError {
    msg!("Error: {}", err);
    err.into()
}
