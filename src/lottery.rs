//! Round state machine.
//!
//! `Open --perform_upkeep--> Closing --fulfill--> Open`. Every operation
//! validates first and mutates last, so a returned error leaves the lottery
//! exactly as it was.

use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};

use crate::{
    error::LotteryError,
    oracle::{self, RandomnessOracle},
    state::{Lottery, LotteryStatus, PendingRequest},
};

/// Moves the pool to the winner during fulfillment.
pub trait PrizeTransfer {
    fn transfer(&mut self, winner: &Pubkey, amount: u64) -> Result<(), LotteryError>;
}

/// The four conditions that make a round eligible to close.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpkeepCheck {
    pub is_open: bool,
    pub interval_elapsed: bool,
    pub has_participants: bool,
    pub has_balance: bool,
}

impl UpkeepCheck {
    pub fn is_needed(&self) -> bool {
        self.is_open && self.interval_elapsed && self.has_participants && self.has_balance
    }
}

/// Outcome of a draw, staged before any funds move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub request_id: u64,
    pub round: u64,
    pub winner_index: u64,
    pub winner: Pubkey,
    pub prize: u64,
    next_round: u64,
}

impl Lottery {
    /// Record one entry. A participant may enter any number of times.
    pub fn enter(&mut self, participant: Pubkey, amount: u64) -> Result<(), LotteryError> {
        if amount < self.entrance_fee {
            return Err(LotteryError::InsufficientPayment);
        }
        if self.status != LotteryStatus::Open {
            return Err(LotteryError::LotteryNotOpen);
        }
        if self.participants.len() >= self.max_participants as usize {
            return Err(LotteryError::LotteryFull);
        }
        let pool = self
            .pool
            .checked_add(amount)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        self.participants.push(participant);
        self.pool = pool;
        Ok(())
    }

    pub fn upkeep_check(&self, now: UnixTimestamp) -> UpkeepCheck {
        UpkeepCheck {
            is_open: self.status == LotteryStatus::Open,
            interval_elapsed: now.saturating_sub(self.last_closed_at) >= self.interval,
            has_participants: !self.participants.is_empty(),
            has_balance: self.pool > 0,
        }
    }

    /// Whether the round may close at `now`. Read-only.
    pub fn check_upkeep(&self, now: UnixTimestamp) -> bool {
        self.upkeep_check(now).is_needed()
    }

    /// Close the round and ask the oracle for randomness.
    ///
    /// Re-evaluates eligibility itself; while a request is pending the round
    /// is `Closing`, so a second call always fails with `UpkeepNotNeeded`.
    pub fn perform_upkeep<O: RandomnessOracle>(
        &mut self,
        now: UnixTimestamp,
        oracle: &mut O,
    ) -> Result<u64, LotteryError> {
        if !self.check_upkeep(now) {
            return Err(LotteryError::UpkeepNotNeeded {
                pool: self.pool,
                participant_count: self.participant_count(),
                status: self.status,
            });
        }

        let request_id = oracle.request_randomness(&self.oracle_params)?;

        self.status = LotteryStatus::Closing;
        self.last_request_id = request_id;
        self.pending_request = Some(PendingRequest {
            request_id,
            round: self.round,
            requested_at: now,
        });
        Ok(request_id)
    }

    pub fn authorize_oracle(&self, caller: &Pubkey) -> Result<(), LotteryError> {
        if *caller != self.oracle {
            return Err(LotteryError::UnauthorizedOracle);
        }
        Ok(())
    }

    /// Pick the winner for the pending request without touching state.
    pub fn draw(&self, request_id: u64, random_word: &[u8; 32]) -> Result<Settlement, LotteryError> {
        let pending = match self.pending_request {
            Some(pending) if pending.request_id == request_id => pending,
            _ => return Err(LotteryError::UnknownRequest),
        };

        let winner_index = oracle::winner_index(random_word, self.participant_count());
        let winner = *self
            .participants
            .get(winner_index as usize)
            .ok_or(LotteryError::EmptyRound)?;
        let next_round = pending
            .round
            .checked_add(1)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        Ok(Settlement {
            request_id,
            round: pending.round,
            winner_index,
            winner,
            prize: self.pool,
            next_round,
        })
    }

    /// Oracle callback: draw, pay out, then reset for the next round.
    ///
    /// If the payout fails nothing is committed and the request stays
    /// pending.
    pub fn fulfill<T: PrizeTransfer>(
        &mut self,
        caller: &Pubkey,
        request_id: u64,
        random_word: &[u8; 32],
        now: UnixTimestamp,
        payout: &mut T,
    ) -> Result<Settlement, LotteryError> {
        self.authorize_oracle(caller)?;
        let settlement = self.draw(request_id, random_word)?;

        payout.transfer(&settlement.winner, settlement.prize)?;

        self.recent_winner = Some(settlement.winner);
        self.participants.clear();
        self.pool = 0;
        self.last_closed_at = now;
        self.status = LotteryStatus::Open;
        self.pending_request = None;
        self.round = settlement.next_round;
        Ok(settlement)
    }
}
