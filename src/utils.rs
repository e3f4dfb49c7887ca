// Lottery program - payout and display helpers
use solana_program::{account_info::AccountInfo, msg, pubkey::Pubkey};

use crate::{error::LotteryError, lottery::PrizeTransfer};

/// Pays the prize straight out of the program-owned lottery account.
pub struct LamportPayout<'a, 'info> {
    vault: &'a AccountInfo<'info>,
    recipient: &'a AccountInfo<'info>,
}

impl<'a, 'info> LamportPayout<'a, 'info> {
    pub fn new(vault: &'a AccountInfo<'info>, recipient: &'a AccountInfo<'info>) -> Self {
        Self { vault, recipient }
    }
}

impl PrizeTransfer for LamportPayout<'_, '_> {
    fn transfer(&mut self, winner: &Pubkey, amount: u64) -> Result<(), LotteryError> {
        if self.recipient.key != winner {
            msg!("Prize recipient {} is not the winner {}", self.recipient.key, winner);
            return Err(LotteryError::PayoutFailed);
        }
        if !self.recipient.is_writable || self.recipient.key == self.vault.key {
            msg!("Prize recipient must be a separate writable account");
            return Err(LotteryError::PayoutFailed);
        }

        let vault_balance = self.vault.lamports().checked_sub(amount).ok_or_else(|| {
            msg!("Lottery account holds less than the pool");
            LotteryError::PayoutFailed
        })?;
        let recipient_balance = self
            .recipient
            .lamports()
            .checked_add(amount)
            .ok_or(LotteryError::PayoutFailed)?;

        **self
            .vault
            .try_borrow_mut_lamports()
            .map_err(|_| LotteryError::PayoutFailed)? = vault_balance;
        **self
            .recipient
            .try_borrow_mut_lamports()
            .map_err(|_| LotteryError::PayoutFailed)? = recipient_balance;
        Ok(())
    }
}

/// Convert lamports to SOL (for display purposes)
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / 1_000_000_000.0
}
