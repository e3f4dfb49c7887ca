use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    entrypoint::ProgramResult, log::sol_log_data, msg, program_error::ProgramError, pubkey::Pubkey,
};

/// Prefix of every event record in the program log
pub const EVENT_TAG: &[u8] = b"lottery:event";

/// Structured notifications for indexers and off-chain collaborators
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum LotteryEvent {
    EntryRecorded {
        round: u64,
        participant: Pubkey,
        amount: u64,
    },
    RandomnessRequested {
        round: u64,
        request_id: u64,
    },
    WinnerPicked {
        round: u64,
        winner: Pubkey,
        prize: u64,
    },
}

impl LotteryEvent {
    pub fn emit(&self) -> ProgramResult {
        let data = self
            .try_to_vec()
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
        msg!("{:?}", self);
        sol_log_data(&[EVENT_TAG, &data]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_tag_leads_the_record() {
        let event = LotteryEvent::WinnerPicked {
            round: 3,
            winner: Pubkey::new_unique(),
            prize: 20,
        };
        let data = event.try_to_vec().unwrap();
        assert_eq!(data[0], 2);
        assert_eq!(data.len(), 1 + 8 + 32 + 8);
        assert!(event.emit().is_ok());
    }
}
