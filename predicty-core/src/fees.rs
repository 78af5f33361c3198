//! # Commission and Payout Arithmetic
//!
//! Integer-only bookkeeping for stakes, commission and rewards. Every
//! percentage is floor-divided; the remainder of a commission split always
//! stays with the bettor's net stake so `net + commission == gross`.

use crate::{config::LedgerConfig, error::Result, market::Amount, LedgerError, BPS_DENOMINATOR};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Result of withholding commission from a gross bet.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeSplit {
    /// Amount credited to the option and the bettor's position
    pub net: Amount,
    /// Amount added to the commission balance
    pub commission: Amount,
}

/// Percentages applied by a ledger, in basis points.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSchedule {
    pub commission_bps: u32,
    pub creation_reward_bps: u32,
    pub settlement_reward_bps: u32,
}

impl From<&LedgerConfig> for FeeSchedule {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            commission_bps: config.commission_bps,
            creation_reward_bps: config.creation_reward_bps,
            settlement_reward_bps: config.settlement_reward_bps,
        }
    }
}

impl FeeSchedule {
    /// Withhold commission from a gross bet.
    pub fn split_stake(&self, gross: Amount) -> Result<StakeSplit> {
        let commission = apply_bps(gross, self.commission_bps, "bet commission")?;
        Ok(StakeSplit {
            net: gross - commission,
            commission,
        })
    }

    /// Creation reward granted from the commission balance at this instant.
    pub fn creation_reward(&self, commission_balance: Amount) -> Result<Amount> {
        apply_bps(commission_balance, self.creation_reward_bps, "creation reward")
    }

    /// Settlement reward granted from the commission balance at this instant.
    pub fn settlement_reward(&self, commission_balance: Amount) -> Result<Amount> {
        apply_bps(
            commission_balance,
            self.settlement_reward_bps,
            "settlement reward",
        )
    }
}

/// `amount * bps / 10_000`, floored.
pub fn apply_bps(amount: Amount, bps: u32, what: &'static str) -> Result<Amount> {
    amount
        .checked_mul(u128::from(bps))
        .map(|scaled| scaled / BPS_DENOMINATOR)
        .ok_or(LedgerError::ArithmeticOverflow(what))
}

/// Share of the pool owed to a winning stake.
///
/// Winners split the whole pool (their own stakes included) in proportion to
/// their stake on the winning option: `stake * total_pool / winning_total`.
/// The product is taken in 256 bits; the quotient fits back into an
/// [`Amount`] whenever `stake <= winning_total`.
pub fn winnings_share(stake: Amount, total_pool: Amount, winning_total: Amount) -> Result<Amount> {
    if winning_total == 0 {
        return Ok(0);
    }
    let share = U256::from(stake) * U256::from(total_pool) / U256::from(winning_total);
    if share.bits() > 128 {
        return Err(LedgerError::ArithmeticOverflow("winnings"));
    }
    Ok(share.low_u128())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ether;

    fn ten_percent() -> FeeSchedule {
        FeeSchedule::from(&LedgerConfig::default())
    }

    #[test]
    fn test_split_stake_ten_percent() {
        let split = ten_percent().split_stake(ether(2)).unwrap();
        assert_eq!(split.net, ether(18) / 10);
        assert_eq!(split.commission, ether(2) / 10);
    }

    #[test]
    fn test_split_stake_conserves_value() {
        let fees = ten_percent();
        for gross in [1u128, 7, 9, 10, 11, 999, 1_000_001, ether(3) + 7] {
            let split = fees.split_stake(gross).unwrap();
            assert_eq!(split.net + split.commission, gross);
        }
        // 9 wei at 10% floors the commission to 0
        assert_eq!(fees.split_stake(9).unwrap().commission, 0);
    }

    #[test]
    fn test_rewards_compound_down() {
        let fees = ten_percent();
        let mut balance = ether(81) / 1_000; // 0.081
        let settlement = fees.settlement_reward(balance).unwrap();
        assert_eq!(settlement, ether(81) / 10_000);
        balance -= settlement;
        assert_eq!(balance, ether(729) / 10_000);

        let creation = fees.creation_reward(balance).unwrap();
        assert_eq!(creation, ether(729) / 100_000);
        balance -= creation;
        assert_eq!(balance, ether(6561) / 100_000);
    }

    #[test]
    fn test_reward_floors() {
        assert_eq!(ten_percent().settlement_reward(19).unwrap(), 1);
        assert_eq!(ten_percent().creation_reward(9).unwrap(), 0);
    }

    #[test]
    fn test_winnings_share() {
        // two winners on 3, pool 10
        assert_eq!(winnings_share(1, 10, 3).unwrap(), 3);
        assert_eq!(winnings_share(2, 10, 3).unwrap(), 6);
        assert_eq!(winnings_share(5, 10, 0).unwrap(), 0);
        assert_eq!(winnings_share(ether(1), ether(8), ether(2)).unwrap(), ether(4));
    }

    #[test]
    fn test_winnings_share_with_large_stakes() {
        // 18 * 36 ether overflows u128 before the division
        assert_eq!(winnings_share(ether(18), ether(36), ether(18)).unwrap(), ether(36));
        assert_eq!(winnings_share(ether(20), ether(36), ether(20)).unwrap(), ether(36));
        assert_eq!(
            winnings_share(ether(1_000), ether(9_000), ether(3_000)).unwrap(),
            ether(3_000)
        );
        assert_eq!(
            winnings_share(u128::MAX, u128::MAX, u128::MAX).unwrap(),
            u128::MAX
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        // only reachable when the stake exceeds the winning total
        let err = winnings_share(u128::MAX, 2, 1).unwrap_err();
        assert!(matches!(err, LedgerError::ArithmeticOverflow("winnings")));
        assert!(apply_bps(u128::MAX, 2, "x").is_err());
    }
}
