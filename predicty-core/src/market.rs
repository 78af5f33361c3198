//! # Market Records
//!
//! Data model of a single three-way price market: the outcome buckets, the
//! lifecycle status, the neutral price band and the per-account positions.

use crate::{config::BandInclusivity, LedgerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Value in the smallest indivisible unit.
pub type Amount = u128;

/// Oracle price as a scaled integer.
pub type Price = i64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Sequential market identifier, starting at 0.
pub type MarketId = u64;

/// Opaque identifier of a participant account.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the three mutually exclusive outcome buckets.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BetOption {
    Bullish = 0,
    Neutral = 1,
    Bearish = 2,
}

impl BetOption {
    pub const ALL: [BetOption; 3] = [BetOption::Bullish, BetOption::Neutral, BetOption::Bearish];

    /// Position of the option in per-option arrays.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BetOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bullish => "Bullish",
            Self::Neutral => "Neutral",
            Self::Bearish => "Bearish",
        };
        f.write_str(name)
    }
}

impl FromStr for BetOption {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullish" | "0" => Ok(Self::Bullish),
            "neutral" | "1" => Ok(Self::Neutral),
            "bearish" | "2" => Ok(Self::Bearish),
            other => Err(LedgerError::Config(format!(
                "unknown option '{other}': expected bullish, neutral or bearish"
            ))),
        }
    }
}

/// Lifecycle status. Variants are ordered so status can only grow.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MarketStatus {
    Live,
    InSettlement,
    Settled,
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Live => "Live",
            Self::InSettlement => "InSettlement",
            Self::Settled => "Settled",
        };
        f.write_str(name)
    }
}

/// Price interval classified as Neutral at settlement.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeutralBand {
    pub min: Price,
    pub max: Price,
}

impl NeutralBand {
    /// Band around a reference price. Saturates rather than wrapping.
    pub fn around(price: Price, below: Price, above: Price) -> Self {
        Self {
            min: price.saturating_sub(below),
            max: price.saturating_add(above),
        }
    }

    /// Classify a resolving price into its winning option.
    pub fn classify(&self, price: Price, inclusivity: BandInclusivity) -> BetOption {
        let (bearish, bullish) = match inclusivity {
            BandInclusivity::Inclusive => (price <= self.min, price >= self.max),
            BandInclusivity::Exclusive => (price < self.min, price > self.max),
        };
        if bearish {
            BetOption::Bearish
        } else if bullish {
            BetOption::Bullish
        } else {
            BetOption::Neutral
        }
    }
}

/// One account's stakes and winnings claim in a market.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Position {
    /// Net stake per option, indexed by [`BetOption::index`]
    pub staked: [Amount; 3],
    /// Set once winnings are withdrawn; stakes are never zeroed
    pub claimed_winnings: bool,
}

impl Position {
    pub fn staked_on(&self, option: BetOption) -> Amount {
        self.staked[option.index()]
    }
}

/// A single prediction market.
///
/// Time bounds, band and creator are fixed at creation. `settler`,
/// `winning_option` and `settlement_reward_amount` are written once, by the
/// settlement call.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Market {
    /// Sequential market identifier
    pub id: MarketId,

    /// Persisted status; only advanced by settlement
    pub status: MarketStatus,

    pub start_time: Timestamp,

    /// Bets are accepted strictly before this instant
    pub expire_time: Timestamp,

    /// Earliest instant settlement may sample the oracle
    pub settle_time: Timestamp,

    /// Price reported by the oracle when the market was created
    pub creation_price: Price,

    pub neutral_band: NeutralBand,

    pub creator: AccountId,

    pub settler: Option<AccountId>,

    /// Price sampled at settlement
    pub settlement_price: Option<Price>,

    pub winning_option: Option<BetOption>,

    /// Sum of all net stakes
    pub total_pool: Amount,

    /// Net stake per option
    pub option_totals: [Amount; 3],

    pub creation_reward_amount: Amount,
    pub creation_reward_claimed: bool,

    pub settlement_reward_amount: Amount,
    pub settlement_reward_claimed: bool,

    /// Positions keyed by account
    pub positions: BTreeMap<AccountId, Position>,
}

impl Market {
    /// Open a fresh Live market with empty pools.
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        id: MarketId,
        creator: AccountId,
        start_time: Timestamp,
        expire_time: Timestamp,
        settle_time: Timestamp,
        creation_price: Price,
        neutral_band: NeutralBand,
        creation_reward_amount: Amount,
    ) -> Self {
        Self {
            id,
            status: MarketStatus::Live,
            start_time,
            expire_time,
            settle_time,
            creation_price,
            neutral_band,
            creator,
            settler: None,
            settlement_price: None,
            winning_option: None,
            total_pool: 0,
            option_totals: [0; 3],
            creation_reward_amount,
            creation_reward_claimed: false,
            settlement_reward_amount: 0,
            settlement_reward_claimed: false,
            positions: BTreeMap::new(),
        }
    }

    /// Status as seen at `now`. A stored Live market past expiry reads as
    /// InSettlement without any state change.
    pub fn observed_status(&self, now: Timestamp) -> MarketStatus {
        match self.status {
            MarketStatus::Live if now >= self.expire_time => MarketStatus::InSettlement,
            status => status,
        }
    }

    /// Net stake accumulated on an option.
    pub fn option_total(&self, option: BetOption) -> Amount {
        self.option_totals[option.index()]
    }

    /// Net stake of `account` on `option`.
    pub fn amount_staked(&self, account: &AccountId, option: BetOption) -> Amount {
        self.positions
            .get(account)
            .map(|position| position.staked_on(option))
            .unwrap_or(0)
    }

    /// Whether `account` already withdrew winnings.
    pub fn claimed_winnings(&self, account: &AccountId) -> bool {
        self.positions
            .get(account)
            .map(|position| position.claimed_winnings)
            .unwrap_or(false)
    }

    /// Number of accounts holding a position.
    pub fn participant_count(&self) -> usize {
        self.positions.len()
    }

    /// Indicative payout multiplier for an option (pool / option total).
    pub fn odds(&self, option: BetOption) -> f64 {
        let option_total = self.option_total(option) as f64;
        if option_total == 0.0 {
            return 1.0;
        }
        self.total_pool as f64 / option_total
    }

    /// Human readable status summary.
    pub fn describe(&self, now: Timestamp) -> String {
        match self.observed_status(now) {
            MarketStatus::Settled => match self.winning_option {
                Some(option) => format!("Settled - {option} won"),
                None => "Settled - No outcome set".to_string(),
            },
            MarketStatus::InSettlement if now >= self.settle_time => {
                "Awaiting settlement".to_string()
            }
            MarketStatus::InSettlement => "Closed - settlement window not open yet".to_string(),
            MarketStatus::Live => "Live - Accepting bets".to_string(),
        }
    }
}
