//! # Ledger Configuration
//!
//! Tunable parameters of the settlement engine. All percentages are expressed
//! in basis points (1/100 of a percent) and applied with floor division.

use crate::{
    error::Result,
    market::{Price, Timestamp},
    LedgerError, BPS_DENOMINATOR,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a resolving price exactly on a band edge is classified.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BandInclusivity {
    /// `price <= min` is Bearish and `price >= max` is Bullish
    #[default]
    Inclusive,
    /// Prices on either edge count as Neutral
    Exclusive,
}

/// Parameters that govern every market created by a ledger.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Seconds a market accepts bets after it starts
    pub market_duration_secs: Timestamp,

    /// Seconds between expiry and the earliest allowed settlement
    pub settlement_delay_secs: Timestamp,

    /// Commission withheld from every gross bet
    pub commission_bps: u32,

    /// Share of the commission balance granted to a market's creator
    pub creation_reward_bps: u32,

    /// Share of the commission balance granted to a market's settler
    pub settlement_reward_bps: u32,

    /// Distance below the creation price where the neutral band starts
    pub neutral_offset_below: Price,

    /// Distance above the creation price where the neutral band ends
    pub neutral_offset_above: Price,

    /// Edge handling for the neutral band
    pub band_inclusivity: BandInclusivity,

    /// Decimals of the value unit, for display and parsing only
    pub amount_decimals: u32,

    /// Decimals of oracle prices, for display and parsing only
    pub price_decimals: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            market_duration_secs: 3600,
            settlement_delay_secs: 0,
            commission_bps: 1_000,
            creation_reward_bps: 1_000,
            settlement_reward_bps: 1_000,
            neutral_offset_below: 10_00000000,
            neutral_offset_above: 10_00000000,
            band_inclusivity: BandInclusivity::Inclusive,
            amount_decimals: 18,
            price_decimals: 8,
        }
    }
}

impl LedgerConfig {
    /// Profile of the first deployment: 1% commission and a settlement window
    /// as long as the betting window.
    pub fn reference() -> Self {
        Self {
            commission_bps: 100,
            settlement_delay_secs: 3600,
            ..Self::default()
        }
    }

    /// Load and validate a JSON config file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let body = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&body)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the ledger cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.market_duration_secs == 0 {
            return Err(LedgerError::Config(
                "market_duration_secs must be greater than 0".to_string(),
            ));
        }

        for (name, bps) in [
            ("commission_bps", self.commission_bps),
            ("creation_reward_bps", self.creation_reward_bps),
            ("settlement_reward_bps", self.settlement_reward_bps),
        ] {
            if u128::from(bps) > BPS_DENOMINATOR {
                return Err(LedgerError::Config(format!(
                    "{name} must be at most {BPS_DENOMINATOR}, got {bps}"
                )));
            }
        }

        if self.neutral_offset_below < 0 || self.neutral_offset_above < 0 {
            return Err(LedgerError::Config(
                "neutral band offsets must not be negative".to_string(),
            ));
        }

        if self.amount_decimals > 30 || self.price_decimals > 18 {
            return Err(LedgerError::Config(format!(
                "unsupported decimals: amount {} price {}",
                self.amount_decimals, self.price_decimals
            )));
        }

        Ok(())
    }
}
