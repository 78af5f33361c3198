//! # Predicty Core
//!
//! Settlement engine for three-way price prediction markets.
//!
//! Participants stake on one of three mutually exclusive outcomes for a future
//! price observation:
//! - **Bullish**: the price ends at or above the neutral band
//! - **Neutral**: the price ends inside the band
//! - **Bearish**: the price ends at or below the band
//!
//! At expiry an external price oracle resolves the market and the winners split
//! the whole pool in proportion to their stakes. A commission withheld from
//! every bet funds rewards for the accounts that create and settle markets.
//!
//! ## Features
//!
//! - **Serial Markets**: one current market at a time, ids assigned from 0
//! - **Lazy Lifecycle**: Live markets read as InSettlement once expired
//! - **Commission Bookkeeping**: integer-only, floor-divided percentages
//! - **Keeper Rewards**: point-in-time shares of the commission balance
//! - **Event Log**: content-addressed, append-only record of every transition
//!
//! ## Examples
//!
//! ```rust
//! use predicty_core::{BetOption, CallContext, FixedPriceOracle, LedgerConfig, MarketLedger};
//!
//! let oracle = FixedPriceOracle::new("eth-usd", 2_000_00000000);
//! let mut ledger = MarketLedger::new(
//!     LedgerConfig::default(),
//!     "owner".into(),
//!     Box::new(oracle),
//!     1_735_689_600,
//! )?;
//!
//! let ctx = CallContext::new("alice", 1_735_689_660);
//! ledger.place_bet(&ctx, BetOption::Bullish, 2_000_000_000_000_000_000)?;
//! assert_eq!(ledger.commission_amount(), 200_000_000_000_000_000);
//! Ok::<(), predicty_core::LedgerError>(())
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod fees;
pub mod ledger;
pub mod market;
pub mod oracle;
pub mod store;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{BandInclusivity, LedgerConfig};
pub use error::{Entitlement, LedgerError, Result};
pub use events::{EventLog, EventRecord, LedgerEvent};
pub use fees::{FeeSchedule, StakeSplit};
pub use ledger::{CallContext, LedgerState, MarketLedger, Payout, RewardsRow};
pub use market::{
    AccountId, Amount, BetOption, Market, MarketId, MarketStatus, NeutralBand, Position, Price,
    Timestamp,
};
pub use oracle::{FeedFileOracle, FixedPriceOracle, OracleError, PriceOracle};
pub use utils::*;

/// Denominator of basis-point percentages
pub const BPS_DENOMINATOR: u128 = 10_000;
