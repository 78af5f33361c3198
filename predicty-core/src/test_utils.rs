//! Common test utilities for predicty-core tests.
//!
//! Shared fixtures: amount helpers, a controllable oracle and ledger builders.

use crate::config::LedgerConfig;
use crate::ledger::{CallContext, MarketLedger};
use crate::market::{AccountId, Amount, Market, NeutralBand, Price, Timestamp};
use crate::oracle::{OracleError, PriceOracle};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

/// 2025-01-01 00:00:00 UTC
pub const START: Timestamp = 1_735_689_600;

/// 2000.00000000 at 8 price decimals
pub const PRICE: Price = 2_000_00000000;

/// `n` whole units at 18 decimals.
pub fn ether(n: u128) -> Amount {
    n * 1_000_000_000_000_000_000
}

pub fn account(name: &str) -> AccountId {
    AccountId::from(name)
}

pub fn ctx(name: &str, now: Timestamp) -> CallContext {
    CallContext::new(name, now)
}

/// A Live market created by "owner" around [`PRICE`].
pub fn open_market(start: Timestamp, duration: Timestamp, delay: Timestamp) -> Market {
    Market::open(
        0,
        account("owner"),
        start,
        start + duration,
        start + duration + delay,
        PRICE,
        NeutralBand::around(PRICE, 10_00000000, 10_00000000),
        0,
    )
}

/// Oracle whose answer and availability tests can change after handing it to
/// a ledger. Clones share state.
#[derive(Clone, Debug)]
pub struct MockOracle {
    address: String,
    price: Arc<AtomicI64>,
    failing: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockOracle {
    pub fn new(price: Price) -> Self {
        Self::with_address("mock-feed", price)
    }

    pub fn with_address(address: &str, price: Price) -> Self {
        Self {
            address: address.to_string(),
            price: Arc::new(AtomicI64::new(price)),
            failing: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_price(&self, price: Price) {
        self.price.store(price, Ordering::SeqCst);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of price queries answered or refused so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PriceOracle for MockOracle {
    fn address(&self) -> &str {
        &self.address
    }

    fn current_price(&self) -> Result<Price, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(OracleError::Unavailable {
                address: self.address.clone(),
                reason: "feed offline".to_string(),
            });
        }
        Ok(self.price.load(Ordering::SeqCst))
    }
}

/// Ledger owned by "owner", started at [`START`] with the oracle at [`PRICE`].
pub fn ledger_with(config: LedgerConfig) -> (MarketLedger, MockOracle) {
    let oracle = MockOracle::new(PRICE);
    let ledger = MarketLedger::new(config, account("owner"), Box::new(oracle.clone()), START)
        .expect("test ledger");
    (ledger, oracle)
}
