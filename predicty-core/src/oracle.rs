//! # Price Oracle
//!
//! The price reference is an external capability. The ledger asks it for the
//! current price exactly twice per market: once at creation to place the
//! neutral band and once at settlement to resolve the outcome.

use crate::market::Price;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a price reference.
#[derive(Error, Debug)]
pub enum OracleError {
    /// The feed answered with a value that cannot be a price
    #[error("invalid price {0}: prices must be positive")]
    InvalidPrice(Price),

    /// The feed could not be reached or read
    #[error("price feed {address} unavailable: {reason}")]
    Unavailable { address: String, reason: String },
}

/// Capability returning the latest price of the tracked asset.
pub trait PriceOracle {
    /// Identifier of the feed, recorded in the ledger state.
    fn address(&self) -> &str;

    /// Latest price as a scaled integer.
    fn current_price(&self) -> Result<Price, OracleError>;
}

impl<T: PriceOracle + ?Sized> PriceOracle for Box<T> {
    fn address(&self) -> &str {
        (**self).address()
    }

    fn current_price(&self) -> Result<Price, OracleError> {
        (**self).current_price()
    }
}

/// Query an oracle and reject non-positive answers.
pub fn fetch_price(oracle: &dyn PriceOracle) -> Result<Price, OracleError> {
    let price = oracle.current_price()?;
    if price <= 0 {
        return Err(OracleError::InvalidPrice(price));
    }
    Ok(price)
}

/// Oracle that always answers the same price.
#[derive(Debug, Clone)]
pub struct FixedPriceOracle {
    address: String,
    price: Price,
}

impl FixedPriceOracle {
    pub fn new(address: impl Into<String>, price: Price) -> Self {
        Self {
            address: address.into(),
            price,
        }
    }
}

impl PriceOracle for FixedPriceOracle {
    fn address(&self) -> &str {
        &self.address
    }

    fn current_price(&self) -> Result<Price, OracleError> {
        Ok(self.price)
    }
}

/// On-disk price feed document.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceFeed {
    /// Latest answer, scaled by the ledger's price decimals
    pub price: Price,
}

/// Oracle reading a JSON price feed (`{"price": 200012345678}`) from a file.
///
/// The file is read on every query, so an operator can update the feed
/// between market creation and settlement.
#[derive(Debug, Clone)]
pub struct FeedFileOracle {
    path: PathBuf,
    address: String,
}

impl FeedFileOracle {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let address = path.display().to_string();
        Self { path, address }
    }

    /// Write a feed document to `path`.
    pub fn publish(path: impl AsRef<Path>, price: Price) -> std::io::Result<()> {
        let body = serde_json::to_string_pretty(&PriceFeed { price })?;
        std::fs::write(path, body)
    }

    fn unavailable(&self, reason: impl std::fmt::Display) -> OracleError {
        OracleError::Unavailable {
            address: self.address.clone(),
            reason: reason.to_string(),
        }
    }
}

impl PriceOracle for FeedFileOracle {
    fn address(&self) -> &str {
        &self.address
    }

    fn current_price(&self) -> Result<Price, OracleError> {
        let body = std::fs::read_to_string(&self.path).map_err(|e| self.unavailable(e))?;
        let feed: PriceFeed = serde_json::from_str(&body).map_err(|e| self.unavailable(e))?;
        Ok(feed.price)
    }
}
