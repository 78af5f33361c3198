//! Error types for predicty-core

use crate::market::{AccountId, MarketId, MarketStatus, Timestamp};
use crate::oracle::OracleError;
use thiserror::Error;

/// Result type alias for predicty operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Which reward or payout a withdrawal targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entitlement {
    Winnings,
    CreationReward,
    SettlementReward,
}

impl std::fmt::Display for Entitlement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Winnings => write!(f, "winnings"),
            Self::CreationReward => write!(f, "creation reward"),
            Self::SettlementReward => write!(f, "settlement reward"),
        }
    }
}

/// Error types for ledger operations.
///
/// Every variant is a guard failure: the call that produced it changed nothing.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The market's observed status does not allow the operation
    #[error("Lifecycle violation: cannot {operation} market {market_id} while it is {status}")]
    LifecycleViolation {
        market_id: MarketId,
        status: MarketStatus,
        operation: &'static str,
    },

    /// Settlement attempted before the market's settle time
    #[error("Premature settlement: market {market_id} cannot be settled before {settle_time} (now {now})")]
    PrematureSettlement {
        market_id: MarketId,
        settle_time: Timestamp,
        now: Timestamp,
    },

    /// Zero bet amount
    #[error("Invalid stake: bet amount must be greater than 0")]
    InvalidStake,

    /// Caller holds nothing to withdraw
    #[error("No entitlement: {account} has no {kind} to claim in market {market_id}")]
    NoEntitlement {
        market_id: MarketId,
        account: AccountId,
        kind: Entitlement,
    },

    /// Entitlement was already withdrawn
    #[error("Already claimed: {account} already claimed the {kind} of market {market_id}")]
    AlreadyClaimed {
        market_id: MarketId,
        account: AccountId,
        kind: Entitlement,
    },

    /// Owner-only action called by someone else
    #[error("Unauthorized: only the owner can {operation} (caller {caller})")]
    Unauthorized {
        caller: AccountId,
        operation: &'static str,
    },

    /// Market creation is paused by the owner
    #[error("Market creation is paused by the owner")]
    CreationPaused,

    /// Price reference failed or returned an unusable value
    #[error("Oracle failure: {0}")]
    OracleFailure(#[from] OracleError),

    /// No market with this id exists
    #[error("Unknown market: {0}")]
    UnknownMarket(MarketId),

    /// Checked arithmetic overflowed
    #[error("Arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),

    /// Configuration validation errors
    #[error("Invalid config: {0}")]
    Config(String),

    /// State file I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serde JSON errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LedgerError {
    /// Short stable name of the error category.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LifecycleViolation { .. } => "LifecycleViolation",
            Self::PrematureSettlement { .. } => "PrematureSettlement",
            Self::InvalidStake => "InvalidStake",
            Self::NoEntitlement { .. } => "NoEntitlement",
            Self::AlreadyClaimed { .. } => "AlreadyClaimed",
            Self::Unauthorized { .. } => "Unauthorized",
            Self::CreationPaused => "CreationPaused",
            Self::OracleFailure(_) => "OracleFailure",
            Self::UnknownMarket(_) => "UnknownMarket",
            Self::ArithmeticOverflow(_) => "ArithmeticOverflow",
            Self::Config(_) => "Config",
            Self::Io(_) => "Io",
            Self::Json(_) => "Json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_market() {
        let err = LedgerError::LifecycleViolation {
            market_id: 3,
            status: MarketStatus::InSettlement,
            operation: "place a bet on",
        };
        assert_eq!(
            err.to_string(),
            "Lifecycle violation: cannot place a bet on market 3 while it is InSettlement"
        );
        assert_eq!(err.kind(), "LifecycleViolation");
    }

    #[test]
    fn test_oracle_error_converts() {
        let err: LedgerError = OracleError::InvalidPrice(-5).into();
        assert_eq!(err.kind(), "OracleFailure");
        assert!(err.to_string().contains("-5"));
    }

    #[test]
    fn test_claim_errors_mention_entitlement() {
        let err = LedgerError::AlreadyClaimed {
            market_id: 1,
            account: AccountId::from("gambler4"),
            kind: Entitlement::CreationReward,
        };
        assert!(err.to_string().contains("creation reward"));
        assert!(err.to_string().contains("gambler4"));
    }
}
