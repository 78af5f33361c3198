//! # Event Log
//!
//! Append-only record of every committed ledger transition. Each record is
//! content-addressed: its id is the SHA-256 of the canonical JSON array
//! `[sequence, timestamp, event]`.

use crate::market::{AccountId, Amount, BetOption, MarketId, Price, Timestamp};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Outcome of a successful state-changing call.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    BetPlaced {
        market_id: MarketId,
        bettor: AccountId,
        option: BetOption,
        net_amount: Amount,
        commission: Amount,
    },
    ResultPosted {
        market_id: MarketId,
        winning_option: BetOption,
        settler: AccountId,
        settlement_price: Price,
        settlement_reward: Amount,
    },
    NewMarketCreated {
        market_id: MarketId,
        creator: AccountId,
        creation_reward: Amount,
    },
    WinningsClaimed {
        market_id: MarketId,
        account: AccountId,
        amount: Amount,
    },
    CreationRewardClaimed {
        market_id: MarketId,
        account: AccountId,
        amount: Amount,
    },
    SettlementRewardClaimed {
        market_id: MarketId,
        account: AccountId,
        amount: Amount,
    },
    MarketCreationPaused {
        by: AccountId,
    },
    MarketCreationResumed {
        by: AccountId,
    },
    OracleUpdated {
        previous: String,
        current: String,
    },
}

impl LedgerEvent {
    /// Market the event refers to, if any.
    pub fn market_id(&self) -> Option<MarketId> {
        match self {
            Self::BetPlaced { market_id, .. }
            | Self::ResultPosted { market_id, .. }
            | Self::NewMarketCreated { market_id, .. }
            | Self::WinningsClaimed { market_id, .. }
            | Self::CreationRewardClaimed { market_id, .. }
            | Self::SettlementRewardClaimed { market_id, .. } => Some(*market_id),
            Self::MarketCreationPaused { .. }
            | Self::MarketCreationResumed { .. }
            | Self::OracleUpdated { .. } => None,
        }
    }

    /// Event name as listeners know it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BetPlaced { .. } => "BetPlaced",
            Self::ResultPosted { .. } => "ResultPosted",
            Self::NewMarketCreated { .. } => "NewMarketCreated",
            Self::WinningsClaimed { .. } => "WinningsClaimed",
            Self::CreationRewardClaimed { .. } => "CreationRewardClaimed",
            Self::SettlementRewardClaimed { .. } => "SettlementRewardClaimed",
            Self::MarketCreationPaused { .. } => "MarketCreationPaused",
            Self::MarketCreationResumed { .. } => "MarketCreationResumed",
            Self::OracleUpdated { .. } => "OracleUpdated",
        }
    }
}

/// An event with its position in the log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    pub sequence: u64,
    pub timestamp: Timestamp,
    /// Hex SHA-256 content address
    pub id: String,
    pub event: LedgerEvent,
}

/// Compute the content address of an event at a given log position.
pub fn event_id(sequence: u64, timestamp: Timestamp, event: &LedgerEvent) -> String {
    let mut hasher = Sha256::new();
    let to_serialize = (sequence, timestamp, event);
    // plain data with string keys, serialising into a hasher cannot fail
    serde_json::to_writer(&mut hasher, &to_serialize)
        .expect("ledger events always serialise to JSON");
    hex::encode(hasher.finalize())
}

/// Append-only list of records.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return the stored record.
    pub fn append(&mut self, timestamp: Timestamp, event: LedgerEvent) -> EventRecord {
        let sequence = self.records.len() as u64;
        let record = EventRecord {
            sequence,
            timestamp,
            id: event_id(sequence, timestamp, &event),
            event,
        };
        self.records.push(record.clone());
        record
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records concerning one market, in log order.
    pub fn for_market(&self, market_id: MarketId) -> impl Iterator<Item = &EventRecord> {
        self.records
            .iter()
            .filter(move |record| record.event.market_id() == Some(market_id))
    }

    /// Recompute every id and check sequences are contiguous.
    pub fn verify(&self) -> bool {
        self.records.iter().enumerate().all(|(index, record)| {
            record.sequence == index as u64
                && record.id == event_id(record.sequence, record.timestamp, &record.event)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::account;

    fn bet(market_id: MarketId) -> LedgerEvent {
        LedgerEvent::BetPlaced {
            market_id,
            bettor: account("gambler1"),
            option: BetOption::Bullish,
            net_amount: 180,
            commission: 20,
        }
    }

    #[test]
    fn test_append_assigns_sequence_and_id() {
        let mut log = EventLog::new();
        let first = log.append(100, bet(0));
        let second = log.append(100, bet(0));

        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
        assert_eq!(first.id.len(), 64);
        assert!(first.id.chars().all(|c| c.is_ascii_hexdigit()));
        // same payload at another position hashes differently
        assert_ne!(first.id, second.id);
        assert_eq!(log.len(), 2);
        assert!(log.verify());
    }

    #[test]
    fn test_event_id_is_deterministic() {
        let id_one = event_id(3, 1_735_689_600, &bet(1));
        let id_two = event_id(3, 1_735_689_600, &bet(1));
        assert_eq!(id_one, id_two);
    }

    #[test]
    fn test_event_id_hashes_canonical_json() {
        let event = bet(2);
        let json = serde_json::to_string(&(5u64, 1_735_689_600u64, &event)).unwrap();
        let expected = hex::encode(Sha256::digest(json.as_bytes()));
        assert_eq!(event_id(5, 1_735_689_600, &event), expected);

        // the empty-input digest never stands in for an event
        let empty = hex::encode(Sha256::digest(b""));
        assert_ne!(event_id(5, 1_735_689_600, &event), empty);
    }

    #[test]
    fn test_tampering_is_detected() {
        let mut log = EventLog::new();
        log.append(1, bet(0));
        log.append(2, bet(1));

        let mut json = serde_json::to_value(&log).unwrap();
        json[1]["event"]["BetPlaced"]["net_amount"] = serde_json::json!(999);
        let tampered: EventLog = serde_json::from_value(json).unwrap();
        assert!(!tampered.verify());
    }

    #[test]
    fn test_for_market_filters() {
        let mut log = EventLog::new();
        log.append(1, bet(0));
        log.append(
            2,
            LedgerEvent::MarketCreationPaused {
                by: account("owner"),
            },
        );
        log.append(3, bet(1));
        log.append(4, bet(0));

        let sequences: Vec<u64> = log.for_market(0).map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![0, 3]);
        assert_eq!(log.records()[1].event.name(), "MarketCreationPaused");
        assert_eq!(log.records()[1].event.market_id(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(bet(7)).unwrap();
        assert_eq!(json["BetPlaced"]["market_id"], 7);
        assert_eq!(json["BetPlaced"]["bettor"], "gambler1");
        assert_eq!(json["BetPlaced"]["option"], "Bullish");
    }
}
