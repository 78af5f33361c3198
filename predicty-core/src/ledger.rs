//! # Market Ledger
//!
//! The settlement engine. Owns the history of markets, the commission balance
//! and every entitlement, and exposes the operations participants call.
//!
//! Each operation validates all of its guards and computes every new value
//! before writing anything, so a call either commits completely and appends
//! one event, or fails and leaves the state untouched. Withdrawals mark the
//! entitlement claimed before custody is debited and the payout is handed back.

use crate::{
    config::LedgerConfig,
    error::{Entitlement, Result},
    events::{EventLog, EventRecord, LedgerEvent},
    fees::{winnings_share, FeeSchedule},
    market::{
        AccountId, Amount, BetOption, Market, MarketId, MarketStatus, NeutralBand, Price,
        Timestamp,
    },
    oracle::{fetch_price, PriceOracle},
    LedgerError,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Who is calling and when.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: AccountId,
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(caller: impl Into<AccountId>, now: Timestamp) -> Self {
        Self {
            caller: caller.into(),
            now,
        }
    }
}

/// Funds released by a successful withdrawal.
///
/// The ledger has already marked the entitlement claimed and debited custody;
/// the caller's environment performs the transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payout {
    pub recipient: AccountId,
    pub amount: Amount,
    pub receipt: EventRecord,
}

/// Per-market entitlements of one account.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RewardsRow {
    pub market_id: MarketId,
    pub start_time: Timestamp,
    pub settle_time: Timestamp,
    pub winning_option: Option<BetOption>,
    pub winnings: Amount,
    pub claimed_winnings: bool,
    pub creation_reward: Amount,
    pub claimed_creation_reward: bool,
    pub settlement_reward: Amount,
    pub claimed_settlement_reward: bool,
}

/// All authoritative state of a ledger.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LedgerState {
    pub config: LedgerConfig,

    pub owner: AccountId,

    /// Address of the price feed in use
    pub oracle_address: String,

    /// Id of the current (most recent) market
    pub market_count: MarketId,

    /// Collected commission not yet granted as rewards
    pub commission_amount: Amount,

    pub market_creation_paused: bool,

    /// Gross value held: stakes, commission and reserved rewards not yet paid out
    pub custody_balance: Amount,

    pub markets: BTreeMap<MarketId, Market>,

    pub events: EventLog,
}

/// Prediction market settlement engine.
pub struct MarketLedger {
    state: LedgerState,
    oracle: Box<dyn PriceOracle>,
}

impl std::fmt::Debug for MarketLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketLedger")
            .field("state", &self.state)
            .field("oracle", &self.oracle.address())
            .finish()
    }
}

impl MarketLedger {
    /// Create a ledger and open market #0, created by the owner.
    ///
    /// The oracle is queried once to place the first market's neutral band.
    pub fn new(
        config: LedgerConfig,
        owner: AccountId,
        oracle: Box<dyn PriceOracle>,
        now: Timestamp,
    ) -> Result<Self> {
        config.validate()?;

        let price = fetch_price(oracle.as_ref())?;
        let market = open_market(&config, 0, owner.clone(), now, price, 0)?;

        let mut events = EventLog::new();
        events.append(
            now,
            LedgerEvent::NewMarketCreated {
                market_id: 0,
                creator: owner.clone(),
                creation_reward: 0,
            },
        );

        info!(
            owner = %owner,
            oracle = oracle.address(),
            price,
            expire_time = market.expire_time,
            "ledger initialized"
        );

        let mut markets = BTreeMap::new();
        markets.insert(0, market);

        Ok(Self {
            state: LedgerState {
                oracle_address: oracle.address().to_string(),
                config,
                owner,
                market_count: 0,
                commission_amount: 0,
                market_creation_paused: false,
                custody_balance: 0,
                markets,
                events,
            },
            oracle,
        })
    }

    /// Rebuild a ledger from persisted state.
    pub fn restore(state: LedgerState, oracle: Box<dyn PriceOracle>) -> Result<Self> {
        state.config.validate()?;
        if !state.markets.contains_key(&state.market_count) {
            return Err(LedgerError::UnknownMarket(state.market_count));
        }
        if oracle.address() != state.oracle_address {
            warn!(
                recorded = %state.oracle_address,
                supplied = oracle.address(),
                "restoring ledger with a different oracle than recorded"
            );
        }
        Ok(Self { state, oracle })
    }

    /// Read-only view of the authoritative state.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Consume the ledger, returning its state for persistence.
    pub fn into_state(self) -> LedgerState {
        self.state
    }

    // ---------------------------------------------------------------------
    // Operations
    // ---------------------------------------------------------------------

    /// Stake `amount` (gross) on `option` in the current market.
    ///
    /// Commission is withheld and added to the global balance; the net amount
    /// is credited to the option total and the caller's position.
    pub fn place_bet(
        &mut self,
        ctx: &CallContext,
        option: BetOption,
        amount: Amount,
    ) -> Result<EventRecord> {
        self.apply_bet(ctx, option, amount)
            .inspect_err(|err| log_rejection("place_bet", ctx, err))
    }

    /// Resolve the current market from the oracle price.
    pub fn settle_market(&mut self, ctx: &CallContext) -> Result<EventRecord> {
        self.apply_settlement(ctx)
            .inspect_err(|err| log_rejection("settle_market", ctx, err))
    }

    /// Open the next market once the current one is settled.
    pub fn create_new_market(&mut self, ctx: &CallContext) -> Result<EventRecord> {
        self.apply_creation(ctx)
            .inspect_err(|err| log_rejection("create_new_market", ctx, err))
    }

    /// Pay out the caller's share of a settled market's pool.
    pub fn withdraw_winnings(&mut self, ctx: &CallContext, market_id: MarketId) -> Result<Payout> {
        self.apply_winnings_claim(ctx, market_id)
            .inspect_err(|err| log_rejection("withdraw_winnings", ctx, err))
    }

    /// Pay out the creation reward reserved for the market's creator.
    pub fn withdraw_creation_reward(
        &mut self,
        ctx: &CallContext,
        market_id: MarketId,
    ) -> Result<Payout> {
        self.apply_reward_claim(ctx, market_id, Entitlement::CreationReward)
            .inspect_err(|err| log_rejection("withdraw_creation_reward", ctx, err))
    }

    /// Pay out the settlement reward reserved for the market's settler.
    pub fn withdraw_settlement_reward(
        &mut self,
        ctx: &CallContext,
        market_id: MarketId,
    ) -> Result<Payout> {
        self.apply_reward_claim(ctx, market_id, Entitlement::SettlementReward)
            .inspect_err(|err| log_rejection("withdraw_settlement_reward", ctx, err))
    }

    /// Stop new markets from being created. Owner only.
    pub fn pause_market_creation(&mut self, ctx: &CallContext) -> Result<EventRecord> {
        self.require_owner(ctx, "pause market creation")
            .inspect_err(|err| log_rejection("pause_market_creation", ctx, err))?;
        self.state.market_creation_paused = true;
        info!(by = %ctx.caller, "market creation paused");
        Ok(self.emit(
            ctx.now,
            LedgerEvent::MarketCreationPaused {
                by: ctx.caller.clone(),
            },
        ))
    }

    /// Allow market creation again. Owner only.
    pub fn resume_market_creation(&mut self, ctx: &CallContext) -> Result<EventRecord> {
        self.require_owner(ctx, "resume market creation")
            .inspect_err(|err| log_rejection("resume_market_creation", ctx, err))?;
        self.state.market_creation_paused = false;
        info!(by = %ctx.caller, "market creation resumed");
        Ok(self.emit(
            ctx.now,
            LedgerEvent::MarketCreationResumed {
                by: ctx.caller.clone(),
            },
        ))
    }

    /// Replace the price oracle. Owner only.
    pub fn update_oracle(
        &mut self,
        ctx: &CallContext,
        oracle: Box<dyn PriceOracle>,
    ) -> Result<EventRecord> {
        self.require_owner(ctx, "update the oracle address")
            .inspect_err(|err| log_rejection("update_oracle", ctx, err))?;
        let current = oracle.address().to_string();
        let previous = std::mem::replace(&mut self.state.oracle_address, current.clone());
        self.oracle = oracle;
        info!(previous = %previous, current = %current, "oracle updated");
        Ok(self.emit(ctx.now, LedgerEvent::OracleUpdated { previous, current }))
    }

    // ---------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------

    pub fn config(&self) -> &LedgerConfig {
        &self.state.config
    }

    pub fn owner(&self) -> &AccountId {
        &self.state.owner
    }

    pub fn oracle_address(&self) -> &str {
        &self.state.oracle_address
    }

    /// Id of the current (most recent) market.
    pub fn market_count(&self) -> MarketId {
        self.state.market_count
    }

    pub fn commission_amount(&self) -> Amount {
        self.state.commission_amount
    }

    pub fn market_creation_paused(&self) -> bool {
        self.state.market_creation_paused
    }

    pub fn custody_balance(&self) -> Amount {
        self.state.custody_balance
    }

    pub fn events(&self) -> &EventLog {
        &self.state.events
    }

    pub fn markets(&self) -> impl Iterator<Item = &Market> {
        self.state.markets.values()
    }

    pub fn market(&self, market_id: MarketId) -> Result<&Market> {
        self.state
            .markets
            .get(&market_id)
            .ok_or(LedgerError::UnknownMarket(market_id))
    }

    pub fn current_market(&self) -> &Market {
        // market_count always indexes an existing market
        &self.state.markets[&self.state.market_count]
    }

    /// Observed status of a market at `now`.
    pub fn market_status(&self, market_id: MarketId, now: Timestamp) -> Result<MarketStatus> {
        Ok(self.market(market_id)?.observed_status(now))
    }

    pub fn market_start_time(&self, market_id: MarketId) -> Result<Timestamp> {
        Ok(self.market(market_id)?.start_time)
    }

    pub fn market_expire_time(&self, market_id: MarketId) -> Result<Timestamp> {
        Ok(self.market(market_id)?.expire_time)
    }

    pub fn market_settle_time(&self, market_id: MarketId) -> Result<Timestamp> {
        Ok(self.market(market_id)?.settle_time)
    }

    pub fn neutral_min_value(&self, market_id: MarketId) -> Result<Price> {
        Ok(self.market(market_id)?.neutral_band.min)
    }

    pub fn neutral_max_value(&self, market_id: MarketId) -> Result<Price> {
        Ok(self.market(market_id)?.neutral_band.max)
    }

    pub fn winning_option(&self, market_id: MarketId) -> Result<Option<BetOption>> {
        Ok(self.market(market_id)?.winning_option)
    }

    pub fn market_total_pool(&self, market_id: MarketId) -> Result<Amount> {
        Ok(self.market(market_id)?.total_pool)
    }

    pub fn market_total_bets(&self, market_id: MarketId, option: BetOption) -> Result<Amount> {
        Ok(self.market(market_id)?.option_total(option))
    }

    pub fn user_amount_staked(
        &self,
        market_id: MarketId,
        account: &AccountId,
        option: BetOption,
    ) -> Result<Amount> {
        Ok(self.market(market_id)?.amount_staked(account, option))
    }

    pub fn user_claimed_winnings(&self, market_id: MarketId, account: &AccountId) -> Result<bool> {
        Ok(self.market(market_id)?.claimed_winnings(account))
    }

    /// Creation reward reserved for `account`, or 0 if it is not the creator.
    pub fn user_creation_reward(&self, market_id: MarketId, account: &AccountId) -> Result<Amount> {
        let market = self.market(market_id)?;
        Ok(if market.creator == *account {
            market.creation_reward_amount
        } else {
            0
        })
    }

    pub fn user_claimed_creation_reward(
        &self,
        market_id: MarketId,
        account: &AccountId,
    ) -> Result<bool> {
        let market = self.market(market_id)?;
        Ok(market.creator == *account && market.creation_reward_claimed)
    }

    /// Settlement reward reserved for `account`, or 0 if it is not the settler.
    pub fn user_settlement_reward(
        &self,
        market_id: MarketId,
        account: &AccountId,
    ) -> Result<Amount> {
        let market = self.market(market_id)?;
        Ok(if market.settler.as_ref() == Some(account) {
            market.settlement_reward_amount
        } else {
            0
        })
    }

    pub fn user_claimed_settlement_reward(
        &self,
        market_id: MarketId,
        account: &AccountId,
    ) -> Result<bool> {
        let market = self.market(market_id)?;
        Ok(market.settler.as_ref() == Some(account) && market.settlement_reward_claimed)
    }

    /// Winnings `account` could withdraw from a market right now.
    ///
    /// Zero when the market is not settled, the account holds no winning
    /// stake, or the winnings were already claimed.
    pub fn calculate_winnings(&self, market_id: MarketId, account: &AccountId) -> Result<Amount> {
        let market = self.market(market_id)?;
        let Some(winning) = market.winning_option else {
            return Ok(0);
        };
        if market.claimed_winnings(account) {
            return Ok(0);
        }
        winnings_share(
            market.amount_staked(account, winning),
            market.total_pool,
            market.option_total(winning),
        )
    }

    /// Every market's entitlements for one account, oldest first.
    pub fn rewards_summary(&self, account: &AccountId) -> Result<Vec<RewardsRow>> {
        self.state
            .markets
            .values()
            .map(|market| {
                let winnings = match market.winning_option {
                    Some(winning) => winnings_share(
                        market.amount_staked(account, winning),
                        market.total_pool,
                        market.option_total(winning),
                    )?,
                    None => 0,
                };
                Ok(RewardsRow {
                    market_id: market.id,
                    start_time: market.start_time,
                    settle_time: market.settle_time,
                    winning_option: market.winning_option,
                    winnings,
                    claimed_winnings: market.claimed_winnings(account),
                    creation_reward: self.user_creation_reward(market.id, account)?,
                    claimed_creation_reward: self.user_claimed_creation_reward(market.id, account)?,
                    settlement_reward: self.user_settlement_reward(market.id, account)?,
                    claimed_settlement_reward: self
                        .user_claimed_settlement_reward(market.id, account)?,
                })
            })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------

    fn apply_bet(
        &mut self,
        ctx: &CallContext,
        option: BetOption,
        amount: Amount,
    ) -> Result<EventRecord> {
        let market = self.current_market();
        let status = market.observed_status(ctx.now);
        if status != MarketStatus::Live {
            return Err(LedgerError::LifecycleViolation {
                market_id: market.id,
                status,
                operation: "place a bet on",
            });
        }
        if amount == 0 {
            return Err(LedgerError::InvalidStake);
        }

        let split = self.fees().split_stake(amount)?;
        let option_total = checked_add(market.option_total(option), split.net, "option total")?;
        let total_pool = checked_add(market.total_pool, split.net, "total pool")?;
        let staked = checked_add(
            market.amount_staked(&ctx.caller, option),
            split.net,
            "position stake",
        )?;
        let commission_amount =
            checked_add(self.state.commission_amount, split.commission, "commission balance")?;
        let custody_balance = checked_add(self.state.custody_balance, amount, "custody balance")?;

        let market_id = market.id;
        let market = self.current_market_mut()?;
        market.option_totals[option.index()] = option_total;
        market.total_pool = total_pool;
        market
            .positions
            .entry(ctx.caller.clone())
            .or_default()
            .staked[option.index()] = staked;
        self.state.commission_amount = commission_amount;
        self.state.custody_balance = custody_balance;

        info!(
            market_id,
            bettor = %ctx.caller,
            option = %option,
            gross = %amount,
            net = %split.net,
            commission = %split.commission,
            "bet placed"
        );

        Ok(self.emit(
            ctx.now,
            LedgerEvent::BetPlaced {
                market_id,
                bettor: ctx.caller.clone(),
                option,
                net_amount: split.net,
                commission: split.commission,
            },
        ))
    }

    fn apply_settlement(&mut self, ctx: &CallContext) -> Result<EventRecord> {
        let market = self.current_market();
        if market.status == MarketStatus::Settled {
            return Err(LedgerError::LifecycleViolation {
                market_id: market.id,
                status: MarketStatus::Settled,
                operation: "settle",
            });
        }
        if ctx.now < market.settle_time {
            return Err(LedgerError::PrematureSettlement {
                market_id: market.id,
                settle_time: market.settle_time,
                now: ctx.now,
            });
        }

        let price = fetch_price(self.oracle.as_ref())?;
        let winning_option = market
            .neutral_band
            .classify(price, self.state.config.band_inclusivity);
        let reward = self.fees().settlement_reward(self.state.commission_amount)?;

        let market_id = market.id;
        let market = self.current_market_mut()?;
        market.status = MarketStatus::Settled;
        market.settler = Some(ctx.caller.clone());
        market.settlement_price = Some(price);
        market.winning_option = Some(winning_option);
        market.settlement_reward_amount = reward;
        // reward <= commission since reward bps <= 10_000
        self.state.commission_amount -= reward;

        info!(
            market_id,
            settler = %ctx.caller,
            price,
            winning_option = %winning_option,
            reward = %reward,
            "market settled"
        );

        Ok(self.emit(
            ctx.now,
            LedgerEvent::ResultPosted {
                market_id,
                winning_option,
                settler: ctx.caller.clone(),
                settlement_price: price,
                settlement_reward: reward,
            },
        ))
    }

    fn apply_creation(&mut self, ctx: &CallContext) -> Result<EventRecord> {
        let current = self.current_market();
        let status = current.observed_status(ctx.now);
        if status != MarketStatus::Settled {
            return Err(LedgerError::LifecycleViolation {
                market_id: current.id,
                status,
                operation: "replace",
            });
        }
        if self.state.market_creation_paused {
            return Err(LedgerError::CreationPaused);
        }

        let market_id = current
            .id
            .checked_add(1)
            .ok_or(LedgerError::ArithmeticOverflow("market id"))?;
        let price = fetch_price(self.oracle.as_ref())?;
        let reward = self.fees().creation_reward(self.state.commission_amount)?;
        let market = open_market(
            &self.state.config,
            market_id,
            ctx.caller.clone(),
            ctx.now,
            price,
            reward,
        )?;

        info!(
            market_id,
            creator = %ctx.caller,
            price,
            neutral_min = market.neutral_band.min,
            neutral_max = market.neutral_band.max,
            reward = %reward,
            "market created"
        );

        self.state.markets.insert(market_id, market);
        self.state.market_count = market_id;
        self.state.commission_amount -= reward;

        Ok(self.emit(
            ctx.now,
            LedgerEvent::NewMarketCreated {
                market_id,
                creator: ctx.caller.clone(),
                creation_reward: reward,
            },
        ))
    }

    fn apply_winnings_claim(&mut self, ctx: &CallContext, market_id: MarketId) -> Result<Payout> {
        let market = self.settled_market(ctx, market_id, "withdraw winnings from")?;
        let no_entitlement = || LedgerError::NoEntitlement {
            market_id,
            account: ctx.caller.clone(),
            kind: Entitlement::Winnings,
        };

        let winning = market.winning_option.ok_or_else(no_entitlement)?;
        let stake = market.amount_staked(&ctx.caller, winning);
        if stake == 0 {
            return Err(no_entitlement());
        }
        if market.claimed_winnings(&ctx.caller) {
            return Err(LedgerError::AlreadyClaimed {
                market_id,
                account: ctx.caller.clone(),
                kind: Entitlement::Winnings,
            });
        }

        let amount = winnings_share(stake, market.total_pool, market.option_total(winning))?;
        let custody_balance = checked_sub(self.state.custody_balance, amount)?;

        // claimed first, then custody, then the payout leaves
        if let Some(position) = self.market_mut(market_id)?.positions.get_mut(&ctx.caller) {
            position.claimed_winnings = true;
        }
        self.state.custody_balance = custody_balance;

        info!(market_id, account = %ctx.caller, amount = %amount, "winnings claimed");

        let receipt = self.emit(
            ctx.now,
            LedgerEvent::WinningsClaimed {
                market_id,
                account: ctx.caller.clone(),
                amount,
            },
        );
        Ok(Payout {
            recipient: ctx.caller.clone(),
            amount,
            receipt,
        })
    }

    fn apply_reward_claim(
        &mut self,
        ctx: &CallContext,
        market_id: MarketId,
        kind: Entitlement,
    ) -> Result<Payout> {
        let operation = match kind {
            Entitlement::CreationReward => "withdraw the creation reward of",
            _ => "withdraw the settlement reward of",
        };
        let market = self.settled_market(ctx, market_id, operation)?;

        let (holder, amount, claimed) = match kind {
            Entitlement::CreationReward => (
                Some(&market.creator),
                market.creation_reward_amount,
                market.creation_reward_claimed,
            ),
            _ => (
                market.settler.as_ref(),
                market.settlement_reward_amount,
                market.settlement_reward_claimed,
            ),
        };

        if holder != Some(&ctx.caller) {
            return Err(LedgerError::NoEntitlement {
                market_id,
                account: ctx.caller.clone(),
                kind,
            });
        }
        if claimed {
            return Err(LedgerError::AlreadyClaimed {
                market_id,
                account: ctx.caller.clone(),
                kind,
            });
        }
        if amount == 0 {
            return Err(LedgerError::NoEntitlement {
                market_id,
                account: ctx.caller.clone(),
                kind,
            });
        }
        let custody_balance = checked_sub(self.state.custody_balance, amount)?;

        let market = self.market_mut(market_id)?;
        let event = match kind {
            Entitlement::CreationReward => {
                market.creation_reward_claimed = true;
                LedgerEvent::CreationRewardClaimed {
                    market_id,
                    account: ctx.caller.clone(),
                    amount,
                }
            }
            _ => {
                market.settlement_reward_claimed = true;
                LedgerEvent::SettlementRewardClaimed {
                    market_id,
                    account: ctx.caller.clone(),
                    amount,
                }
            }
        };
        self.state.custody_balance = custody_balance;

        info!(market_id, account = %ctx.caller, amount = %amount, reward = %kind, "reward claimed");

        let receipt = self.emit(ctx.now, event);
        Ok(Payout {
            recipient: ctx.caller.clone(),
            amount,
            receipt,
        })
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    fn fees(&self) -> FeeSchedule {
        FeeSchedule::from(&self.state.config)
    }

    fn require_owner(&self, ctx: &CallContext, operation: &'static str) -> Result<()> {
        if ctx.caller != self.state.owner {
            return Err(LedgerError::Unauthorized {
                caller: ctx.caller.clone(),
                operation,
            });
        }
        Ok(())
    }

    fn settled_market(
        &self,
        ctx: &CallContext,
        market_id: MarketId,
        operation: &'static str,
    ) -> Result<&Market> {
        let market = self.market(market_id)?;
        let status = market.observed_status(ctx.now);
        if status != MarketStatus::Settled {
            return Err(LedgerError::LifecycleViolation {
                market_id,
                status,
                operation,
            });
        }
        Ok(market)
    }

    fn current_market_mut(&mut self) -> Result<&mut Market> {
        let id = self.state.market_count;
        self.market_mut(id)
    }

    fn market_mut(&mut self, market_id: MarketId) -> Result<&mut Market> {
        self.state
            .markets
            .get_mut(&market_id)
            .ok_or(LedgerError::UnknownMarket(market_id))
    }

    fn emit(&mut self, now: Timestamp, event: LedgerEvent) -> EventRecord {
        self.state.events.append(now, event)
    }
}

fn open_market(
    config: &LedgerConfig,
    id: MarketId,
    creator: AccountId,
    now: Timestamp,
    price: Price,
    creation_reward: Amount,
) -> Result<Market> {
    let expire_time = now
        .checked_add(config.market_duration_secs)
        .ok_or(LedgerError::ArithmeticOverflow("expire time"))?;
    let settle_time = expire_time
        .checked_add(config.settlement_delay_secs)
        .ok_or(LedgerError::ArithmeticOverflow("settle time"))?;
    let band = NeutralBand::around(
        price,
        config.neutral_offset_below,
        config.neutral_offset_above,
    );
    Ok(Market::open(
        id,
        creator,
        now,
        expire_time,
        settle_time,
        price,
        band,
        creation_reward,
    ))
}

fn checked_add(lhs: Amount, rhs: Amount, what: &'static str) -> Result<Amount> {
    lhs.checked_add(rhs)
        .ok_or(LedgerError::ArithmeticOverflow(what))
}

fn checked_sub(lhs: Amount, rhs: Amount) -> Result<Amount> {
    lhs.checked_sub(rhs)
        .ok_or(LedgerError::ArithmeticOverflow("custody balance"))
}

fn log_rejection(operation: &'static str, ctx: &CallContext, err: &LedgerError) {
    debug!(
        operation,
        caller = %ctx.caller,
        now = ctx.now,
        kind = err.kind(),
        "call rejected: {err}"
    );
}
