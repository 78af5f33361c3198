//! # Predicty CLI
//!
//! Command-line interface for running a three-way price prediction market
//! ledger. The ledger state lives in a JSON file and every subcommand maps
//! onto one ledger operation.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use predicty_core::{
    store::{load_state, save_state},
    utils::*,
    AccountId, BetOption, CallContext, EventRecord, FeedFileOracle, LedgerConfig, LedgerEvent,
    Market, MarketId, MarketLedger, MarketStatus, Payout, Timestamp,
};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "predicty")]
#[command(about = "Three-way price prediction markets with commission-funded keeper rewards")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Ledger state file
    #[arg(long, global = true, default_value = "predicty-state.json")]
    state: PathBuf,

    /// Override the wall clock (unix seconds)
    #[arg(long, global = true)]
    now: Option<Timestamp>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new ledger and open market #0
    Init {
        /// Owner account
        #[arg(long)]
        owner: String,
        /// Path of the JSON price feed
        #[arg(long)]
        feed: PathBuf,
        /// Ledger config file (JSON)
        #[arg(long, conflicts_with = "reference")]
        config: Option<PathBuf>,
        /// Use the 1% commission profile with a settlement window
        #[arg(long)]
        reference: bool,
    },
    /// Write a price into a JSON price feed
    PublishPrice {
        /// Path of the JSON price feed
        #[arg(long)]
        feed: PathBuf,
        /// Decimal price, e.g. 2000.5
        #[arg(long)]
        price: String,
        /// Decimals the price is scaled by [default: the ledger's price decimals]
        #[arg(long)]
        decimals: Option<u32>,
    },
    /// Place a bet on the current market
    Bet {
        #[arg(long)]
        from: String,
        /// bullish, neutral or bearish
        #[arg(long)]
        option: BetOption,
        /// Gross decimal amount, e.g. 1.5
        #[arg(long)]
        amount: String,
    },
    /// Settle the current market from the price feed
    Settle {
        #[arg(long)]
        from: String,
    },
    /// Open the next market
    Create {
        #[arg(long)]
        from: String,
    },
    /// Withdraw winnings from a settled market
    WithdrawWinnings {
        #[arg(long)]
        from: String,
        #[arg(long)]
        market: MarketId,
    },
    /// Withdraw the creation reward of a settled market
    WithdrawCreationReward {
        #[arg(long)]
        from: String,
        #[arg(long)]
        market: MarketId,
    },
    /// Withdraw the settlement reward of a settled market
    WithdrawSettlementReward {
        #[arg(long)]
        from: String,
        #[arg(long)]
        market: MarketId,
    },
    /// Pause market creation (owner only)
    Pause {
        #[arg(long)]
        from: String,
    },
    /// Resume market creation (owner only)
    Resume {
        #[arg(long)]
        from: String,
    },
    /// Point the ledger at another price feed (owner only)
    UpdateOracle {
        #[arg(long)]
        from: String,
        #[arg(long)]
        feed: PathBuf,
    },
    /// Show a market (the current one by default)
    Status {
        #[arg(long)]
        market: Option<MarketId>,
    },
    /// Show an account's winnings and rewards across markets
    Rewards {
        #[arg(long)]
        account: String,
    },
    /// List the event log
    Events {
        #[arg(long)]
        market: Option<MarketId>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{}: {err:#}", "Error".red().bold());
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let now = cli.now.unwrap_or_else(now_timestamp);
    let state_path = cli.state.as_path();

    match cli.command {
        Commands::Init {
            owner,
            feed,
            config,
            reference,
        } => {
            if state_path.exists() {
                bail!("state file {} already exists", state_path.display());
            }
            let config = match config {
                Some(path) => LedgerConfig::from_file(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None if reference => LedgerConfig::reference(),
                None => LedgerConfig::default(),
            };

            let ledger = MarketLedger::new(
                config,
                AccountId::from(owner),
                Box::new(FeedFileOracle::new(&feed)),
                now,
            )?;
            save(state_path, &ledger)?;

            println!("{}", "Ledger initialized".green().bold());
            print_market(&ledger, ledger.current_market(), now);
        }

        Commands::PublishPrice {
            feed,
            price,
            decimals,
        } => {
            let decimals = match decimals {
                Some(decimals) => decimals,
                None => feed_decimals(state_path)?,
            };
            let price = parse_price(&price, decimals)?;
            FeedFileOracle::publish(&feed, price)
                .with_context(|| format!("failed to write price feed {}", feed.display()))?;
            println!(
                "{}: {} -> {}",
                "Price published".green().bold(),
                format_price(price, decimals).cyan(),
                feed.display()
            );
        }

        Commands::Bet {
            from,
            option,
            amount,
        } => {
            let mut ledger = open(state_path)?;
            let amount = parse_amount(&amount, ledger.config().amount_decimals)?;
            let record = ledger.place_bet(&ctx(from, now), option, amount)?;
            save(state_path, &ledger)?;
            print_record(&ledger, &record);
        }

        Commands::Settle { from } => {
            let mut ledger = open(state_path)?;
            let record = ledger.settle_market(&ctx(from, now))?;
            save(state_path, &ledger)?;
            print_record(&ledger, &record);
        }

        Commands::Create { from } => {
            let mut ledger = open(state_path)?;
            let record = ledger.create_new_market(&ctx(from, now))?;
            save(state_path, &ledger)?;
            print_record(&ledger, &record);
            print_market(&ledger, ledger.current_market(), now);
        }

        Commands::WithdrawWinnings { from, market } => {
            let mut ledger = open(state_path)?;
            let payout = ledger.withdraw_winnings(&ctx(from, now), market)?;
            save(state_path, &ledger)?;
            print_payout(&ledger, &payout);
        }

        Commands::WithdrawCreationReward { from, market } => {
            let mut ledger = open(state_path)?;
            let payout = ledger.withdraw_creation_reward(&ctx(from, now), market)?;
            save(state_path, &ledger)?;
            print_payout(&ledger, &payout);
        }

        Commands::WithdrawSettlementReward { from, market } => {
            let mut ledger = open(state_path)?;
            let payout = ledger.withdraw_settlement_reward(&ctx(from, now), market)?;
            save(state_path, &ledger)?;
            print_payout(&ledger, &payout);
        }

        Commands::Pause { from } => {
            let mut ledger = open(state_path)?;
            let record = ledger.pause_market_creation(&ctx(from, now))?;
            save(state_path, &ledger)?;
            print_record(&ledger, &record);
        }

        Commands::Resume { from } => {
            let mut ledger = open(state_path)?;
            let record = ledger.resume_market_creation(&ctx(from, now))?;
            save(state_path, &ledger)?;
            print_record(&ledger, &record);
        }

        Commands::UpdateOracle { from, feed } => {
            let mut ledger = open(state_path)?;
            let record =
                ledger.update_oracle(&ctx(from, now), Box::new(FeedFileOracle::new(&feed)))?;
            save(state_path, &ledger)?;
            print_record(&ledger, &record);
        }

        Commands::Status { market } => {
            let ledger = open(state_path)?;
            let market = match market {
                Some(id) => ledger.market(id)?,
                None => ledger.current_market(),
            };
            print_market(&ledger, market, now);
            println!(
                "{}: {}",
                "Commission Balance".yellow().bold(),
                fmt_amount(&ledger, ledger.commission_amount())
            );
            println!(
                "{}: {}",
                "Custody Balance".yellow().bold(),
                fmt_amount(&ledger, ledger.custody_balance())
            );
            println!(
                "{}: {}",
                "Creation Paused".yellow().bold(),
                ledger.market_creation_paused()
            );
            println!("{}: {}", "Oracle".yellow().bold(), ledger.oracle_address());
        }

        Commands::Rewards { account } => {
            let ledger = open(state_path)?;
            let account = AccountId::from(account);
            let rows = ledger.rewards_summary(&account)?;

            println!("{}", format!("Rewards for {account}").green().bold());
            println!("{}", "═".repeat(70).bright_black());
            for row in rows {
                let outcome = row
                    .winning_option
                    .map(|option| option.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "#{:<4} {:<8} winnings {} {}  creation {} {}  settlement {} {}",
                    row.market_id,
                    outcome,
                    fmt_amount(&ledger, row.winnings).cyan(),
                    claimed_mark(row.claimed_winnings),
                    fmt_amount(&ledger, row.creation_reward).cyan(),
                    claimed_mark(row.claimed_creation_reward),
                    fmt_amount(&ledger, row.settlement_reward).cyan(),
                    claimed_mark(row.claimed_settlement_reward),
                );
            }
        }

        Commands::Events { market } => {
            let ledger = open(state_path)?;
            let records: Vec<&EventRecord> = match market {
                Some(id) => ledger.events().for_market(id).collect(),
                None => ledger.events().records().iter().collect(),
            };
            for record in records {
                print_record(&ledger, record);
            }
            if !ledger.events().verify() {
                bail!("event log failed verification");
            }
        }
    }

    Ok(())
}

fn ctx(from: String, now: Timestamp) -> CallContext {
    CallContext::new(from, now)
}

/// Load the ledger, reattaching the price feed recorded in the state.
fn open(path: &Path) -> Result<MarketLedger> {
    let state = load_state(path)
        .with_context(|| format!("failed to load ledger state {}", path.display()))?;
    let oracle = FeedFileOracle::new(&state.oracle_address);
    Ok(MarketLedger::restore(state, Box::new(oracle))?)
}

/// Price decimals of the ledger at `path`, or the default when none exists yet.
fn feed_decimals(path: &Path) -> Result<u32> {
    if !path.exists() {
        return Ok(LedgerConfig::default().price_decimals);
    }
    let state = load_state(path)
        .with_context(|| format!("failed to load ledger state {}", path.display()))?;
    Ok(state.config.price_decimals)
}

fn save(path: &Path, ledger: &MarketLedger) -> Result<()> {
    save_state(path, ledger.state())
        .with_context(|| format!("failed to save ledger state {}", path.display()))?;
    info!(path = %path.display(), "state written");
    Ok(())
}

fn fmt_amount(ledger: &MarketLedger, amount: u128) -> String {
    format_amount(amount, ledger.config().amount_decimals)
}

fn claimed_mark(claimed: bool) -> ColoredString {
    if claimed {
        "claimed".bright_black()
    } else {
        "open".green()
    }
}

fn print_market(ledger: &MarketLedger, market: &Market, now: Timestamp) {
    let price_decimals = ledger.config().price_decimals;
    let status = market.observed_status(now);
    let status_text = match status {
        MarketStatus::Live => status.to_string().green(),
        MarketStatus::InSettlement => status.to_string().yellow(),
        MarketStatus::Settled => status.to_string().blue(),
    };

    println!("{}", "═".repeat(50).bright_black());
    println!("{}: {}", "Market".yellow().bold(), market.id);
    println!("{}: {} ({})", "Status".yellow().bold(), status_text, market.describe(now));
    println!("{}: {}", "Creator".yellow().bold(), market.creator);
    println!("{}: {}", "Start".yellow().bold(), format_timestamp(market.start_time));
    println!("{}: {}", "Expires".yellow().bold(), format_timestamp(market.expire_time));
    println!("{}: {}", "Settles".yellow().bold(), format_timestamp(market.settle_time));
    println!(
        "{}: {} .. {}",
        "Neutral Band".yellow().bold(),
        format_price(market.neutral_band.min, price_decimals),
        format_price(market.neutral_band.max, price_decimals)
    );
    for option in BetOption::ALL {
        println!(
            "  {:<8} {} (x{:.2})",
            option.to_string(),
            fmt_amount(ledger, market.option_total(option)).cyan(),
            market.odds(option)
        );
    }
    println!(
        "{}: {} from {} accounts",
        "Total Pool".yellow().bold(),
        fmt_amount(ledger, market.total_pool),
        market.participant_count()
    );
    if let (Some(option), Some(price)) = (market.winning_option, market.settlement_price) {
        println!(
            "{}: {} at {}",
            "Result".cyan().bold(),
            option,
            format_price(price, price_decimals)
        );
    }
    println!("{}", "═".repeat(50).bright_black());
}

fn print_record(ledger: &MarketLedger, record: &EventRecord) {
    let detail = match &record.event {
        LedgerEvent::BetPlaced {
            market_id,
            bettor,
            option,
            net_amount,
            commission,
        } => format!(
            "market {market_id}: {bettor} staked {} on {option} (commission {})",
            fmt_amount(ledger, *net_amount),
            fmt_amount(ledger, *commission)
        ),
        LedgerEvent::ResultPosted {
            market_id,
            winning_option,
            settler,
            settlement_price,
            settlement_reward,
        } => format!(
            "market {market_id}: {winning_option} won at {}, settled by {settler} (reward {})",
            format_price(*settlement_price, ledger.config().price_decimals),
            fmt_amount(ledger, *settlement_reward)
        ),
        LedgerEvent::NewMarketCreated {
            market_id,
            creator,
            creation_reward,
        } => format!(
            "market {market_id} opened by {creator} (reward {})",
            fmt_amount(ledger, *creation_reward)
        ),
        LedgerEvent::WinningsClaimed {
            market_id,
            account,
            amount,
        }
        | LedgerEvent::CreationRewardClaimed {
            market_id,
            account,
            amount,
        }
        | LedgerEvent::SettlementRewardClaimed {
            market_id,
            account,
            amount,
        } => format!(
            "market {market_id}: {account} received {}",
            fmt_amount(ledger, *amount)
        ),
        LedgerEvent::MarketCreationPaused { by } => format!("paused by {by}"),
        LedgerEvent::MarketCreationResumed { by } => format!("resumed by {by}"),
        LedgerEvent::OracleUpdated { previous, current } => format!("{previous} -> {current}"),
    };

    println!(
        "{} {} {} {}",
        format!("#{}", record.sequence).bright_black(),
        format_timestamp(record.timestamp).bright_black(),
        record.event.name().green().bold(),
        detail
    );
}

fn print_payout(ledger: &MarketLedger, payout: &Payout) {
    print_record(ledger, &payout.receipt);
    println!(
        "{}: {} to {}",
        "Payout".cyan().bold(),
        fmt_amount(ledger, payout.amount),
        payout.recipient
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicty_core::PriceOracle;

    fn cli(state: &Path, now: Timestamp, args: &[&str]) -> Cli {
        let now = now.to_string();
        let mut argv = vec![
            "predicty",
            "--state",
            state.to_str().unwrap(),
            "--now",
            now.as_str(),
        ];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_full_market_round() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let feed = dir.path().join("feed.json");
        let feed_arg = feed.to_str().unwrap();
        let start = 1_735_689_600;

        run(cli(&state, start, &["publish-price", "--feed", feed_arg, "--price", "2000"])).unwrap();
        run(cli(&state, start, &["init", "--owner", "owner", "--feed", feed_arg])).unwrap();
        run(cli(
            &state,
            start + 60,
            &["bet", "--from", "alice", "--option", "neutral", "--amount", "2"],
        ))
        .unwrap();
        run(cli(
            &state,
            start + 120,
            &["bet", "--from", "bob", "--option", "bullish", "--amount", "1"],
        ))
        .unwrap();

        // bets close at expiry
        assert!(run(cli(
            &state,
            start + 3600,
            &["bet", "--from", "bob", "--option", "bullish", "--amount", "1"],
        ))
        .is_err());

        run(cli(&state, start + 3600, &["settle", "--from", "keeper"])).unwrap();
        run(cli(
            &state,
            start + 3700,
            &["withdraw-winnings", "--from", "alice", "--market", "0"],
        ))
        .unwrap();
        run(cli(&state, start + 3700, &["create", "--from", "bob"])).unwrap();
        run(cli(&state, start + 3700, &["events"])).unwrap();

        let ledger = open(&state).unwrap();
        assert_eq!(ledger.market_count(), 1);
        assert!(ledger
            .user_claimed_winnings(0, &AccountId::from("alice"))
            .unwrap());
        // alice took the whole 2.7 pool
        assert_eq!(ledger.custody_balance(), 300_000_000_000_000_000);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let feed = dir.path().join("feed.json");
        FeedFileOracle::publish(&feed, 2_000_00000000).unwrap();
        let feed_arg = feed.to_str().unwrap();

        run(cli(&state, 0, &["init", "--owner", "o", "--feed", feed_arg, "--reference"])).unwrap();
        let err = run(cli(&state, 0, &["init", "--owner", "o", "--feed", feed_arg])).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let ledger = open(&state).unwrap();
        assert_eq!(ledger.config(), &LedgerConfig::reference());
    }

    #[test]
    fn test_publish_price_uses_ledger_decimals() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let feed = dir.path().join("feed.json");
        let config = dir.path().join("config.json");
        let feed_arg = feed.to_str().unwrap();
        std::fs::write(&config, r#"{"price_decimals": 2}"#).unwrap();

        // no ledger yet: default decimals
        run(cli(&state, 0, &["publish-price", "--feed", feed_arg, "--price", "2000"])).unwrap();
        let oracle = FeedFileOracle::new(&feed);
        assert_eq!(oracle.current_price().unwrap(), 2_000_00000000);

        let config_arg = config.to_str().unwrap();
        run(cli(
            &state,
            0,
            &["init", "--owner", "o", "--feed", feed_arg, "--config", config_arg],
        ))
        .unwrap();

        run(cli(&state, 0, &["publish-price", "--feed", feed_arg, "--price", "2000.5"])).unwrap();
        assert_eq!(oracle.current_price().unwrap(), 2_000_50);

        // an explicit flag still wins
        run(cli(
            &state,
            0,
            &["publish-price", "--feed", feed_arg, "--price", "1", "--decimals", "4"],
        ))
        .unwrap();
        assert_eq!(oracle.current_price().unwrap(), 1_0000);
    }

    #[test]
    fn test_option_argument_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state.json");
        let parsed = cli(
            &state,
            0,
            &["bet", "--from", "a", "--option", "Bearish", "--amount", "1"],
        );
        assert!(matches!(
            parsed.command,
            Commands::Bet {
                option: BetOption::Bearish,
                ..
            }
        ));
        let bad = ["predicty", "bet", "--from", "a", "--option", "up", "--amount", "1"];
        assert!(Cli::try_parse_from(bad).is_err());
    }
}
