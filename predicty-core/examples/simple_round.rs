//! Simple market round example
//!
//! Opens a ledger against a fixed oracle price, takes a few bets, settles
//! the market and pays out the winners and the settler.

use predicty_core::{
    format_amount, format_price, format_timestamp, AccountId, BetOption, CallContext,
    FixedPriceOracle, LedgerConfig, MarketLedger, Result,
};

fn main() -> Result<()> {
    println!("Simple Market Round Example");
    println!("═══════════════════════════\n");

    let start = 1_735_689_600;
    let config = LedgerConfig::default();
    let decimals = config.amount_decimals;
    let unit = 10u128.pow(decimals);

    // 1. Open the ledger; market #0 is created by the owner
    println!("1. Opening the ledger...");
    let mut ledger = MarketLedger::new(
        config,
        AccountId::from("owner"),
        Box::new(FixedPriceOracle::new("eth-usd", 2_000_00000000)),
        start,
    )?;
    let market = ledger.current_market();
    let price_decimals = ledger.config().price_decimals;
    println!("   Market ID: {}", market.id);
    println!(
        "   Creation price: {}",
        format_price(market.creation_price, price_decimals)
    );
    println!(
        "   Neutral band: {} .. {}",
        format_price(market.neutral_band.min, price_decimals),
        format_price(market.neutral_band.max, price_decimals)
    );
    println!("   Settles at: {}", format_timestamp(market.settle_time));
    println!();

    // 2. Take bets
    println!("2. Placing bets...");
    let bets = [
        ("alice", BetOption::Neutral, 2 * unit),
        ("bob", BetOption::Bullish, unit),
        ("carol", BetOption::Neutral, unit),
    ];
    for (offset, (who, option, amount)) in bets.into_iter().enumerate() {
        let now = start + 60 * (offset as u64 + 1);
        ledger.place_bet(&CallContext::new(who, now), option, amount)?;
        println!("   {who} bet {} on {option}", format_amount(amount, decimals));
    }
    println!(
        "   Pool after commission: {}",
        format_amount(ledger.current_market().total_pool, decimals)
    );
    println!(
        "   Commission held: {}",
        format_amount(ledger.commission_amount(), decimals)
    );
    println!();

    // 3. Settle once the window has passed
    println!("3. Settling...");
    let market_id = ledger.current_market().id;
    let settle_at = ledger.current_market().settle_time;
    ledger.settle_market(&CallContext::new("keeper", settle_at))?;
    if let Some(winner) = ledger.winning_option(market_id)? {
        println!("   Winning option: {winner}");
    }
    println!();

    // 4. Pay out
    println!("4. Withdrawing...");
    for who in ["alice", "carol"] {
        let payout = ledger.withdraw_winnings(&CallContext::new(who, settle_at + 60), market_id)?;
        println!(
            "   {} collected {}",
            payout.recipient,
            format_amount(payout.amount, decimals)
        );
    }
    let reward =
        ledger.withdraw_settlement_reward(&CallContext::new("keeper", settle_at + 60), market_id)?;
    println!(
        "   {} collected a settlement reward of {}",
        reward.recipient,
        format_amount(reward.amount, decimals)
    );
    println!();

    println!(
        "Remaining custody: {}",
        format_amount(ledger.custody_balance(), decimals)
    );
    Ok(())
}
