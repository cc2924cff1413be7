//! Property-Based Tests — Domain Layer Invariants
//!
//! Uses `proptest` to verify that the accountant and fee schedule keep
//! their invariants across random ledgers.

use proptest::prelude::*;

use recall_dashboard::domain::fees::FeeCalculator;
use recall_dashboard::domain::ledger::Ledger;
use recall_dashboard::domain::portfolio::Portfolio;
use recall_dashboard::domain::tokens::TokenMap;
use recall_dashboard::domain::trade::{
    BridgeTicket, LedgerEntry, Trade, TradeAction, TradeStatus, TradeTicket, Transfer,
};

const SYMBOLS: [&str; 4] = ["USDC", "ETH", "SOL", "WBTC"];

fn symbol() -> impl Strategy<Value = String> {
    prop::sample::select(SYMBOLS.to_vec()).prop_map(str::to_string)
}

fn trade_entry() -> impl Strategy<Value = LedgerEntry> {
    (symbol(), symbol(), 0.000_001f64..1_000_000.0, any::<bool>()).prop_map(
        |(from_token, to_token, amount, sell)| {
            let ticket = TradeTicket {
                from_chain: "evm".to_string(),
                from_specific: String::new(),
                to_chain: "evm".to_string(),
                to_specific: String::new(),
                action: if sell { TradeAction::Sell } else { TradeAction::Buy },
                from_token,
                to_token,
                amount,
                reason: String::new(),
            };
            LedgerEntry::Trade(Trade::record(&ticket, TradeStatus::Filled))
        },
    )
}

fn bridge_entry() -> impl Strategy<Value = LedgerEntry> {
    (symbol(), 0.01f64..10_000.0).prop_map(|(token, amount)| {
        LedgerEntry::Bridge(Transfer::relay(&BridgeTicket {
            from_chain: "evm".to_string(),
            from_specific: String::new(),
            to_chain: "svm".to_string(),
            to_specific: String::new(),
            token,
            amount,
        }))
    })
}

fn entries() -> impl Strategy<Value = Vec<LedgerEntry>> {
    prop::collection::vec(prop_oneof![3 => trade_entry(), 1 => bridge_entry()], 0..40)
}

// ── Portfolio Accountant Properties ─────────────────────────

proptest! {
    /// Appending entries one at a time lands on the same portfolio as
    /// folding the whole sequence from scratch.
    #[test]
    fn incremental_portfolio_matches_fold(entries in entries()) {
        let mut ledger = Ledger::new();
        for entry in &entries {
            ledger.append(entry.clone());
        }
        prop_assert_eq!(ledger.portfolio(), &Portfolio::fold(&entries));
        prop_assert!(ledger.matches(&ledger.recompute_portfolio()));
        prop_assert_eq!(ledger.len(), entries.len());
    }

    /// Bridge transfers never move balances.
    #[test]
    fn bridges_have_no_portfolio_effect(bridges in prop::collection::vec(bridge_entry(), 1..20)) {
        prop_assert!(Portfolio::fold(&bridges).is_empty());
    }

    /// Total balance across tokens drops by exactly the fees paid.
    #[test]
    fn net_balance_is_minus_total_fees(entries in entries()) {
        let portfolio = Portfolio::fold(&entries);
        let net: f64 = portfolio.iter().map(|(_, balance)| balance).sum();
        let fees: f64 = entries
            .iter()
            .filter_map(|entry| match entry {
                LedgerEntry::Trade(trade) => Some(trade.fee),
                LedgerEntry::Bridge(_) => None,
            })
            .sum();
        let scale = entries.len() as f64 * 1_000_000.0;
        prop_assert!(
            (net + fees).abs() <= 1e-9 * scale.max(1.0),
            "net={net}, fees={fees}"
        );
    }

    /// Buy and sell with identical fields have identical effect.
    #[test]
    fn action_does_not_change_accounting(entry in trade_entry()) {
        let LedgerEntry::Trade(trade) = entry else { unreachable!() };
        let mut flipped = trade.clone();
        flipped.action = match trade.action {
            TradeAction::Buy => TradeAction::Sell,
            TradeAction::Sell => TradeAction::Buy,
        };
        let mut a = Portfolio::new();
        a.apply_trade(&trade);
        let mut b = Portfolio::new();
        b.apply_trade(&flipped);
        prop_assert_eq!(a, b);
    }
}

// ── Fee Calculator Properties ───────────────────────────────

proptest! {
    /// Fees are non-negative and within half a micro-unit of 0.1%.
    #[test]
    fn fee_is_rounded_tenth_of_a_percent(amount in 0.0f64..10_000_000.0) {
        let fee = FeeCalculator::flat().fee(amount);
        prop_assert!(fee >= 0.0);
        prop_assert!(
            (fee - amount * 0.001).abs() <= 0.000_000_5 + 1e-9,
            "fee {fee} too far from {}", amount * 0.001
        );
    }

    /// Fees carry at most six decimal places.
    #[test]
    fn fee_has_six_decimals(amount in 0.0f64..1_000_000.0) {
        let fee = FeeCalculator::flat().fee(amount);
        let micros = fee * 1_000_000.0;
        prop_assert!((micros - micros.round()).abs() < 1e-3, "fee {fee}");
    }

    /// Non-positive amounts pay nothing.
    #[test]
    fn non_positive_amounts_pay_nothing(amount in -1_000_000.0f64..=0.0) {
        prop_assert_eq!(FeeCalculator::flat().fee(amount), 0.0);
    }
}

// ── Token Resolution Properties ─────────────────────────────

proptest! {
    /// Unmapped symbols resolve to themselves.
    #[test]
    fn unmapped_symbols_pass_through(symbol in "[A-Z]{2,6}") {
        let map: TokenMap = [("USDC", "0xa0b8")].into_iter().collect();
        prop_assume!(symbol != "USDC");
        prop_assert_eq!(map.resolve(&symbol), symbol.as_str());
    }
}
