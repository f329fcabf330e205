//! Sheet function catalogue and name-based dispatch tests.

mod common;

use common::{days_ago, premium_sheets, sheets, stamp, StubTransport};
use san_sheets::models::Cell;
use san_sheets::{SanError, SheetFunction};
use serde_json::json;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[test]
fn catalogue_lists_every_function_once() {
    let stub = StubTransport::new();
    let names = sheets(&stub).functions();
    assert_eq!(names.len(), 48);
    assert_eq!(names.first(), Some(&"SAN_ACTIVE_ADDRESSES"));
    assert_eq!(names.last(), Some(&"SAN_VELOCITY"));
    assert!(names.contains(&"SAN_FUNCTIONS"));

    let unique: HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), names.len());
    assert!(names.iter().all(|n| n.starts_with("SAN_")));
}

#[test]
fn catalogue_is_sorted_word_by_word() {
    let names: Vec<&str> = SheetFunction::ALL.iter().map(|f| f.name()).collect();
    let mut sorted = names.clone();
    sorted.sort_by(|a, b| a.split('_').cmp(b.split('_')));
    assert_eq!(names, sorted);

    let position = |name: &str| names.iter().position(|n| *n == name).unwrap();
    assert!(position("SAN_PRICE_VOLUME_DIFF") < position("SAN_PRICES"));
    assert!(position("SAN_EXCHANGE_OUTFLOW") < position("SAN_EXCHANGE_PERCENT_OF_SUPPLY"));
    assert!(position("SAN_EXCHANGE_PERCENT_OF_SUPPLY") < position("SAN_FUNCTIONS"));
}

#[test]
fn names_parse_back_to_functions() {
    for function in SheetFunction::ALL {
        assert_eq!(function.name().parse::<SheetFunction>().unwrap(), *function);
    }
    assert_eq!("san_ohlc".parse::<SheetFunction>().unwrap(), SheetFunction::Ohlc);
    assert_eq!("latest_price".parse::<SheetFunction>().unwrap(), SheetFunction::LatestPrice);
    assert!("SAN_NOPE".parse::<SheetFunction>().is_err());
}

#[test]
fn san_functions_table() {
    let stub = StubTransport::new();
    let table = sheets(&stub).call("SAN_FUNCTIONS", &[]).unwrap();
    assert_eq!(table.headers, vec!["Functions"]);
    assert_eq!(table.len(), 48);
    assert_eq!(table.rows[0], vec![Cell::text("SAN_ACTIVE_ADDRESSES")]);
    assert_eq!(stub.request_count(), 0);
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn call_parses_dates_and_runs_query() {
    let stub = StubTransport::new();
    let sheets = sheets(&stub);
    let from = days_ago(2);
    stub.push_data(
        "historyPrice",
        json!([{ "datetime": stamp(from), "priceUsd": 3, "volume": 4 }]),
    );

    let from_arg = from.format("%Y-%m-%d").to_string();
    let to_arg = days_ago(0).format("%Y-%m-%d").to_string();
    let table = sheets
        .call("SAN_PRICES", &["santiment", from_arg.as_str(), to_arg.as_str()])
        .unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0][1], Cell::Number(3.0));
}

#[test]
fn exchange_percent_of_supply_by_name() {
    let stub = StubTransport::new();
    let sheets = premium_sheets(&stub);
    let table = sheets
        .call("SAN_EXCHANGE_PERCENT_OF_SUPPLY", &["bitcoin", "2020-01-01", "2020-01-05"])
        .unwrap();
    assert_eq!(table.headers, vec!["Date", "Value"]);
    assert!(stub
        .last_query()
        .contains(r#"metric: "percent_of_total_supply_on_exchanges""#));
}

#[test]
fn optional_arguments_default() {
    let stub = StubTransport::new();
    let sheets = sheets(&stub);
    stub.push_data("projectBySlug", json!({ "priceUsd": 2.0, "priceBtc": 0.5 }));
    stub.push_data("projectBySlug", json!({ "priceUsd": 2.0, "priceBtc": 0.5 }));

    let usd = sheets.call("SAN_LATEST_PRICE", &["santiment"]).unwrap();
    assert_eq!(usd.rows[0][1], Cell::text("USD"));

    let btc = sheets.call("SAN_LATEST_PRICE", &["santiment", "btc"]).unwrap();
    assert_eq!(btc.rows[0][2], Cell::Number(0.5));
}

#[test]
fn blank_optional_argument_counts_as_missing() {
    let stub = StubTransport::new();
    let sheets = premium_sheets(&stub);
    sheets
        .call("SAN_MVRV_RATIO", &["bitcoin", "2020-01-01", "2020-02-01", ""])
        .unwrap();
    assert!(stub.last_query().contains(r#"metric: "mvrv_usd""#));

    sheets
        .call("SAN_MEAN_REALIZED_PRICE", &["bitcoin", "2020-01-01", "2020-02-01", "", "7d"])
        .unwrap();
    assert!(stub.last_query().contains(r#"metric: "mean_realized_price_usd_7d""#));
}

#[test]
fn price_volume_diff_takes_currency_first() {
    let stub = StubTransport::new();
    let sheets = premium_sheets(&stub);
    sheets
        .call("SAN_PRICE_VOLUME_DIFF", &["USD", "santiment", "2020-01-01", "2020-01-05"])
        .unwrap();
    assert!(stub.last_query().contains(r#"currency: "USD", slug: "santiment""#));
}

#[test]
fn eth_top_transactions_parses_limit_and_type() {
    let stub = StubTransport::new();
    let sheets = premium_sheets(&stub);
    sheets
        .call(
            "SAN_ETH_TOP_TRANSACTIONS",
            &["santiment", "2020-01-01", "2020-01-05", "3", "in"],
        )
        .unwrap();
    let query = stub.last_query();
    assert!(query.contains("limit: 3"));
    assert!(query.contains("transactionType: IN"));
}

#[test]
fn social_dominance_source_defaults_to_all() {
    let stub = StubTransport::new();
    let sheets = premium_sheets(&stub);
    sheets
        .call("SAN_SOCIAL_DOMINANCE", &["santiment", "2020-01-01", "2020-01-05"])
        .unwrap();
    assert!(stub.last_query().contains("source: ALL"));
}

#[test]
fn missing_required_argument_is_reported() {
    let stub = StubTransport::new();
    let err = sheets(&stub)
        .call("SAN_HISTORICAL_BALANCE", &["ethereum", "2020-01-01", "2020-01-05"])
        .unwrap_err();
    match err {
        SanError::InvalidArgument(message) => {
            assert!(message.contains("address"));
            assert!(message.contains("SAN_HISTORICAL_BALANCE(slug, from, to, address)"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(stub.request_count(), 0);
}

#[test]
fn too_many_arguments_rejected() {
    let stub = StubTransport::new();
    let err = sheets(&stub).call("SAN_ALL_PROJECTS", &["extra"]).unwrap_err();
    assert!(matches!(err, SanError::InvalidArgument(_)));
}

#[test]
fn bad_date_and_count_rejected() {
    let stub = StubTransport::new();
    let sheets = sheets(&stub);
    assert!(matches!(
        sheets.call("SAN_OHLC", &["santiment", "yesterday", "2020-01-05"]),
        Err(SanError::InvalidArgument(_))
    ));
    assert!(matches!(
        sheets.call("SAN_EMERGING_TRENDS", &["-1", "2020-01-01", "2020-01-05"]),
        Err(SanError::InvalidArgument(_))
    ));
    assert_eq!(stub.request_count(), 0);
}

#[test]
fn unknown_function_rejected() {
    let stub = StubTransport::new();
    assert!(matches!(
        sheets(&stub).call("SAN_MOON", &[]),
        Err(SanError::InvalidArgument(_))
    ));
}

#[test]
fn every_function_dispatches_with_valid_arguments() {
    let stub = StubTransport::new();
    let sheets = premium_sheets(&stub);
    let (from, to) = ("2020-01-01", "2020-01-08");

    for function in SheetFunction::ALL {
        let args: Vec<&str> = match function {
            SheetFunction::AllProjects
            | SheetFunction::Erc20Projects
            | SheetFunction::Functions
            | SheetFunction::SocialVolumeProjects => vec![],
            SheetFunction::ProjectFundamentals | SheetFunction::ProjectSocialData => {
                vec!["santiment"]
            }
            SheetFunction::LatestPrice => vec!["santiment", "USD"],
            SheetFunction::DailyAvgMarketcap
            | SheetFunction::DailyClosingMarketcap
            | SheetFunction::DailyClosingPrice => vec!["santiment", from],
            SheetFunction::EmergingTrends => vec!["10", from, to],
            SheetFunction::PriceVolumeDiff => vec!["USD", "santiment", from, to],
            SheetFunction::TopHoldersPercentOfTotalSupply => vec!["santiment", "10", from, to],
            SheetFunction::HistoricalBalance => vec!["ethereum", from, to, "0xabc"],
            SheetFunction::SocialVolume => vec!["santiment", from, to, "TELEGRAM_CHATS_OVERVIEW"],
            SheetFunction::EthTopTransactions | SheetFunction::TokenTopTransactions => {
                vec!["santiment", from, to, "5"]
            }
            _ => vec!["santiment", from, to],
        };
        let table = sheets
            .call(function.name(), &args)
            .unwrap_or_else(|e| panic!("{} failed: {}", function, e));
        assert!(!table.headers.is_empty(), "{}", function);
    }
}
