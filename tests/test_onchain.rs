//! On-chain query tests.

mod common;

use common::{date, days_ago, premium_sheets, sheets, StubTransport};
use san_sheets::models::Cell;
use san_sheets::queries::onchain::{
    eth_top_transactions_query, format_eth_spent_over_time, format_mining_pools_distribution,
    format_top_transactions, TOP_TRANSACTIONS_HEADERS,
};
use san_sheets::queries::TransactionType;
use san_sheets::SanError;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

#[test]
fn eth_top_transactions_query_nests_under_project() {
    let doc = eth_top_transactions_query(
        "santiment",
        date(2024, 1, 1),
        date(2024, 1, 2),
        5,
        TransactionType::Out,
    );
    assert_eq!(
        doc.query,
        r#"{ projectBySlug(slug: "santiment") { ethTopTransactions(from: "2024-01-01T00:00:00Z", to: "2024-01-02T00:00:00Z", limit: 5, transactionType: OUT) { datetime trxValue trxHash fromAddress { address } toAddress { address } } } }"#
    );
}

#[test]
fn transaction_type_parsing() {
    assert_eq!("in".parse::<TransactionType>().unwrap(), TransactionType::In);
    assert_eq!(TransactionType::default(), TransactionType::All);
    assert!(matches!(
        "sideways".parse::<TransactionType>(),
        Err(SanError::InvalidArgument(_))
    ));
}

// ---------------------------------------------------------------------------
// Formatters
// ---------------------------------------------------------------------------

#[test]
fn top_transactions_flatten_addresses() {
    let data = json!({
        "ethTopTransactions": [
            {
                "datetime": "2024-01-01T13:45:00Z",
                "trxValue": "1500.5",
                "trxHash": "0xabc",
                "fromAddress": { "address": "0xfrom" },
                "toAddress": { "address": "0xto" }
            },
            {
                "datetime": "2024-01-01T09:00:00Z",
                "trxValue": 2,
                "trxHash": "0xdef",
                "fromAddress": null,
                "toAddress": { "address": null }
            }
        ]
    });
    let table = format_top_transactions(&data, "ethTopTransactions").unwrap();
    assert_eq!(table.headers, TOP_TRANSACTIONS_HEADERS);
    assert_eq!(
        table.rows[0],
        vec![
            Cell::text("2024-01-01"),
            Cell::Number(1500.5),
            Cell::text("0xfrom"),
            Cell::text("0xto"),
            Cell::text("0xabc"),
        ]
    );
    assert!(table.rows[1][2].is_null());
    assert!(table.rows[1][3].is_null());
}

#[test]
fn top_transactions_unknown_project_is_empty() {
    let table = format_top_transactions(&Value::Null, "tokenTopTransactions").unwrap();
    assert!(table.is_empty());
    assert_eq!(table.headers.len(), 5);
}

#[test]
fn eth_spent_reads_nested_series() {
    let data = json!({
        "ethSpentOverTime": [
            { "datetime": "2024-01-01T00:00:00Z", "ethSpent": 12.5 },
            { "datetime": "2024-01-02T00:00:00Z", "ethSpent": 0 }
        ]
    });
    let table = format_eth_spent_over_time(&data);
    assert_eq!(table.headers, vec!["Date", "ETH Spent"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[1], vec![Cell::text("2024-01-02"), Cell::Number(0.0)]);
}

#[test]
fn mining_pools_columns_in_order() {
    let data = json!([{ "datetime": "2024-01-01T00:00:00Z", "top3": 0.5, "top10": 0.8, "other": 0.2 }]);
    let table = format_mining_pools_distribution(&data);
    assert_eq!(
        table.rows[0],
        vec![
            Cell::text("2024-01-01"),
            Cell::Number(0.5),
            Cell::Number(0.8),
            Cell::Number(0.2),
        ]
    );
}

// ---------------------------------------------------------------------------
// OnchainQuery
// ---------------------------------------------------------------------------

#[test]
fn nvt_ratio_two_value_columns() {
    let stub = StubTransport::new();
    let sheets = sheets(&stub);
    stub.push_data(
        "nvtRatio",
        json!([{ "datetime": "2024-01-01T00:00:00Z", "nvtRatioTxVolume": 3.5, "nvtRatioCirculation": 40 }]),
    );

    let table = sheets
        .onchain()
        .nvt_ratio("santiment", days_ago(10), days_ago(1))
        .unwrap();
    assert_eq!(
        table.headers,
        vec!["Date", "NVT Ratio Transaction Volume", "NVT Ratio Circulation"]
    );
    assert_eq!(table.rows[0][2], Cell::Number(40.0));
}

#[test]
fn historical_balance_sends_address() {
    let stub = StubTransport::new();
    let sheets = premium_sheets(&stub);
    sheets
        .onchain()
        .historical_balance("ethereum", date(2020, 1, 1), date(2020, 2, 1), "0x1f3df0b8390bb8e9e322972c5e75583e87608ec2")
        .unwrap();
    assert!(stub
        .last_query()
        .contains(r#"address: "0x1f3df0b8390bb8e9e322972c5e75583e87608ec2""#));
}

#[test]
fn top_holders_sends_number_of_holders() {
    let stub = StubTransport::new();
    let sheets = premium_sheets(&stub);
    let table = sheets
        .onchain()
        .top_holders_percent_of_total_supply("santiment", 10, date(2020, 1, 1), date(2020, 1, 5))
        .unwrap();
    assert!(stub.last_query().contains("numberOfHolders: 10"));
    assert_eq!(
        table.headers,
        vec!["Date", "In Exchanges", "Outside Exchanges", "In Top Holders Total"]
    );
}

#[test]
fn token_top_transactions_via_project() {
    let stub = StubTransport::new();
    let sheets = premium_sheets(&stub);
    stub.push_data(
        "projectBySlug",
        json!({ "tokenTopTransactions": [{ "datetime": "2020-01-02T00:00:00Z", "trxValue": 7, "trxHash": "0x1" }] }),
    );

    let table = sheets
        .onchain()
        .token_top_transactions("santiment", date(2020, 1, 1), date(2020, 1, 5), 3)
        .unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0][4], Cell::text("0x1"));
    assert!(stub.last_query().contains("tokenTopTransactions("));
}

#[test]
fn exchange_funds_flow_denied_for_old_range() {
    let stub = StubTransport::new();
    let sheets = sheets(&stub);
    assert!(matches!(
        sheets
            .onchain()
            .exchange_funds_flow("santiment", days_ago(365), days_ago(300)),
        Err(SanError::PermissionDenied(_))
    ));
    assert_eq!(stub.request_count(), 0);
}
