//! On-chain series with dedicated API fields, and top transactions.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::Value;

use crate::config::DEFAULT_INTERVAL;
use crate::connection::Connection;
use crate::error::{Result, SanError};
use crate::historic::HistoricDataGate;
use crate::models::{Cell, Table, Transaction};
use crate::query_builder::{FieldBuilder, QueryDocument};

use super::{end_exclusive, gated_query, parse_list, timeseries_table};

pub const NVT_RATIO_HEADERS: &[&str] = &[
    "Date",
    "NVT Ratio Transaction Volume",
    "NVT Ratio Circulation",
];
pub const EXCHANGE_FUNDS_FLOW_HEADERS: &[&str] = &["Date", "In/Out Difference"];
pub const ETH_SPENT_OVER_TIME_HEADERS: &[&str] = &["Date", "ETH Spent"];
pub const HISTORICAL_BALANCE_HEADERS: &[&str] = &["Date", "Balance"];
pub const MINING_POOLS_DISTRIBUTION_HEADERS: &[&str] = &["Date", "Top 3", "Top 10", "Other"];
pub const TOP_HOLDERS_HEADERS: &[&str] = &[
    "Date",
    "In Exchanges",
    "Outside Exchanges",
    "In Top Holders Total",
];
pub const TOP_TRANSACTIONS_HEADERS: &[&str] = &[
    "Date",
    "Value",
    "From Address",
    "To Address",
    "Transaction Hash",
];

/// Direction filter for top ETH transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionType {
    #[default]
    All,
    In,
    Out,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::All => "ALL",
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
        }
    }
}

impl FromStr for TransactionType {
    type Err = SanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(TransactionType::All),
            "IN" => Ok(TransactionType::In),
            "OUT" => Ok(TransactionType::Out),
            other => Err(SanError::InvalidArgument(format!(
                "Transaction type '{}' is not supported. Use ALL, IN or OUT",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

fn daily_series(field: &str, slug: &str, from: NaiveDate, to: NaiveDate) -> FieldBuilder {
    FieldBuilder::new(field)
        .arg_str("slug", slug)
        .date_range(from, to)
        .arg_str("interval", DEFAULT_INTERVAL)
}

pub fn nvt_ratio_query(slug: &str, from: NaiveDate, to: NaiveDate) -> QueryDocument {
    daily_series("nvtRatio", slug, from, to)
        .select(&["datetime", "nvtRatioTxVolume", "nvtRatioCirculation"])
        .build()
}

pub fn exchange_funds_flow_query(slug: &str, from: NaiveDate, to: NaiveDate) -> QueryDocument {
    daily_series("exchangeFundsFlow", slug, from, to)
        .select(&["datetime", "inOutDifference"])
        .build()
}

pub fn eth_spent_over_time_query(slug: &str, from: NaiveDate, to: NaiveDate) -> QueryDocument {
    let series = FieldBuilder::new("ethSpentOverTime")
        .date_range(from, to)
        .arg_str("interval", DEFAULT_INTERVAL)
        .select(&["datetime", "ethSpent"]);
    FieldBuilder::new("projectBySlug")
        .arg_str("slug", slug)
        .nested(series)
        .build()
}

pub fn historical_balance_query(
    slug: &str,
    from: NaiveDate,
    to: NaiveDate,
    address: &str,
) -> QueryDocument {
    FieldBuilder::new("historicalBalance")
        .arg_str("slug", slug)
        .arg_str("address", address)
        .date_range(from, to)
        .arg_str("interval", DEFAULT_INTERVAL)
        .select(&["datetime", "balance"])
        .build()
}

pub fn mining_pools_distribution_query(slug: &str, from: NaiveDate, to: NaiveDate) -> QueryDocument {
    daily_series("miningPoolsDistribution", slug, from, to)
        .select(&["datetime", "top3", "top10", "other"])
        .build()
}

pub fn top_holders_query(
    slug: &str,
    number_of_holders: u32,
    from: NaiveDate,
    to: NaiveDate,
) -> QueryDocument {
    FieldBuilder::new("topHoldersPercentOfTotalSupply")
        .arg_str("slug", slug)
        .arg_raw("numberOfHolders", number_of_holders)
        .date_range(from, to)
        .select(&[
            "datetime",
            "inExchanges",
            "outsideExchanges",
            "inTopHoldersTotal",
        ])
        .build()
}

const TRANSACTION_FIELDS: &[&str] = &[
    "datetime",
    "trxValue",
    "trxHash",
    "fromAddress { address }",
    "toAddress { address }",
];

pub fn eth_top_transactions_query(
    slug: &str,
    from: NaiveDate,
    to: NaiveDate,
    limit: u32,
    transaction_type: TransactionType,
) -> QueryDocument {
    let transactions = FieldBuilder::new("ethTopTransactions")
        .date_range(from, to)
        .arg_raw("limit", limit)
        .arg_raw("transactionType", transaction_type.as_str())
        .select(TRANSACTION_FIELDS);
    FieldBuilder::new("projectBySlug")
        .arg_str("slug", slug)
        .nested(transactions)
        .build()
}

pub fn token_top_transactions_query(
    slug: &str,
    from: NaiveDate,
    to: NaiveDate,
    limit: u32,
) -> QueryDocument {
    let transactions = FieldBuilder::new("tokenTopTransactions")
        .date_range(from, to)
        .arg_raw("limit", limit)
        .select(TRANSACTION_FIELDS);
    FieldBuilder::new("projectBySlug")
        .arg_str("slug", slug)
        .nested(transactions)
        .build()
}

// ---------------------------------------------------------------------------
// Formatters
// ---------------------------------------------------------------------------

pub fn format_nvt_ratio(data: &Value) -> Table {
    timeseries_table(
        data,
        NVT_RATIO_HEADERS,
        &["nvtRatioTxVolume", "nvtRatioCirculation"],
    )
}

pub fn format_exchange_funds_flow(data: &Value) -> Table {
    timeseries_table(data, EXCHANGE_FUNDS_FLOW_HEADERS, &["inOutDifference"])
}

/// `data` is the `projectBySlug` object.
pub fn format_eth_spent_over_time(data: &Value) -> Table {
    let series = data.get("ethSpentOverTime").unwrap_or(&Value::Null);
    timeseries_table(series, ETH_SPENT_OVER_TIME_HEADERS, &["ethSpent"])
}

pub fn format_historical_balance(data: &Value) -> Table {
    timeseries_table(data, HISTORICAL_BALANCE_HEADERS, &["balance"])
}

pub fn format_mining_pools_distribution(data: &Value) -> Table {
    timeseries_table(
        data,
        MINING_POOLS_DISTRIBUTION_HEADERS,
        &["top3", "top10", "other"],
    )
}

pub fn format_top_holders(data: &Value) -> Table {
    timeseries_table(
        data,
        TOP_HOLDERS_HEADERS,
        &["inExchanges", "outsideExchanges", "inTopHoldersTotal"],
    )
}

/// `data` is the `projectBySlug` object; `field` names the transaction list.
pub fn format_top_transactions(data: &Value, field: &str) -> Result<Table> {
    let list = data.get(field).cloned().unwrap_or(Value::Null);
    let transactions: Vec<Transaction> = parse_list(list)?;

    let mut table = Table::new(TOP_TRANSACTIONS_HEADERS);
    for trx in &transactions {
        table.push(vec![
            Cell::date_str(trx.datetime.as_deref()),
            Cell::from_opt_f64(trx.trx_value),
            Cell::from_opt_string(trx.from_address()),
            Cell::from_opt_string(trx.to_address()),
            Cell::from_opt_string(trx.trx_hash.as_ref()),
        ]);
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// OnchainQuery
// ---------------------------------------------------------------------------

/// On-chain series with their own API fields, plus top transactions.
pub struct OnchainQuery<'a> {
    conn: &'a Connection,
    gate: &'a HistoricDataGate,
}

impl<'a> OnchainQuery<'a> {
    /// Create a new `OnchainQuery` bound to the given connection and gate.
    pub fn new(conn: &'a Connection, gate: &'a HistoricDataGate) -> Self {
        Self { conn, gate }
    }

    /// Network value to transactions ratio, by transaction volume and by circulation.
    pub fn nvt_ratio(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        let doc = nvt_ratio_query(slug, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "nvtRatio")?;
        Ok(end_exclusive(format_nvt_ratio(&data), to))
    }

    /// Exchange inflow minus outflow per day.
    pub fn exchange_funds_flow(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        let doc = exchange_funds_flow_query(slug, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "exchangeFundsFlow")?;
        Ok(end_exclusive(format_exchange_funds_flow(&data), to))
    }

    /// ETH spent from the project's team wallets per day.
    pub fn eth_spent_over_time(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        let doc = eth_spent_over_time_query(slug, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "projectBySlug")?;
        Ok(end_exclusive(format_eth_spent_over_time(&data), to))
    }

    /// Daily balance of `address` in the project's token.
    pub fn historical_balance(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
        address: &str,
    ) -> Result<Table> {
        let doc = historical_balance_query(slug, from, to, address);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "historicalBalance")?;
        Ok(end_exclusive(format_historical_balance(&data), to))
    }

    /// Share of mined blocks by the top 3 pools, the top 10 and the rest.
    pub fn mining_pools_distribution(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        let doc = mining_pools_distribution_query(slug, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "miningPoolsDistribution")?;
        Ok(end_exclusive(format_mining_pools_distribution(&data), to))
    }

    /// Supply held by the top `number_of_holders` addresses, split by
    /// exchange and non-exchange wallets.
    pub fn top_holders_percent_of_total_supply(
        &self,
        slug: &str,
        number_of_holders: u32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Table> {
        let doc = top_holders_query(slug, number_of_holders, from, to);
        let data = gated_query(
            self.conn,
            self.gate,
            from,
            to,
            &doc,
            "topHoldersPercentOfTotalSupply",
        )?;
        Ok(end_exclusive(format_top_holders(&data), to))
    }

    /// Largest ETH transfers of the project's team wallets.
    pub fn eth_top_transactions(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
        limit: u32,
        transaction_type: TransactionType,
    ) -> Result<Table> {
        let doc = eth_top_transactions_query(slug, from, to, limit, transaction_type);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "projectBySlug")?;
        format_top_transactions(&data, "ethTopTransactions")
    }

    /// Largest transfers of the project's token.
    pub fn token_top_transactions(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
        limit: u32,
    ) -> Result<Table> {
        let doc = token_top_transactions_query(slug, from, to, limit);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "projectBySlug")?;
        format_top_transactions(&data, "tokenTopTransactions")
    }
}
