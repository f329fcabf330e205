//! Generic `getMetric` time series.
//!
//! Most on-chain and development metrics share one query shape and render as
//! a two-column `Date | Value` table.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::Value;

use crate::config::{DEFAULT_INTERVAL, SUPPORTED_CURRENCIES, TIME_BOUNDS};
use crate::connection::Connection;
use crate::error::{Result, SanError};
use crate::historic::HistoricDataGate;
use crate::models::Table;
use crate::query_builder::{enum_value, FieldBuilder, QueryDocument};

use super::{end_exclusive, gated_query, timeseries_table};

pub const METRIC_HEADERS: &[&str] = &["Date", "Value"];

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Usd,
    Btc,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Btc => "BTC",
        }
    }

    /// Lowercase form used in metric names (`mvrv_usd`).
    pub fn suffix(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Btc => "btc",
        }
    }
}

impl FromStr for Currency {
    type Err = SanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "BTC" => Ok(Currency::Btc),
            other => Err(SanError::InvalidArgument(format!(
                "Currency '{}' is not supported. Supported currencies: {}",
                other,
                SUPPORTED_CURRENCIES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Builders / formatters
// ---------------------------------------------------------------------------

/// Append the timebound suffix (`mvrv_usd` + `365d` -> `mvrv_usd_365d`).
pub fn metric_name(base: &str, time_bound: Option<&str>) -> Result<String> {
    match time_bound.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(base.to_string()),
        Some(bound) if TIME_BOUNDS.contains(&bound) => Ok(format!("{}_{}", base, bound)),
        Some(bound) => Err(SanError::InvalidArgument(format!(
            "Time bound '{}' is not supported. Supported time bounds: {}",
            bound,
            TIME_BOUNDS.join(", ")
        ))),
    }
}

/// `getMetric(metric) { timeseriesData(...) { datetime value } }`
///
/// `aggregation` is an enum value such as `AVG` or `LAST`.
pub fn get_metric_query(
    metric: &str,
    slug: &str,
    from: NaiveDate,
    to: NaiveDate,
    aggregation: Option<&str>,
) -> Result<QueryDocument> {
    let mut series = FieldBuilder::new("timeseriesData")
        .arg_str("slug", slug)
        .date_range(from, to)
        .arg_str("interval", DEFAULT_INTERVAL);
    if let Some(aggregation) = aggregation {
        series = series.arg_raw("aggregation", enum_value(aggregation)?);
    }
    let series = series.select(&["datetime", "value"]);

    Ok(FieldBuilder::new("getMetric")
        .arg_str("metric", metric)
        .nested(series)
        .build())
}

/// Format the `getMetric` payload (an object holding `timeseriesData`).
pub fn format_get_metric(data: &Value, headers: &[&str]) -> Table {
    let series = data.get("timeseriesData").unwrap_or(&Value::Null);
    timeseries_table(series, headers, &["value"])
}

// ---------------------------------------------------------------------------
// MetricQuery
// ---------------------------------------------------------------------------

/// Daily series served by `getMetric`, each rendered as `Date | Value`.
pub struct MetricQuery<'a> {
    conn: &'a Connection,
    gate: &'a HistoricDataGate,
}

impl<'a> MetricQuery<'a> {
    /// Create a new `MetricQuery` bound to the given connection and gate.
    pub fn new(conn: &'a Connection, gate: &'a HistoricDataGate) -> Self {
        Self { conn, gate }
    }

    /// Fetch any metric by its API name as a `Date | Value` table.
    pub fn get_metric(&self, metric: &str, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.fetch(metric, slug, from, to, None, METRIC_HEADERS)
    }

    /// Shared by the price module for single-day aggregated metrics.
    pub(crate) fn fetch(
        &self,
        metric: &str,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
        aggregation: Option<&str>,
        headers: &[&str],
    ) -> Result<Table> {
        let doc = get_metric_query(metric, slug, from, to, aggregation)?;
        let data = gated_query(self.conn, self.gate, from, to, &doc, "getMetric")?;
        Ok(end_exclusive(format_get_metric(&data, headers), to))
    }

    /// Unique addresses active each day (`daily_active_addresses`).
    pub fn active_addresses(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("daily_active_addresses", slug, from, to)
    }

    /// Addresses that deposited to an exchange each day.
    pub fn active_deposits(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("active_deposits", slug, from, to)
    }

    /// Token age destroyed by the day's transfers.
    pub fn age_destroyed(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("age_destroyed", slug, from, to)
    }

    /// Same series as [`age_destroyed`](Self::age_destroyed), under its older name.
    pub fn token_age_consumed(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("age_destroyed", slug, from, to)
    }

    /// Development activity, with non-development GitHub events filtered out.
    pub fn dev_activity(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("dev_activity", slug, from, to)
    }

    /// Every GitHub event of the project's organizations.
    pub fn github_activity(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("github_activity", slug, from, to)
    }

    /// Tokens held on known exchange wallets.
    pub fn exchange_balance(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("exchange_balance", slug, from, to)
    }

    /// Tokens moved into exchange wallets.
    pub fn exchange_inflow(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("exchange_inflow", slug, from, to)
    }

    /// Tokens moved out of exchange wallets.
    pub fn exchange_outflow(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("exchange_outflow", slug, from, to)
    }

    /// Percent of the total supply held on exchanges.
    pub fn exchange_percent_of_supply(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("percent_of_total_supply_on_exchanges", slug, from, to)
    }

    /// Gas used by the day's transactions.
    pub fn gas_used(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("gas_used", slug, from, to)
    }

    /// Average age of the tokens in circulation, in days.
    pub fn mean_age(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("mean_age", slug, from, to)
    }

    /// Tokens held by miner addresses.
    pub fn miners_balance(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("miners_balance", slug, from, to)
    }

    /// New addresses seen for the first time each day.
    pub fn network_growth(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("network_growth", slug, from, to)
    }

    /// Total tokens transferred each day.
    pub fn transaction_volume(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("transaction_volume", slug, from, to)
    }

    /// Average number of times a token changed hands each day.
    pub fn velocity(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("velocity", slug, from, to)
    }

    /// Unique tokens moved each day, optionally limited to tokens that had
    /// been idle for `time_bound`.
    pub fn token_circulation(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
        time_bound: Option<&str>,
    ) -> Result<Table> {
        let metric = metric_name("circulation", time_bound)?;
        self.get_metric(&metric, slug, from, to)
    }

    /// Average acquisition price of the circulating tokens in `currency`.
    pub fn mean_realized_price(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
        currency: Currency,
        time_bound: Option<&str>,
    ) -> Result<Table> {
        let base = format!("mean_realized_price_{}", currency.suffix());
        let metric = metric_name(&base, time_bound)?;
        self.get_metric(&metric, slug, from, to)
    }

    /// Market value to realized value ratio.
    pub fn mvrv_ratio(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
        time_bound: Option<&str>,
    ) -> Result<Table> {
        let metric = metric_name("mvrv_usd", time_bound)?;
        self.get_metric(&metric, slug, from, to)
    }

    /// Difference between the long-term and short-term MVRV.
    pub fn mvrv_long_short_diff(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        self.get_metric("mvrv_long_short_diff_usd", slug, from, to)
    }

    /// Realized value in USD.
    pub fn realized_value(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
        time_bound: Option<&str>,
    ) -> Result<Table> {
        let metric = metric_name("realized_value_usd", time_bound)?;
        self.get_metric(&metric, slug, from, to)
    }
}
