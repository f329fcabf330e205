//! Price, OHLC and marketcap queries.

use chrono::NaiveDate;
use serde_json::Value;

use crate::config::DEFAULT_INTERVAL;
use crate::connection::Connection;
use crate::dates;
use crate::error::Result;
use crate::historic::HistoricDataGate;
use crate::models::{Cell, Table};
use crate::query_builder::{FieldBuilder, QueryDocument};

use super::metrics::{Currency, MetricQuery};
use super::{end_exclusive, gated_query, records, timeseries_table};

pub const PRICES_HEADERS: &[&str] = &["Date", "USD Price", "Volume"];
pub const OHLC_HEADERS: &[&str] = &[
    "Date",
    "Close Price USD",
    "High Price USD",
    "Low Price USD",
    "Open Price USD",
];
pub const PRICE_VOLUME_DIFF_HEADERS: &[&str] =
    &["Date", "Price Change", "Price Volume Diff", "Volume Change"];
pub const LATEST_PRICE_HEADERS: &[&str] = &["Slug", "Currency", "Latest Price"];
pub const DAILY_CLOSING_PRICE_HEADERS: &[&str] = &["Date", "Closing Price"];
pub const DAILY_AVG_MARKETCAP_HEADERS: &[&str] = &["Date", "Average Marketcap"];
pub const DAILY_CLOSING_MARKETCAP_HEADERS: &[&str] = &["Date", "Closing Marketcap"];
pub const PRICE_ABSOLUTE_CHANGE_HEADERS: &[&str] = &["Slug", "From", "To", "Absolute Change"];
pub const PRICE_PERCENT_CHANGE_HEADERS: &[&str] = &["Slug", "From", "To", "Percent Change"];

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn history_price_query(slug: &str, from: NaiveDate, to: NaiveDate) -> QueryDocument {
    FieldBuilder::new("historyPrice")
        .arg_str("slug", slug)
        .date_range(from, to)
        .arg_str("interval", DEFAULT_INTERVAL)
        .select(&["datetime", "priceUsd", "volume"])
        .build()
}

pub fn ohlc_query(slug: &str, from: NaiveDate, to: NaiveDate) -> QueryDocument {
    FieldBuilder::new("ohlc")
        .arg_str("slug", slug)
        .date_range(from, to)
        .arg_str("interval", DEFAULT_INTERVAL)
        .select(&[
            "datetime",
            "closePriceUsd",
            "highPriceUsd",
            "lowPriceUsd",
            "openPriceUsd",
        ])
        .build()
}

pub fn price_volume_diff_query(
    currency: Currency,
    slug: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> QueryDocument {
    FieldBuilder::new("priceVolumeDiff")
        .arg_str("currency", currency.as_str())
        .arg_str("slug", slug)
        .date_range(from, to)
        .arg_str("interval", DEFAULT_INTERVAL)
        .select(&["datetime", "priceChange", "priceVolumeDiff", "volumeChange"])
        .build()
}

pub fn latest_price_query(slug: &str) -> QueryDocument {
    FieldBuilder::new("projectBySlug")
        .arg_str("slug", slug)
        .select(&["priceUsd", "priceBtc"])
        .build()
}

// ---------------------------------------------------------------------------
// Formatters
// ---------------------------------------------------------------------------

pub fn format_prices(data: &Value) -> Table {
    timeseries_table(data, PRICES_HEADERS, &["priceUsd", "volume"])
}

pub fn format_ohlc(data: &Value) -> Table {
    timeseries_table(
        data,
        OHLC_HEADERS,
        &["closePriceUsd", "highPriceUsd", "lowPriceUsd", "openPriceUsd"],
    )
}

pub fn format_price_volume_diff(data: &Value) -> Table {
    timeseries_table(
        data,
        PRICE_VOLUME_DIFF_HEADERS,
        &["priceChange", "priceVolumeDiff", "volumeChange"],
    )
}

pub fn format_daily_closing_price(data: &Value) -> Table {
    timeseries_table(data, DAILY_CLOSING_PRICE_HEADERS, &["closePriceUsd"])
}

/// One row: the slug, the currency and the latest price (null if unknown).
pub fn format_latest_price(slug: &str, currency: Currency, data: &Value) -> Table {
    let field = match currency {
        Currency::Usd => "priceUsd",
        Currency::Btc => "priceBtc",
    };
    let mut table = Table::new(LATEST_PRICE_HEADERS);
    if !data.is_null() {
        table.push(vec![
            Cell::text(slug),
            Cell::text(currency.as_str()),
            Cell::number(data.get(field)),
        ]);
    }
    table
}

/// First and last known USD prices of a `historyPrice` payload.
fn price_bounds(data: &Value) -> Option<(f64, f64)> {
    let prices: Vec<f64> = records(data)
        .iter()
        .filter_map(|item| Cell::number(item.get("priceUsd")).as_f64())
        .collect();
    match (prices.first(), prices.last()) {
        (Some(first), Some(last)) => Some((*first, *last)),
        _ => None,
    }
}

fn change_row(slug: &str, from: NaiveDate, to: NaiveDate, change: Option<f64>) -> Vec<Cell> {
    vec![
        Cell::text(slug),
        Cell::text(dates::format_date(from)),
        Cell::text(dates::format_date(to)),
        Cell::from_opt_f64(change),
    ]
}

pub fn format_price_absolute_change(
    slug: &str,
    from: NaiveDate,
    to: NaiveDate,
    data: &Value,
) -> Table {
    let change = price_bounds(data).map(|(first, last)| last - first);
    Table::with_rows(
        PRICE_ABSOLUTE_CHANGE_HEADERS,
        vec![change_row(slug, from, to, change)],
    )
}

/// Percent change between the first and last price; null when the first
/// price is zero or missing.
pub fn format_price_percent_change(
    slug: &str,
    from: NaiveDate,
    to: NaiveDate,
    data: &Value,
) -> Table {
    let change = price_bounds(data)
        .filter(|(first, _)| *first != 0.0)
        .map(|(first, last)| (last - first) / first * 100.0);
    Table::with_rows(
        PRICE_PERCENT_CHANGE_HEADERS,
        vec![change_row(slug, from, to, change)],
    )
}

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

/// Prices, OHLC, marketcaps and price changes.
pub struct PriceQuery<'a> {
    conn: &'a Connection,
    gate: &'a HistoricDataGate,
}

impl<'a> PriceQuery<'a> {
    /// Create a new `PriceQuery` bound to the given connection and gate.
    pub fn new(conn: &'a Connection, gate: &'a HistoricDataGate) -> Self {
        Self { conn, gate }
    }

    /// Daily USD price and volume.
    pub fn prices(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        let doc = history_price_query(slug, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "historyPrice")?;
        Ok(end_exclusive(format_prices(&data), to))
    }

    /// Daily open, high, low and close prices in USD.
    pub fn ohlc(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        let doc = ohlc_query(slug, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "ohlc")?;
        Ok(end_exclusive(format_ohlc(&data), to))
    }

    /// Price and trading volume change, with the difference indicator.
    pub fn price_volume_diff(
        &self,
        currency: Currency,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Table> {
        let doc = price_volume_diff_query(currency, slug, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "priceVolumeDiff")?;
        Ok(end_exclusive(format_price_volume_diff(&data), to))
    }

    /// Current price; not subject to the historic-data gate.
    pub fn latest_price(&self, slug: &str, currency: Currency) -> Result<Table> {
        let data = self
            .conn
            .graphql_query(&latest_price_query(slug), "projectBySlug")?;
        Ok(format_latest_price(slug, currency, &data))
    }

    /// Closing USD price of a single day.
    pub fn daily_closing_price(&self, slug: &str, day: NaiveDate) -> Result<Table> {
        let (from, to) = dates::day_range(day)?;
        let doc = ohlc_query(slug, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "ohlc")?;
        Ok(end_exclusive(format_daily_closing_price(&data), to))
    }

    /// Average USD marketcap over a single day.
    pub fn daily_avg_marketcap(&self, slug: &str, day: NaiveDate) -> Result<Table> {
        let (from, to) = dates::day_range(day)?;
        MetricQuery::new(self.conn, self.gate).fetch(
            "marketcap_usd",
            slug,
            from,
            to,
            Some("AVG"),
            DAILY_AVG_MARKETCAP_HEADERS,
        )
    }

    /// USD marketcap at the close of a single day.
    pub fn daily_closing_marketcap(&self, slug: &str, day: NaiveDate) -> Result<Table> {
        let (from, to) = dates::day_range(day)?;
        MetricQuery::new(self.conn, self.gate).fetch(
            "marketcap_usd",
            slug,
            from,
            to,
            Some("LAST"),
            DAILY_CLOSING_MARKETCAP_HEADERS,
        )
    }

    /// Last price minus first price over `[from, to)`.
    pub fn price_absolute_change(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        let doc = history_price_query(slug, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "historyPrice")?;
        Ok(format_price_absolute_change(slug, from, to, &data))
    }

    /// Change from first to last price over `[from, to)`, in percent.
    pub fn price_percent_change(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        let doc = history_price_query(slug, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "historyPrice")?;
        Ok(format_price_percent_change(slug, from, to, &data))
    }
}
