//! Query modules for the Santiment API.
//!
//! Each module pairs pure query builders and response formatters with a query
//! struct that borrows a [`Connection`] and a [`HistoricDataGate`] and exposes
//! one method per sheet function, each returning a [`Table`].

pub mod metrics;
pub mod onchain;
pub mod prices;
pub mod projects;
pub mod social;

pub use metrics::{Currency, MetricQuery};
pub use onchain::{OnchainQuery, TransactionType};
pub use prices::PriceQuery;
pub use projects::ProjectQuery;
pub use social::SocialQuery;

use crate::config::DATE_FORMAT;
use crate::connection::Connection;
use crate::error::Result;
use crate::historic::HistoricDataGate;
use crate::models::{Cell, Table};
use crate::query_builder::QueryDocument;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Run a date-range query: gate first, network second.
pub(crate) fn gated_query(
    conn: &Connection,
    gate: &HistoricDataGate,
    from: NaiveDate,
    to: NaiveDate,
    doc: &QueryDocument,
    field: &str,
) -> Result<Value> {
    gate.check(from, to)?;
    conn.graphql_query(doc, field)
}

/// Format a list of `{datetime, <fields>...}` records.
///
/// The first header labels the date column; the rest line up with `fields`.
/// A null or non-array payload yields a header-only table.
pub fn timeseries_table(data: &Value, headers: &[&str], fields: &[&str]) -> Table {
    let mut table = Table::new(headers);
    for item in records(data) {
        let mut row = Vec::with_capacity(fields.len() + 1);
        row.push(Cell::date(item.get("datetime")));
        for field in fields {
            row.push(Cell::number(item.get(*field)));
        }
        table.push(row);
    }
    table
}

/// Drop rows dated on or after `to`.
///
/// Daily series cover `[from, to)`, but the API also answers with the `to`
/// day itself. Rows whose first cell is not a date are kept.
pub fn end_exclusive(mut table: Table, to: NaiveDate) -> Table {
    table.rows.retain(|row| {
        row.first()
            .and_then(Cell::as_str)
            .and_then(|day| NaiveDate::parse_from_str(day, DATE_FORMAT).ok())
            .map_or(true, |day| day < to)
    });
    table
}

/// The records of a list payload; nothing for null.
pub fn records(data: &Value) -> &[Value] {
    data.as_array().map(|a| a.as_slice()).unwrap_or(&[])
}

/// Deserialize a list payload, treating null as empty.
pub fn parse_list<T: DeserializeOwned>(data: Value) -> Result<Vec<T>> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(data)?)
}

/// Deserialize an object payload, treating null as absent.
pub fn parse_object<T: DeserializeOwned>(data: Value) -> Result<Option<T>> {
    if data.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(data)?))
}
