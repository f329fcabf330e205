//! Social volume, dominance, Twitter and trending-word queries.

use chrono::NaiveDate;
use serde_json::Value;

use crate::config::DEFAULT_INTERVAL;
use crate::connection::Connection;
use crate::error::Result;
use crate::historic::HistoricDataGate;
use crate::models::{Cell, Table, TrendingWords};
use crate::query_builder::{enum_value, FieldBuilder, QueryDocument};

use super::{end_exclusive, gated_query, parse_list, records, timeseries_table};

pub const SOCIAL_VOLUME_PROJECTS_HEADERS: &[&str] = &["Social Volume Projects"];
pub const SOCIAL_VOLUME_HEADERS: &[&str] = &["Date", "Mentions Count"];
pub const SOCIAL_DOMINANCE_HEADERS: &[&str] = &["Date", "Dominance"];
pub const TWITTER_HEADERS: &[&str] = &["Date", "Followers Count"];
pub const TRENDING_WORDS_HEADERS: &[&str] = &["Date", "Word", "Score"];

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn social_volume_projects_query() -> QueryDocument {
    QueryDocument::new("{ socialVolumeProjects }")
}

/// `social_volume_type` is an API enum, e.g. `TELEGRAM_CHATS_OVERVIEW`.
pub fn social_volume_query(
    slug: &str,
    from: NaiveDate,
    to: NaiveDate,
    social_volume_type: &str,
) -> Result<QueryDocument> {
    Ok(FieldBuilder::new("socialVolume")
        .arg_str("slug", slug)
        .date_range(from, to)
        .arg_str("interval", DEFAULT_INTERVAL)
        .arg_raw("socialVolumeType", enum_value(social_volume_type)?)
        .select(&["datetime", "mentionsCount"])
        .build())
}

pub fn social_dominance_query(
    slug: &str,
    from: NaiveDate,
    to: NaiveDate,
    source: &str,
) -> Result<QueryDocument> {
    Ok(FieldBuilder::new("socialDominance")
        .arg_str("slug", slug)
        .date_range(from, to)
        .arg_str("interval", DEFAULT_INTERVAL)
        .arg_raw("source", enum_value(source)?)
        .select(&["datetime", "dominance"])
        .build())
}

pub fn history_twitter_data_query(slug: &str, from: NaiveDate, to: NaiveDate) -> QueryDocument {
    FieldBuilder::new("historyTwitterData")
        .arg_str("slug", slug)
        .date_range(from, to)
        .arg_str("interval", DEFAULT_INTERVAL)
        .select(&["datetime", "followersCount"])
        .build()
}

pub fn trending_words_query(size: u32, from: NaiveDate, to: NaiveDate) -> QueryDocument {
    FieldBuilder::new("getTrendingWords")
        .arg_raw("size", size)
        .date_range(from, to)
        .arg_str("interval", DEFAULT_INTERVAL)
        .select(&["datetime", "topWords { word score }"])
        .build()
}

// ---------------------------------------------------------------------------
// Formatters
// ---------------------------------------------------------------------------

/// One slug per row.
pub fn format_social_volume_projects(data: &Value) -> Table {
    let mut table = Table::new(SOCIAL_VOLUME_PROJECTS_HEADERS);
    for slug in records(data) {
        table.push(vec![Cell::text_value(Some(slug))]);
    }
    table
}

pub fn format_social_volume(data: &Value) -> Table {
    timeseries_table(data, SOCIAL_VOLUME_HEADERS, &["mentionsCount"])
}

pub fn format_social_dominance(data: &Value) -> Table {
    timeseries_table(data, SOCIAL_DOMINANCE_HEADERS, &["dominance"])
}

pub fn format_history_twitter_data(data: &Value) -> Table {
    timeseries_table(data, TWITTER_HEADERS, &["followersCount"])
}

/// One row per (day, word), days in server order, words in rank order.
pub fn format_trending_words(data: Value) -> Result<Table> {
    let days: Vec<TrendingWords> = parse_list(data)?;
    let mut table = Table::new(TRENDING_WORDS_HEADERS);
    for day in &days {
        let date = Cell::date_str(day.datetime.as_deref());
        for word in &day.top_words {
            table.push(vec![
                date.clone(),
                Cell::from_opt_string(word.word.as_ref()),
                Cell::from_opt_f64(word.score),
            ]);
        }
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// SocialQuery
// ---------------------------------------------------------------------------

/// Social media series and trending words.
pub struct SocialQuery<'a> {
    conn: &'a Connection,
    gate: &'a HistoricDataGate,
}

impl<'a> SocialQuery<'a> {
    /// Create a new `SocialQuery` bound to the given connection and gate.
    pub fn new(conn: &'a Connection, gate: &'a HistoricDataGate) -> Self {
        Self { conn, gate }
    }

    /// Slugs that have social volume data. Not date-bound.
    pub fn social_volume_projects(&self) -> Result<Table> {
        let data = self
            .conn
            .graphql_query(&social_volume_projects_query(), "socialVolumeProjects")?;
        Ok(format_social_volume_projects(&data))
    }

    /// Mentions per day in the channels named by `social_volume_type`.
    pub fn social_volume(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
        social_volume_type: &str,
    ) -> Result<Table> {
        let doc = social_volume_query(slug, from, to, social_volume_type)?;
        let data = gated_query(self.conn, self.gate, from, to, &doc, "socialVolume")?;
        Ok(end_exclusive(format_social_volume(&data), to))
    }

    /// The project's share of all crypto mentions per day in `source`.
    pub fn social_dominance(
        &self,
        slug: &str,
        from: NaiveDate,
        to: NaiveDate,
        source: &str,
    ) -> Result<Table> {
        let doc = social_dominance_query(slug, from, to, source)?;
        let data = gated_query(self.conn, self.gate, from, to, &doc, "socialDominance")?;
        Ok(end_exclusive(format_social_dominance(&data), to))
    }

    /// Twitter follower count per day.
    pub fn history_twitter_data(&self, slug: &str, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        let doc = history_twitter_data_query(slug, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "historyTwitterData")?;
        Ok(end_exclusive(format_history_twitter_data(&data), to))
    }

    /// Top `size` trending words per day.
    pub fn emerging_trends(&self, size: u32, from: NaiveDate, to: NaiveDate) -> Result<Table> {
        let doc = trending_words_query(size, from, to);
        let data = gated_query(self.conn, self.gate, from, to, &doc, "getTrendingWords")?;
        format_trending_words(data)
    }
}
