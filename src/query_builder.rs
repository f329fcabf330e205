//! GraphQL query document construction.
//!
//! The API takes no variables channel from this client: arguments are inlined
//! into the query text. Every string argument goes through [`quote`], never
//! through raw interpolation.
//!
//! # Example
//!
//! ```rust
//! use san_sheets::query_builder::FieldBuilder;
//! let doc = FieldBuilder::new("projectBySlug")
//!     .arg_str("slug", "santiment")
//!     .select(&["ticker", "name"])
//!     .build();
//! assert!(doc.query.contains(r#"projectBySlug(slug: "santiment")"#));
//! ```

use crate::dates;
use crate::error::{Result, SanError};
use chrono::NaiveDate;
use serde::Serialize;

/// The request body sent to the GraphQL endpoint: `{"query": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDocument {
    pub query: String,
}

impl QueryDocument {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Quote and escape a string as a GraphQL string literal.
///
/// JSON string escaping is a subset of GraphQL's string syntax, so
/// `serde_json` does the escaping.
pub fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// `slug: "<slug>"`
pub fn slug_param(slug: &str) -> String {
    format!("slug: {}", quote(slug))
}

/// Normalize a GraphQL enum value (`telegram_chats_overview` ->
/// `TELEGRAM_CHATS_OVERVIEW`).
///
/// Enum values are inlined unquoted, so anything other than ASCII letters,
/// digits and `_` is rejected.
pub fn enum_value(value: &str) -> Result<String> {
    let value = value.trim().to_ascii_uppercase();
    let valid = !value.is_empty()
        && !value.starts_with(|c: char| c.is_ascii_digit())
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(value)
    } else {
        Err(SanError::InvalidArgument(format!(
            "'{}' is not a valid enum value",
            value
        )))
    }
}

/// Builds a single top-level field selection.
///
/// Arguments are rendered in insertion order; nested selections are passed
/// through verbatim.
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    field: String,
    alias: Option<String>,
    args: Vec<(String, String)>,
    selection: Vec<String>,
}

impl FieldBuilder {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            alias: None,
            args: Vec::new(),
            selection: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Add a quoted string argument.
    pub fn arg_str(mut self, name: &str, value: &str) -> Self {
        self.args.push((name.to_string(), quote(value)));
        self
    }

    /// Add an unquoted argument (numbers, enum values).
    pub fn arg_raw(mut self, name: &str, value: impl ToString) -> Self {
        self.args.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a date argument as a quoted midnight-UTC timestamp.
    pub fn arg_date(self, name: &str, date: NaiveDate) -> Self {
        let value = dates::to_graphql_datetime(date);
        self.arg_str(name, &value)
    }

    /// Shorthand for `from`/`to` date arguments.
    pub fn date_range(self, from: NaiveDate, to: NaiveDate) -> Self {
        self.arg_date("from", from).arg_date("to", to)
    }

    pub fn select(mut self, fields: &[&str]) -> Self {
        self.selection.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    /// Add a nested field selection rendered by another builder.
    pub fn nested(mut self, inner: FieldBuilder) -> Self {
        self.selection.push(inner.render());
        self
    }

    /// Render the field without the surrounding document braces.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(alias) = &self.alias {
            out.push_str(alias);
            out.push_str(": ");
        }
        out.push_str(&self.field);
        if !self.args.is_empty() {
            let args: Vec<String> = self
                .args
                .iter()
                .map(|(name, value)| format!("{}: {}", name, value))
                .collect();
            out.push('(');
            out.push_str(&args.join(", "));
            out.push(')');
        }
        if !self.selection.is_empty() {
            out.push_str(" { ");
            out.push_str(&self.selection.join(" "));
            out.push_str(" }");
        }
        out
    }

    /// Wrap the field in an anonymous query document.
    pub fn build(&self) -> QueryDocument {
        QueryDocument::new(format!("{{ {} }}", self.render()))
    }
}
