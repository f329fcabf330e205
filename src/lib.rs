//! Santiment API client for spreadsheets.
//!
//! Queries the Santiment GraphQL API and formats every result as a
//! [`Table`]: a header row plus body rows, ready to drop into a sheet.
//! Date-bound queries are checked locally against the caller's
//! historic-data access before any request is sent.
//!
//! # Quick start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use san_sheets::SanSheets;
//!
//! let sheets = SanSheets::builder().build().unwrap();
//!
//! let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let to = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
//! let prices = sheets.prices().prices("santiment", from, to).unwrap();
//!
//! // Or by name, the way a sheet calls it
//! let same = sheets.call("SAN_PRICES", &["santiment", "2024-01-01", "2024-01-08"]).unwrap();
//! ```

pub mod api_key;
pub mod config;
pub mod connection;
pub mod dates;
pub mod error;
pub mod functions;
pub mod historic;
pub mod models;
pub mod properties;
pub mod queries;
pub mod query_builder;

pub use api_key::{AddKeyOutcome, ApiKeyManager};
pub use connection::{Connection, HttpResponse, HttpTransport, RequestOptions, Transport};
pub use error::{Result, SanError};
pub use functions::SheetFunction;
pub use historic::HistoricDataGate;
pub use models::{Cell, Table};
pub use properties::{FilePropertyStore, MemoryPropertyStore, PropertyStore};

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// SanSheetsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SanSheets`] instance.
///
/// Use [`SanSheets::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](SanSheetsBuilder::build).
pub struct SanSheetsBuilder {
    url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    historic_window_days: u32,
    store: Option<Box<dyn PropertyStore>>,
    properties_path: Option<PathBuf>,
    transport: Option<Rc<dyn Transport>>,
}

impl Default for SanSheetsBuilder {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout: None,
            historic_window_days: config::HISTORIC_WINDOW_DAYS,
            store: None,
            properties_path: None,
            transport: None,
        }
    }
}

impl SanSheetsBuilder {
    /// Override the GraphQL endpoint.
    pub fn url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Use this key for the session instead of the stored one.
    ///
    /// The key is not saved; use [`SanSheets::add_api_key`] for that.
    pub fn api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// HTTP request timeout. Unset by default, which keeps the HTTP
    /// client's own default.
    ///
    /// Ignored when a custom [`transport`](Self::transport) is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Days of history available without historic-data access. Defaults to 90.
    pub fn historic_window_days(mut self, days: u32) -> Self {
        self.historic_window_days = days;
        self
    }

    /// Use a custom property store.
    pub fn property_store(mut self, store: Box<dyn PropertyStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Persist properties to a JSON file at `path`.
    ///
    /// Defaults to `<config dir>/san-sheets/properties.json`. Ignored when
    /// a custom [`property_store`](Self::property_store) is supplied.
    pub fn properties_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.properties_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use a custom HTTP transport.
    pub fn transport(mut self, transport: Rc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client. Reads the stored key and access flag; sends nothing.
    pub fn build(self) -> Result<SanSheets> {
        let store = match self.store {
            Some(store) => store,
            None => {
                let path = self
                    .properties_path
                    .unwrap_or_else(config::default_properties_path);
                Box::new(FilePropertyStore::new(path)) as Box<dyn PropertyStore>
            }
        };
        let transport = match self.transport {
            Some(transport) => transport,
            None => Rc::new(HttpTransport::new(self.timeout)?) as Rc<dyn Transport>,
        };

        let conn = Connection::with_store(
            self.api_key.clone(),
            self.url.clone(),
            store.as_ref(),
            transport.clone(),
        )?;
        let gate = HistoricDataGate::new(
            ApiKeyManager::new(store.as_ref()).has_historic_access()?,
            self.historic_window_days,
        );

        Ok(SanSheets {
            store,
            transport,
            url: self.url,
            window_days: self.historic_window_days,
            conn,
            gate,
        })
    }
}

// ---------------------------------------------------------------------------
// SanSheets
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the property store, the [`Connection`] and the
/// [`HistoricDataGate`], and exposes the query groups as lightweight
/// borrowing wrappers.
pub struct SanSheets {
    store: Box<dyn PropertyStore>,
    transport: Rc<dyn Transport>,
    url: Option<String>,
    window_days: u32,
    conn: Connection,
    gate: HistoricDataGate,
}

impl SanSheets {
    /// Create a new [`SanSheetsBuilder`] with default settings.
    pub fn builder() -> SanSheetsBuilder {
        SanSheetsBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Prices, OHLC, marketcap and price changes.
    pub fn prices(&self) -> queries::PriceQuery<'_> {
        queries::PriceQuery::new(&self.conn, &self.gate)
    }

    /// Series served by the generic `getMetric` field.
    pub fn metrics(&self) -> queries::MetricQuery<'_> {
        queries::MetricQuery::new(&self.conn, &self.gate)
    }

    /// NVT, funds flow, balances, holders and top transactions.
    pub fn onchain(&self) -> queries::OnchainQuery<'_> {
        queries::OnchainQuery::new(&self.conn, &self.gate)
    }

    /// Social volume, dominance, Twitter followers and trending words.
    pub fn social(&self) -> queries::SocialQuery<'_> {
        queries::SocialQuery::new(&self.conn, &self.gate)
    }

    /// Project listings and snapshots. Never date-gated.
    pub fn projects(&self) -> queries::ProjectQuery<'_> {
        queries::ProjectQuery::new(&self.conn)
    }

    // -- API key -----------------------------------------------------------

    /// Read-side access to the stored key and its access flag.
    pub fn api_keys(&self) -> ApiKeyManager<'_> {
        ApiKeyManager::new(self.store.as_ref())
    }

    /// Check `key` against the API and save it if it is valid.
    ///
    /// The permissions query is sent with the candidate key, not the
    /// current one. An authentication failure counts as an invalid key.
    /// On a saved key the connection and the historic gate switch over to
    /// it immediately.
    pub fn add_api_key(&mut self, key: &str) -> Result<AddKeyOutcome> {
        let key = key.trim();
        let candidate = Connection::new(
            Some(key.to_string()),
            self.url.clone(),
            self.transport.clone(),
        );
        let permissions = match candidate.graphql_query(&api_key::permissions_query(), "currentUser") {
            Ok(value) => value,
            Err(SanError::RemoteApi { status, .. }) if status == 401 || status == 403 => {
                serde_json::Value::Null
            }
            Err(e) => return Err(e),
        };

        let outcome = self.api_keys().add_key(key, &permissions)?;
        if outcome.is_saved() {
            self.reload()?;
        }
        Ok(outcome)
    }

    /// Forget the stored key. Later queries go out unauthenticated.
    pub fn remove_api_key(&mut self) -> Result<()> {
        self.api_keys().remove_key()?;
        tracing::info!(log_type = config::API_KEY_LOG_TYPE, "API key has been removed.");
        self.reload()
    }

    /// Rebuild the connection and gate from the property store.
    fn reload(&mut self) -> Result<()> {
        self.conn = Connection::with_store(
            None,
            self.url.clone(),
            self.store.as_ref(),
            self.transport.clone(),
        )?;
        self.gate = HistoricDataGate::new(self.api_keys().has_historic_access()?, self.window_days);
        Ok(())
    }

    // -- Sheet functions ---------------------------------------------------

    /// Names of every exposed sheet function.
    pub fn functions(&self) -> Vec<&'static str> {
        functions::function_names()
    }

    /// Call a sheet function by name with raw cell arguments.
    ///
    /// ```no_run
    /// # let sheets = san_sheets::SanSheets::builder().build().unwrap();
    /// let table = sheets.call("SAN_LATEST_PRICE", &["bitcoin", "BTC"]).unwrap();
    /// ```
    pub fn call(&self, name: &str, args: &[&str]) -> Result<Table> {
        let function: SheetFunction = name.parse()?;
        tracing::debug!(function = function.name(), args = args.len(), "calling sheet function");
        functions::dispatch(self, function, args)
    }

    // -- Internals -----------------------------------------------------------

    /// The connection queries are sent through.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// The gate applied to every date-range query.
    pub fn historic_gate(&self) -> &HistoricDataGate {
        &self.gate
    }

    /// The store holding the API key and access flag.
    pub fn property_store(&self) -> &dyn PropertyStore {
        self.store.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SanSheets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SanSheets(url={}, api_key={}, historic_access={})",
            self.conn.url(),
            if self.conn.api_key().is_some() {
                "set"
            } else {
                "unset"
            },
            self.gate.has_access()
        )
    }
}
