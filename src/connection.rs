//! HTTP connection to the Santiment GraphQL endpoint.
//!
//! A [`Connection`] is immutable once built: it knows the endpoint, the API
//! key (if any) and the [`Transport`] that actually moves bytes. Requests are
//! single-shot; there is no retry layer.

use crate::config;
use crate::error::{Result, SanError};
use crate::properties::PropertyStore;
use crate::query_builder::QueryDocument;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Everything needed to issue one request, independent of the HTTP stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub content_type: &'static str,
    pub payload: String,
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    /// Look up a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw HTTP response: status code plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new<S: Into<String>>(status: u16, body: S) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a prepared request.
///
/// Implementations must return non-2xx responses as `Ok`; only failures to
/// reach the server at all are errors.
pub trait Transport {
    fn post(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// [`Transport`] on top of a blocking `reqwest` client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport. `None` keeps reqwest's default timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        let mut request = self
            .client
            .request(options.method.clone(), url)
            .header(CONTENT_TYPE, options.content_type)
            .body(options.payload.clone());
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

pub struct Connection {
    url: String,
    api_key: Option<String>,
    transport: Rc<dyn Transport>,
}

impl Connection {
    /// Create a connection with an explicit (possibly absent) key.
    ///
    /// `url` defaults to [`config::SANTIMENT_GRAPHQL_URL`].
    pub fn new(api_key: Option<String>, url: Option<String>, transport: Rc<dyn Transport>) -> Self {
        Self {
            url: url.unwrap_or_else(|| config::SANTIMENT_GRAPHQL_URL.to_string()),
            api_key: api_key.filter(|k| !k.is_empty()),
            transport,
        }
    }

    /// Create a connection, falling back to the stored key when `api_key`
    /// is `None`.
    pub fn with_store(
        api_key: Option<String>,
        url: Option<String>,
        store: &dyn PropertyStore,
        transport: Rc<dyn Transport>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => Some(key),
            None => store.get(config::API_KEY_PROPERTY)?,
        };
        Ok(Self::new(api_key, url, transport))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Build the POST options for a query document.
    ///
    /// The `Authorization` header is present if and only if a key is set.
    pub fn build_request_options(&self, query: &QueryDocument) -> Result<RequestOptions> {
        let mut headers = BTreeMap::new();
        if let Some(key) = &self.api_key {
            headers.insert(AUTHORIZATION.as_str().to_string(), format!("Apikey {}", key));
        }
        Ok(RequestOptions {
            method: Method::POST,
            content_type: JSON_CONTENT_TYPE,
            payload: serde_json::to_string(query)?,
            headers,
        })
    }

    /// POST the query. Non-200 responses are returned, not raised.
    pub fn fetch_query(&self, query: &QueryDocument) -> Result<HttpResponse> {
        let options = self.build_request_options(query)?;
        self.transport.post(&self.url, &options)
    }

    /// Unwrap `data.<field>` from a response.
    ///
    /// Returns `Value::Null` when the field is absent so formatters can
    /// render an empty table.
    pub fn parse_response(&self, response: &HttpResponse, field: &str) -> Result<Value> {
        if response.status != 200 {
            return Err(SanError::RemoteApi {
                status: response.status,
                message: remote_error_message(&response.body),
            });
        }

        let body: Value = serde_json::from_str(&response.body)?;
        match body.get("data") {
            Some(data) if !data.is_null() => {
                Ok(data.get(field).cloned().unwrap_or(Value::Null))
            }
            _ => match first_error_message(&body) {
                Some(message) => Err(SanError::RemoteApi {
                    status: response.status,
                    message,
                }),
                None => Ok(Value::Null),
            },
        }
    }

    /// Fetch then parse; the only entry point the query wrappers use.
    pub fn graphql_query(&self, query: &QueryDocument, field: &str) -> Result<Value> {
        tracing::debug!(field, url = %self.url, "sending GraphQL query");
        let response = self.fetch_query(query)?;
        self.parse_response(&response, field)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn first_error_message(body: &Value) -> Option<String> {
    let message = body.get("errors")?.get(0)?.get("message")?;
    Some(match message {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Message for a non-200 response: `errors[0].message`, else the raw body.
fn remote_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| first_error_message(&v))
        .unwrap_or_else(|| body.trim().to_string())
}
