//! Shared test fixtures for the san-sheets integration tests.
//!
//! Provides a [`StubTransport`] that records every request and answers with
//! queued canned responses, plus helpers that build a [`SanSheets`] around it
//! with an in-memory property store.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, Utc};
use san_sheets::config::{API_KEY_PROPERTY, HISTORIC_ACCESS_PROPERTY};
use san_sheets::{
    HttpResponse, MemoryPropertyStore, PropertyStore, RequestOptions, Result, SanSheets, Transport,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub const TEST_URL: &str = "https://api.test/graphql";

/// Transport that never touches the network.
///
/// Responses are served in FIFO order; once the queue is empty every request
/// gets `200 {"data": null}`.
#[derive(Default)]
pub struct StubTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    requests: RefCell<Vec<(String, RequestOptions)>>,
}

impl StubTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn push_response(&self, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .push_back(HttpResponse::new(status, body));
    }

    /// Queue `200 {"data": {<field>: <value>}}`.
    pub fn push_data(&self, field: &str, value: Value) {
        let body = json!({ "data": { field: value } });
        self.push_response(200, &body.to_string());
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn requests(&self) -> Vec<(String, RequestOptions)> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> RequestOptions {
        self.requests
            .borrow()
            .last()
            .map(|(_, options)| options.clone())
            .expect("no request was sent")
    }

    /// GraphQL text of the most recent request.
    pub fn last_query(&self) -> String {
        let payload: Value = serde_json::from_str(&self.last_request().payload).unwrap();
        payload["query"].as_str().unwrap().to_string()
    }
}

impl Transport for StubTransport {
    fn post(&self, url: &str, options: &RequestOptions) -> Result<HttpResponse> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), options.clone()));
        Ok(self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| HttpResponse::new(200, r#"{"data":null}"#)))
    }
}

/// Client with no API key and an empty in-memory store.
pub fn sheets(stub: &Rc<StubTransport>) -> SanSheets {
    sheets_with_store(stub, MemoryPropertyStore::new())
}

pub fn sheets_with_store(stub: &Rc<StubTransport>, store: MemoryPropertyStore) -> SanSheets {
    SanSheets::builder()
        .url(TEST_URL)
        .property_store(Box::new(store))
        .transport(stub.clone())
        .build()
        .unwrap()
}

/// Client whose stored key has historic-data access.
pub fn premium_sheets(stub: &Rc<StubTransport>) -> SanSheets {
    let store = MemoryPropertyStore::new();
    store.set(API_KEY_PROPERTY, "premium-key").unwrap();
    store.set(HISTORIC_ACCESS_PROPERTY, "true").unwrap();
    sheets_with_store(stub, store)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn days_ago(days: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(days)
}

/// API-style timestamp for `day`.
pub fn stamp(day: NaiveDate) -> String {
    format!("{}T00:00:00Z", day.format("%Y-%m-%d"))
}

/// One record per day from `from`, built by `record(stamp, index)`.
pub fn daily_series<F>(from: NaiveDate, days: usize, record: F) -> Value
where
    F: Fn(String, usize) -> Value,
{
    Value::Array(
        (0..days)
            .map(|i| record(stamp(from + Duration::days(i as i64)), i))
            .collect(),
    )
}
