//! Smoke test against the live Santiment API.
//!
//! Sends real requests for every query group. Runs anonymously unless the
//! `SANTIMENT_API_KEY` environment variable is set; the date ranges stay
//! inside the free window so either mode works.
//!
//! Run with:
//! ```sh
//! cargo test -- --ignored --nocapture
//! ```

use chrono::{Duration, Utc};
use san_sheets::{MemoryPropertyStore, SanSheets, Table};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn section(name: &str) {
    eprintln!("\n{}", "=".repeat(60));
    eprintln!("  {}", name);
    eprintln!("{}", "=".repeat(60));
}

struct Counters {
    pass: usize,
    fail: usize,
}

impl Counters {
    fn new() -> Self {
        Self { pass: 0, fail: 0 }
    }

    fn check(&mut self, label: &str, condition: bool, detail: &str) {
        let status = if condition { "PASS" } else { "FAIL" };
        if condition {
            self.pass += 1;
        } else {
            self.fail += 1;
        }
        if detail.is_empty() {
            eprintln!("  [{}] {}", status, label);
        } else {
            eprintln!("  [{}] {} -- {}", status, label, detail);
        }
    }

    fn table(&mut self, label: &str, result: san_sheets::Result<Table>, expect_rows: bool) {
        match result {
            Ok(table) => {
                let ok = !table.headers.is_empty() && (!expect_rows || !table.is_empty());
                self.check(label, ok, &format!("{} rows", table.len()));
            }
            Err(e) => self.check(label, false, &e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Main smoke test
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn smoke_test() {
    let mut builder = SanSheets::builder().property_store(Box::new(MemoryPropertyStore::new()));
    if let Ok(key) = std::env::var("SANTIMENT_API_KEY") {
        builder = builder.api_key(key);
    }
    let sheets = builder.build().unwrap();
    eprintln!("{}", sheets);

    let today = Utc::now().date_naive();
    let from = today - Duration::days(14);
    let to = today - Duration::days(1);
    let mut c = Counters::new();

    section("Projects");
    c.table("all_projects", sheets.projects().all_projects(), true);
    c.table("erc20_projects", sheets.projects().erc20_projects(), true);
    c.table("project_fundamentals", sheets.projects().project_fundamentals("santiment"), true);
    c.table("project_social_data", sheets.projects().project_social_data("santiment"), true);

    section("Prices");
    c.table("prices", sheets.prices().prices("santiment", from, to), true);
    c.table("ohlc", sheets.prices().ohlc("santiment", from, to), true);
    c.table(
        "latest_price",
        sheets.prices().latest_price("bitcoin", Default::default()),
        true,
    );
    c.table("daily_closing_price", sheets.prices().daily_closing_price("bitcoin", to), false);
    c.table("price_percent_change", sheets.prices().price_percent_change("bitcoin", from, to), true);

    section("Metrics");
    c.table("active_addresses", sheets.metrics().active_addresses("santiment", from, to), false);
    c.table("dev_activity", sheets.metrics().dev_activity("santiment", from, to), false);

    section("Onchain / social");
    c.table("nvt_ratio", sheets.onchain().nvt_ratio("santiment", from, to), false);
    c.table("social_volume_projects", sheets.social().social_volume_projects(), false);
    c.table("emerging_trends", sheets.social().emerging_trends(5, from, to), false);

    section("By name");
    let from_s = from.format("%Y-%m-%d").to_string();
    let to_s = to.format("%Y-%m-%d").to_string();
    c.table(
        "SAN_PRICES",
        sheets.call("SAN_PRICES", &["bitcoin", from_s.as_str(), to_s.as_str()]),
        true,
    );
    c.table("SAN_FUNCTIONS", sheets.call("SAN_FUNCTIONS", &[]), true);

    eprintln!("\n  passed: {}, failed: {}", c.pass, c.fail);
    assert_eq!(c.fail, 0, "{} smoke checks failed", c.fail);
}
