//! Project listing and snapshot tests.

mod common;

use common::{sheets, StubTransport};
use san_sheets::models::{Cell, Project};
use san_sheets::queries::projects::{
    all_projects_query, format_all_projects, format_erc20_projects, format_project_fundamentals,
    format_project_social_data, ALL_PROJECTS_HEADERS, ERC20_PROJECTS_HEADERS,
    FUNDAMENTALS_HEADERS, SOCIAL_DATA_HEADERS,
};
use serde_json::{json, Value};

fn listing_item() -> Value {
    json!({
        "slug": "santiment",
        "name": "Santiment",
        "ticker": "SAN",
        "marketcapUsd": "12345678.9",
        "priceUsd": 0.25,
        "volumeUsd": "1000",
        "ethBalance": 1500,
        "usdBalance": null,
        "ethSpent30d": 10,
        "ethSpent7d": "2.5",
        "ethSpent1d": 0
    })
}

#[test]
fn all_projects_query_aliases_eth_spent() {
    let query = all_projects_query().query;
    assert!(query.starts_with("{ allProjects { slug name ticker"));
    assert!(query.contains("ethSpent30d: ethSpent(days: 30)"));
    assert!(query.contains("ethSpent1d: ethSpent(days: 1)"));
}

#[test]
fn project_deserializes_decimal_strings() {
    let project: Project = serde_json::from_value(listing_item()).unwrap();
    assert_eq!(project.marketcap_usd, Some(12345678.9));
    assert_eq!(project.eth_spent_7d, Some(2.5));
    assert_eq!(project.usd_balance, None);
}

#[test]
fn all_projects_row_matches_headers() {
    let table = format_all_projects(json!([listing_item()])).unwrap();
    assert_eq!(table.headers, ALL_PROJECTS_HEADERS);
    assert_eq!(
        table.rows[0],
        vec![
            Cell::text("SAN"),
            Cell::text("Santiment"),
            Cell::text("santiment"),
            Cell::Number(0.25),
            Cell::Number(12345678.9),
            Cell::Number(1000.0),
            Cell::Null,
            Cell::Number(1500.0),
            Cell::Number(10.0),
            Cell::Number(2.5),
            Cell::Number(0.0),
        ]
    );
}

#[test]
fn erc20_projects_append_contract_address() {
    let mut item = listing_item();
    item["mainContractAddress"] = json!("0x7c5a0ce9267ed19b22f8cae653f198e3e8daf098");
    let table = format_erc20_projects(json!([item])).unwrap();
    assert_eq!(table.headers, ERC20_PROJECTS_HEADERS);
    assert_eq!(table.rows[0].len(), ERC20_PROJECTS_HEADERS.len());
    assert_eq!(
        table.rows[0].last(),
        Some(&Cell::text("0x7c5a0ce9267ed19b22f8cae653f198e3e8daf098"))
    );
}

#[test]
fn fundamentals_single_row() {
    let data = json!({
        "ticker": "SAN",
        "name": "Santiment",
        "slug": "santiment",
        "fundsRaisedUsdIcoEndPrice": "12000000",
        "ethSpent30d": 15,
        "percentChange24h": "-1.5",
        "averageDevActivity": 120.3
    });
    let table = format_project_fundamentals(data).unwrap();
    assert_eq!(table.headers, FUNDAMENTALS_HEADERS);
    assert_eq!(table.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row.len(), FUNDAMENTALS_HEADERS.len());
    assert_eq!(row[3], Cell::Number(12000000.0));
    assert_eq!(row[10], Cell::Number(-1.5));
    assert_eq!(row[14], Cell::Number(120.3));
    assert!(row[13].is_null());
}

#[test]
fn unknown_project_yields_header_only() {
    assert!(format_project_fundamentals(Value::Null).unwrap().is_empty());
    let social = format_project_social_data(Value::Null).unwrap();
    assert!(social.is_empty());
    assert_eq!(social.headers, SOCIAL_DATA_HEADERS);
}

#[test]
fn social_data_maps_slack_to_chat_link() {
    let data = json!({
        "ticker": "SAN",
        "name": "Santiment",
        "slug": "santiment",
        "websiteLink": "https://santiment.net",
        "slackLink": "https://t.me/santiment_network"
    });
    let table = format_project_social_data(data).unwrap();
    let chat = table.column("Chat Link").unwrap();
    assert_eq!(chat, vec![&Cell::text("https://t.me/santiment_network")]);
    let website = table.column("Website Link").unwrap();
    assert_eq!(website, vec![&Cell::text("https://santiment.net")]);
    assert!(table.column("Reddit Link").unwrap()[0].is_null());
}

#[test]
fn project_queries_never_gated() {
    let stub = StubTransport::new();
    let sheets = sheets(&stub);
    stub.push_data("allErc20Projects", json!([]));

    let table = sheets.projects().erc20_projects().unwrap();
    assert!(table.is_empty());
    assert!(stub.last_query().starts_with("{ allErc20Projects {"));

    sheets.projects().project_fundamentals("santiment").unwrap();
    assert!(stub
        .last_query()
        .starts_with(r#"{ projectBySlug(slug: "santiment") {"#));
}
