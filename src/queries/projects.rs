//! Project listings and per-project snapshots. None of these are date-bound.

use serde_json::Value;

use crate::connection::Connection;
use crate::error::Result;
use crate::models::{Cell, Project, ProjectFundamentals, ProjectSocialData, Table};
use crate::query_builder::{FieldBuilder, QueryDocument};

use super::{parse_list, parse_object};

pub const ALL_PROJECTS_HEADERS: &[&str] = &[
    "Ticker",
    "Name",
    "Slug",
    "USD Price",
    "USD Marketcap",
    "USD Volume",
    "USD Balance",
    "ETH Balance",
    "ETH Spent 30D",
    "ETH Spent 7D",
    "ETH Spent 1D",
];

pub const ERC20_PROJECTS_HEADERS: &[&str] = &[
    "Ticker",
    "Name",
    "Slug",
    "USD Price",
    "USD Marketcap",
    "USD Volume",
    "USD Balance",
    "ETH Balance",
    "ETH Spent 30D",
    "ETH Spent 7D",
    "ETH Spent 1D",
    "Main Contract Address",
];

pub const FUNDAMENTALS_HEADERS: &[&str] = &[
    "Ticker",
    "Name",
    "Slug",
    "Funds Raised From ICO In USD",
    "ETH Spent 30D",
    "ETH Balance",
    "USD Balance",
    "USD Price",
    "USD Volume",
    "USD Marketcap",
    "Percent Change 24H",
    "Percent Change 7D",
    "Volume Change 24H",
    "Available Supply",
    "Average Dev Activity 30D",
];

pub const SOCIAL_DATA_HEADERS: &[&str] = &[
    "Ticker",
    "Name",
    "Slug",
    "Website Link",
    "Whitepaper Link",
    "Facebook Link",
    "Blog Link",
    "LinkedIn Link",
    "Github Link",
    "Twitter Link",
    "Reddit Link",
    "Chat Link",
];

const LISTING_FIELDS: &[&str] = &[
    "slug",
    "name",
    "ticker",
    "marketcapUsd",
    "priceUsd",
    "volumeUsd",
    "ethBalance",
    "usdBalance",
    "ethSpent30d: ethSpent(days: 30)",
    "ethSpent7d: ethSpent(days: 7)",
    "ethSpent1d: ethSpent(days: 1)",
];

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn all_projects_query() -> QueryDocument {
    FieldBuilder::new("allProjects").select(LISTING_FIELDS).build()
}

pub fn erc20_projects_query() -> QueryDocument {
    FieldBuilder::new("allErc20Projects")
        .select(LISTING_FIELDS)
        .select(&["mainContractAddress"])
        .build()
}

pub fn project_fundamentals_query(slug: &str) -> QueryDocument {
    FieldBuilder::new("projectBySlug")
        .arg_str("slug", slug)
        .select(&[
            "ticker",
            "name",
            "slug",
            "fundsRaisedUsdIcoEndPrice",
            "ethSpent30d: ethSpent(days: 30)",
            "ethBalance",
            "usdBalance",
            "priceUsd",
            "percentChange24h",
            "percentChange7d",
            "volumeChange24h",
            "availableSupply",
            "marketcapUsd",
            "averageDevActivity(days: 30)",
            "volumeUsd",
        ])
        .build()
}

pub fn project_social_data_query(slug: &str) -> QueryDocument {
    FieldBuilder::new("projectBySlug")
        .arg_str("slug", slug)
        .select(&[
            "ticker",
            "name",
            "slug",
            "websiteLink",
            "facebookLink",
            "blogLink",
            "linkedinLink",
            "githubLink",
            "twitterLink",
            "whitepaperLink",
            "redditLink",
            "slackLink",
        ])
        .build()
}

// ---------------------------------------------------------------------------
// Formatters
// ---------------------------------------------------------------------------

fn listing_row(p: &Project) -> Vec<Cell> {
    vec![
        Cell::from_opt_string(p.ticker.as_ref()),
        Cell::from_opt_string(p.name.as_ref()),
        Cell::from_opt_string(p.slug.as_ref()),
        Cell::from_opt_f64(p.price_usd),
        Cell::from_opt_f64(p.marketcap_usd),
        Cell::from_opt_f64(p.volume_usd),
        Cell::from_opt_f64(p.usd_balance),
        Cell::from_opt_f64(p.eth_balance),
        Cell::from_opt_f64(p.eth_spent_30d),
        Cell::from_opt_f64(p.eth_spent_7d),
        Cell::from_opt_f64(p.eth_spent_1d),
    ]
}

pub fn format_all_projects(data: Value) -> Result<Table> {
    let projects: Vec<Project> = parse_list(data)?;
    Ok(Table::with_rows(
        ALL_PROJECTS_HEADERS,
        projects.iter().map(listing_row).collect(),
    ))
}

pub fn format_erc20_projects(data: Value) -> Result<Table> {
    let projects: Vec<Project> = parse_list(data)?;
    let rows = projects
        .iter()
        .map(|p| {
            let mut row = listing_row(p);
            row.push(Cell::from_opt_string(p.main_contract_address.as_ref()));
            row
        })
        .collect();
    Ok(Table::with_rows(ERC20_PROJECTS_HEADERS, rows))
}

pub fn format_project_fundamentals(data: Value) -> Result<Table> {
    let mut table = Table::new(FUNDAMENTALS_HEADERS);
    if let Some(p) = parse_object::<ProjectFundamentals>(data)? {
        table.push(vec![
            Cell::from_opt_string(p.ticker.as_ref()),
            Cell::from_opt_string(p.name.as_ref()),
            Cell::from_opt_string(p.slug.as_ref()),
            Cell::from_opt_f64(p.funds_raised_usd_ico_end_price),
            Cell::from_opt_f64(p.eth_spent_30d),
            Cell::from_opt_f64(p.eth_balance),
            Cell::from_opt_f64(p.usd_balance),
            Cell::from_opt_f64(p.price_usd),
            Cell::from_opt_f64(p.volume_usd),
            Cell::from_opt_f64(p.marketcap_usd),
            Cell::from_opt_f64(p.percent_change_24h),
            Cell::from_opt_f64(p.percent_change_7d),
            Cell::from_opt_f64(p.volume_change_24h),
            Cell::from_opt_f64(p.available_supply),
            Cell::from_opt_f64(p.average_dev_activity),
        ]);
    }
    Ok(table)
}

pub fn format_project_social_data(data: Value) -> Result<Table> {
    let mut table = Table::new(SOCIAL_DATA_HEADERS);
    if let Some(p) = parse_object::<ProjectSocialData>(data)? {
        table.push(
            [
                &p.ticker,
                &p.name,
                &p.slug,
                &p.website_link,
                &p.whitepaper_link,
                &p.facebook_link,
                &p.blog_link,
                &p.linkedin_link,
                &p.github_link,
                &p.twitter_link,
                &p.reddit_link,
                &p.slack_link,
            ]
            .iter()
            .map(|field| Cell::from_opt_string(Option::as_ref(field)))
            .collect(),
        );
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// ProjectQuery
// ---------------------------------------------------------------------------

/// Project listings and single-project snapshots. Never date-gated.
pub struct ProjectQuery<'a> {
    conn: &'a Connection,
}

impl<'a> ProjectQuery<'a> {
    /// Create a new `ProjectQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Every project with its market data and ETH spent over 1, 7 and 30 days.
    pub fn all_projects(&self) -> Result<Table> {
        let data = self.conn.graphql_query(&all_projects_query(), "allProjects")?;
        format_all_projects(data)
    }

    /// Like [`all_projects`](Self::all_projects), limited to ERC20 tokens and
    /// with the main contract address appended.
    pub fn erc20_projects(&self) -> Result<Table> {
        let data = self
            .conn
            .graphql_query(&erc20_projects_query(), "allErc20Projects")?;
        format_erc20_projects(data)
    }

    /// One row of fundamentals for `slug`; header-only when it is unknown.
    pub fn project_fundamentals(&self, slug: &str) -> Result<Table> {
        let data = self
            .conn
            .graphql_query(&project_fundamentals_query(slug), "projectBySlug")?;
        format_project_fundamentals(data)
    }

    /// Social and website links for `slug`; header-only when it is unknown.
    pub fn project_social_data(&self, slug: &str) -> Result<Table> {
        let data = self
            .conn
            .graphql_query(&project_social_data_query(slug), "projectBySlug")?;
        format_project_social_data(data)
    }
}
