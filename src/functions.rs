//! Named sheet functions and string-argument dispatch.
//!
//! A spreadsheet host calls functions by name (`SAN_PRICES`) with cell
//! values as arguments. [`SheetFunction`] enumerates every name and
//! [`dispatch`] maps the raw arguments onto the typed query methods.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::dates;
use crate::error::{Result, SanError};
use crate::models::{Cell, Table};
use crate::queries::{Currency, TransactionType};
use crate::SanSheets;

pub const FUNCTIONS_HEADERS: &[&str] = &["Functions"];

macro_rules! sheet_functions {
    ($($variant:ident => $name:literal, $usage:literal;)+) => {
        /// Every function exposed to the spreadsheet host.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SheetFunction {
            $($variant,)+
        }

        impl SheetFunction {
            /// All functions, alphabetical word by word (`SAN_PRICE_*` before
            /// `SAN_PRICES`).
            pub const ALL: &'static [SheetFunction] = &[$(SheetFunction::$variant,)+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(SheetFunction::$variant => $name,)+
                }
            }

            /// Argument signature, used in error messages.
            pub fn usage(&self) -> &'static str {
                match self {
                    $(SheetFunction::$variant => $usage,)+
                }
            }
        }
    };
}

sheet_functions! {
    ActiveAddresses => "SAN_ACTIVE_ADDRESSES", "(slug, from, to)";
    ActiveDeposits => "SAN_ACTIVE_DEPOSITS", "(slug, from, to)";
    AgeDestroyed => "SAN_AGE_DESTROYED", "(slug, from, to)";
    AllProjects => "SAN_ALL_PROJECTS", "()";
    DailyAvgMarketcap => "SAN_DAILY_AVG_MARKETCAP", "(slug, day)";
    DailyClosingMarketcap => "SAN_DAILY_CLOSING_MARKETCAP", "(slug, day)";
    DailyClosingPrice => "SAN_DAILY_CLOSING_PRICE", "(slug, day)";
    DevActivity => "SAN_DEV_ACTIVITY", "(slug, from, to)";
    EmergingTrends => "SAN_EMERGING_TRENDS", "(size, from, to)";
    Erc20Projects => "SAN_ERC20_PROJECTS", "()";
    EthSpentOverTime => "SAN_ETH_SPENT_OVER_TIME", "(slug, from, to)";
    EthTopTransactions => "SAN_ETH_TOP_TRANSACTIONS", "(slug, from, to, limit, [transactionType])";
    ExchangeBalance => "SAN_EXCHANGE_BALANCE", "(slug, from, to)";
    ExchangeFundsFlow => "SAN_EXCHANGE_FUNDS_FLOW", "(slug, from, to)";
    ExchangeInflow => "SAN_EXCHANGE_INFLOW", "(slug, from, to)";
    ExchangeOutflow => "SAN_EXCHANGE_OUTFLOW", "(slug, from, to)";
    ExchangePercentOfSupply => "SAN_EXCHANGE_PERCENT_OF_SUPPLY", "(slug, from, to)";
    Functions => "SAN_FUNCTIONS", "()";
    GasUsed => "SAN_GAS_USED", "(slug, from, to)";
    GithubActivity => "SAN_GITHUB_ACTIVITY", "(slug, from, to)";
    HistoricalBalance => "SAN_HISTORICAL_BALANCE", "(slug, from, to, address)";
    HistoryTwitterData => "SAN_HISTORY_TWITTER_DATA", "(slug, from, to)";
    LatestPrice => "SAN_LATEST_PRICE", "(slug, [currency])";
    MeanAge => "SAN_MEAN_AGE", "(slug, from, to)";
    MeanRealizedPrice => "SAN_MEAN_REALIZED_PRICE", "(slug, from, to, [currency], [timeBound])";
    MinersBalance => "SAN_MINERS_BALANCE", "(slug, from, to)";
    MiningPoolsDistribution => "SAN_MINING_POOLS_DISTRIBUTION", "(slug, from, to)";
    MvrvLongShortDiff => "SAN_MVRV_LONG_SHORT_DIFF", "(slug, from, to)";
    MvrvRatio => "SAN_MVRV_RATIO", "(slug, from, to, [timeBound])";
    NetworkGrowth => "SAN_NETWORK_GROWTH", "(slug, from, to)";
    NvtRatio => "SAN_NVT_RATIO", "(slug, from, to)";
    Ohlc => "SAN_OHLC", "(slug, from, to)";
    PriceAbsoluteChange => "SAN_PRICE_ABSOLUTE_CHANGE", "(slug, from, to)";
    PricePercentChange => "SAN_PRICE_PERCENT_CHANGE", "(slug, from, to)";
    PriceVolumeDiff => "SAN_PRICE_VOLUME_DIFF", "(currency, slug, from, to)";
    Prices => "SAN_PRICES", "(slug, from, to)";
    ProjectFundamentals => "SAN_PROJECT_FUNDAMENTALS", "(slug)";
    ProjectSocialData => "SAN_PROJECT_SOCIAL_DATA", "(slug)";
    RealizedValue => "SAN_REALIZED_VALUE", "(slug, from, to, [timeBound])";
    SocialDominance => "SAN_SOCIAL_DOMINANCE", "(slug, from, to, [source])";
    SocialVolume => "SAN_SOCIAL_VOLUME", "(slug, from, to, socialVolumeType)";
    SocialVolumeProjects => "SAN_SOCIAL_VOLUME_PROJECTS", "()";
    TokenAgeConsumed => "SAN_TOKEN_AGE_CONSUMED", "(slug, from, to)";
    TokenCirculation => "SAN_TOKEN_CIRCULATION", "(slug, from, to, [timeBound])";
    TokenTopTransactions => "SAN_TOKEN_TOP_TRANSACTIONS", "(slug, from, to, limit)";
    TopHoldersPercentOfTotalSupply => "SAN_TOP_HOLDERS_PERCENT_OF_TOTAL_SUPPLY", "(slug, numberOfHolders, from, to)";
    TransactionVolume => "SAN_TRANSACTION_VOLUME", "(slug, from, to)";
    Velocity => "SAN_VELOCITY", "(slug, from, to)";
}

impl FromStr for SheetFunction {
    type Err = SanError;

    /// Case-insensitive; the `SAN_` prefix is optional.
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let name = if upper.starts_with("SAN_") {
            upper
        } else {
            format!("SAN_{}", upper)
        };
        SheetFunction::ALL
            .iter()
            .copied()
            .find(|f| f.name() == name)
            .ok_or_else(|| SanError::InvalidArgument(format!("Unknown function: {}", s.trim())))
    }
}

impl fmt::Display for SheetFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names of every exposed function, in [`SheetFunction::ALL`] order.
pub fn function_names() -> Vec<&'static str> {
    SheetFunction::ALL.iter().map(|f| f.name()).collect()
}

pub fn format_functions() -> Table {
    Table::with_rows(
        FUNCTIONS_HEADERS,
        function_names().into_iter().map(|n| vec![Cell::text(n)]).collect(),
    )
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

/// Positional string arguments of one call.
///
/// Empty strings count as missing, the way blank cells do.
struct Args<'a> {
    function: SheetFunction,
    values: &'a [&'a str],
}

impl<'a> Args<'a> {
    fn new(function: SheetFunction, values: &'a [&'a str], max: usize) -> Result<Self> {
        if values.len() > max {
            return Err(SanError::InvalidArgument(format!(
                "{} takes at most {} argument(s): {}{}",
                function.name(),
                max,
                function.name(),
                function.usage()
            )));
        }
        Ok(Self { function, values })
    }

    fn optional(&self, idx: usize) -> Option<&'a str> {
        self.values
            .get(idx)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, idx: usize, what: &str) -> Result<&'a str> {
        self.optional(idx).ok_or_else(|| {
            SanError::InvalidArgument(format!(
                "{} is missing argument '{}': {}{}",
                self.function.name(),
                what,
                self.function.name(),
                self.function.usage()
            ))
        })
    }

    fn date(&self, idx: usize, what: &str) -> Result<NaiveDate> {
        dates::parse_date(self.required(idx, what)?)
    }

    fn count(&self, idx: usize, what: &str) -> Result<u32> {
        let raw = self.required(idx, what)?;
        raw.parse::<u32>().map_err(|_| {
            SanError::InvalidArgument(format!("'{}' is not a valid {} (expected a whole number)", raw, what))
        })
    }

    fn currency(&self, idx: usize) -> Result<Currency> {
        self.optional(idx)
            .map(str::parse::<Currency>)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// `(slug, from, to)` at positions 0..3.
    fn slug_range(&self) -> Result<(&'a str, NaiveDate, NaiveDate)> {
        Ok((
            self.required(0, "slug")?,
            self.date(1, "from")?,
            self.date(2, "to")?,
        ))
    }
}

/// Run `function` with raw string arguments.
pub fn dispatch(sheets: &SanSheets, function: SheetFunction, values: &[&str]) -> Result<Table> {
    use SheetFunction::*;

    let max = match function {
        AllProjects | Erc20Projects | Functions | SocialVolumeProjects => 0,
        ProjectFundamentals | ProjectSocialData => 1,
        LatestPrice | DailyAvgMarketcap | DailyClosingMarketcap | DailyClosingPrice => 2,
        TokenCirculation | MvrvRatio | RealizedValue | HistoricalBalance | SocialDominance
        | SocialVolume | TokenTopTransactions | PriceVolumeDiff
        | TopHoldersPercentOfTotalSupply => 4,
        MeanRealizedPrice | EthTopTransactions => 5,
        _ => 3,
    };
    let args = Args::new(function, values, max)?;

    let metrics = sheets.metrics();
    match function {
        ActiveAddresses => {
            let (slug, from, to) = args.slug_range()?;
            metrics.active_addresses(slug, from, to)
        }
        ActiveDeposits => {
            let (slug, from, to) = args.slug_range()?;
            metrics.active_deposits(slug, from, to)
        }
        AgeDestroyed => {
            let (slug, from, to) = args.slug_range()?;
            metrics.age_destroyed(slug, from, to)
        }
        DevActivity => {
            let (slug, from, to) = args.slug_range()?;
            metrics.dev_activity(slug, from, to)
        }
        ExchangeBalance => {
            let (slug, from, to) = args.slug_range()?;
            metrics.exchange_balance(slug, from, to)
        }
        ExchangeInflow => {
            let (slug, from, to) = args.slug_range()?;
            metrics.exchange_inflow(slug, from, to)
        }
        ExchangeOutflow => {
            let (slug, from, to) = args.slug_range()?;
            metrics.exchange_outflow(slug, from, to)
        }
        ExchangePercentOfSupply => {
            let (slug, from, to) = args.slug_range()?;
            metrics.exchange_percent_of_supply(slug, from, to)
        }
        GasUsed => {
            let (slug, from, to) = args.slug_range()?;
            metrics.gas_used(slug, from, to)
        }
        GithubActivity => {
            let (slug, from, to) = args.slug_range()?;
            metrics.github_activity(slug, from, to)
        }
        MeanAge => {
            let (slug, from, to) = args.slug_range()?;
            metrics.mean_age(slug, from, to)
        }
        MinersBalance => {
            let (slug, from, to) = args.slug_range()?;
            metrics.miners_balance(slug, from, to)
        }
        MvrvLongShortDiff => {
            let (slug, from, to) = args.slug_range()?;
            metrics.mvrv_long_short_diff(slug, from, to)
        }
        NetworkGrowth => {
            let (slug, from, to) = args.slug_range()?;
            metrics.network_growth(slug, from, to)
        }
        TokenAgeConsumed => {
            let (slug, from, to) = args.slug_range()?;
            metrics.token_age_consumed(slug, from, to)
        }
        TransactionVolume => {
            let (slug, from, to) = args.slug_range()?;
            metrics.transaction_volume(slug, from, to)
        }
        Velocity => {
            let (slug, from, to) = args.slug_range()?;
            metrics.velocity(slug, from, to)
        }
        TokenCirculation => {
            let (slug, from, to) = args.slug_range()?;
            metrics.token_circulation(slug, from, to, args.optional(3))
        }
        MeanRealizedPrice => {
            let (slug, from, to) = args.slug_range()?;
            metrics.mean_realized_price(slug, from, to, args.currency(3)?, args.optional(4))
        }
        MvrvRatio => {
            let (slug, from, to) = args.slug_range()?;
            metrics.mvrv_ratio(slug, from, to, args.optional(3))
        }
        RealizedValue => {
            let (slug, from, to) = args.slug_range()?;
            metrics.realized_value(slug, from, to, args.optional(3))
        }

        Prices => {
            let (slug, from, to) = args.slug_range()?;
            sheets.prices().prices(slug, from, to)
        }
        Ohlc => {
            let (slug, from, to) = args.slug_range()?;
            sheets.prices().ohlc(slug, from, to)
        }
        PriceVolumeDiff => {
            let currency: Currency = args.required(0, "currency")?.parse()?;
            let slug = args.required(1, "slug")?;
            let from = args.date(2, "from")?;
            let to = args.date(3, "to")?;
            sheets.prices().price_volume_diff(currency, slug, from, to)
        }
        LatestPrice => {
            let slug = args.required(0, "slug")?;
            sheets.prices().latest_price(slug, args.currency(1)?)
        }
        DailyClosingPrice => {
            let slug = args.required(0, "slug")?;
            sheets.prices().daily_closing_price(slug, args.date(1, "day")?)
        }
        DailyAvgMarketcap => {
            let slug = args.required(0, "slug")?;
            sheets.prices().daily_avg_marketcap(slug, args.date(1, "day")?)
        }
        DailyClosingMarketcap => {
            let slug = args.required(0, "slug")?;
            sheets.prices().daily_closing_marketcap(slug, args.date(1, "day")?)
        }
        PriceAbsoluteChange => {
            let (slug, from, to) = args.slug_range()?;
            sheets.prices().price_absolute_change(slug, from, to)
        }
        PricePercentChange => {
            let (slug, from, to) = args.slug_range()?;
            sheets.prices().price_percent_change(slug, from, to)
        }

        NvtRatio => {
            let (slug, from, to) = args.slug_range()?;
            sheets.onchain().nvt_ratio(slug, from, to)
        }
        ExchangeFundsFlow => {
            let (slug, from, to) = args.slug_range()?;
            sheets.onchain().exchange_funds_flow(slug, from, to)
        }
        EthSpentOverTime => {
            let (slug, from, to) = args.slug_range()?;
            sheets.onchain().eth_spent_over_time(slug, from, to)
        }
        HistoricalBalance => {
            let (slug, from, to) = args.slug_range()?;
            let address = args.required(3, "address")?;
            sheets.onchain().historical_balance(slug, from, to, address)
        }
        MiningPoolsDistribution => {
            let (slug, from, to) = args.slug_range()?;
            sheets.onchain().mining_pools_distribution(slug, from, to)
        }
        TopHoldersPercentOfTotalSupply => {
            let slug = args.required(0, "slug")?;
            let holders = args.count(1, "numberOfHolders")?;
            let from = args.date(2, "from")?;
            let to = args.date(3, "to")?;
            sheets
                .onchain()
                .top_holders_percent_of_total_supply(slug, holders, from, to)
        }
        EthTopTransactions => {
            let (slug, from, to) = args.slug_range()?;
            let limit = args.count(3, "limit")?;
            let transaction_type: TransactionType = args
                .optional(4)
                .map(str::parse::<TransactionType>)
                .transpose()?
                .unwrap_or_default();
            sheets
                .onchain()
                .eth_top_transactions(slug, from, to, limit, transaction_type)
        }
        TokenTopTransactions => {
            let (slug, from, to) = args.slug_range()?;
            let limit = args.count(3, "limit")?;
            sheets.onchain().token_top_transactions(slug, from, to, limit)
        }

        SocialVolumeProjects => sheets.social().social_volume_projects(),
        SocialVolume => {
            let (slug, from, to) = args.slug_range()?;
            let kind = args.required(3, "socialVolumeType")?;
            sheets.social().social_volume(slug, from, to, kind)
        }
        SocialDominance => {
            let (slug, from, to) = args.slug_range()?;
            let source = args.optional(3).unwrap_or("ALL");
            sheets.social().social_dominance(slug, from, to, source)
        }
        HistoryTwitterData => {
            let (slug, from, to) = args.slug_range()?;
            sheets.social().history_twitter_data(slug, from, to)
        }
        EmergingTrends => {
            let size = args.count(0, "size")?;
            let from = args.date(1, "from")?;
            let to = args.date(2, "to")?;
            sheets.social().emerging_trends(size, from, to)
        }

        AllProjects => sheets.projects().all_projects(),
        Erc20Projects => sheets.projects().erc20_projects(),
        ProjectFundamentals => {
            let slug = args.required(0, "slug")?;
            sheets.projects().project_fundamentals(slug)
        }
        ProjectSocialData => {
            let slug = args.required(0, "slug")?;
            sheets.projects().project_social_data(slug)
        }

        Functions => Ok(format_functions()),
    }
}
