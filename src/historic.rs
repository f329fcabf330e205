//! Local precondition check for date-range queries.

use crate::config::HISTORIC_DATA_LOG_TYPE;
use crate::dates;
use crate::error::{Result, SanError};
use chrono::{NaiveDate, TimeDelta, Utc};

/// Decides whether a date range may be requested, without touching the
/// network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricDataGate {
    has_access: bool,
    window_days: u32,
}

impl HistoricDataGate {
    /// `window_days` is how far back a caller without access may reach.
    pub fn new(has_access: bool, window_days: u32) -> Self {
        Self {
            has_access,
            window_days,
        }
    }

    pub fn has_access(&self) -> bool {
        self.has_access
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Check `[from, to)` against today's date (UTC).
    pub fn check(&self, from: NaiveDate, to: NaiveDate) -> Result<()> {
        self.check_at(from, to, Utc::now().date_naive())
    }

    /// Check `[from, to)` as if today were `today`.
    pub fn check_at(&self, from: NaiveDate, to: NaiveDate, today: NaiveDate) -> Result<()> {
        if from > to {
            return Err(SanError::InvalidArgument(format!(
                "'from' ({}) is after 'to' ({})",
                dates::format_date(from),
                dates::format_date(to)
            )));
        }
        if self.has_access {
            return Ok(());
        }

        let earliest = TimeDelta::try_days(i64::from(self.window_days))
            .and_then(|window| today.checked_sub_signed(window))
            .ok_or_else(|| {
                SanError::InvalidArgument(format!(
                    "a {}-day history window reaches past the earliest supported date",
                    self.window_days
                ))
            })?;
        if from < earliest {
            tracing::warn!(
                log_type = HISTORIC_DATA_LOG_TYPE,
                from = %dates::format_date(from),
                earliest = %dates::format_date(earliest),
                "historic data requested without permission"
            );
            return Err(SanError::PermissionDenied(format!(
                "Full historical data is only accessible to premium users. \
                 Add an API key with historic data access or start from {} or later.",
                dates::format_date(earliest)
            )));
        }
        Ok(())
    }
}
