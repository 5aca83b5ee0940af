//! Basic types for ledger records

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

/// Leading four-digit year, used when the date column is not ISO formatted
static YEAR_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})(?:\D|$)").unwrap());

/// One line of a ledger file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transaction {
    /// Date text as it appeared in the ledger (YYYY-MM-DD expected)
    pub date: String,
    /// Account name, never empty
    pub account: String,
    /// Pre-supplied category, usually empty
    pub category: Option<String>,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl Transaction {
    /// Get the date as NaiveDate, if it is a valid ISO date
    pub fn date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Calendar year of the transaction
    ///
    /// Falls back to a leading four-digit year for dates chrono rejects
    /// (`2023/01/05`, `2023-02-30`), so dirty dates still land in a year.
    pub fn year(&self) -> Option<i32> {
        if let Some(date) = self.date_naive() {
            return Some(date.year());
        }
        YEAR_PREFIX
            .captures(&self.date)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Debit minus credit, `None` when the difference overflows
    pub fn net(&self) -> Option<Decimal> {
        self.debit.checked_sub(self.credit)
    }
}
