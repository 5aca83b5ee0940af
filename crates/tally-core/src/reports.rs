//! Report structures and the aggregators that build them

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tally_parser::Transaction;

use crate::classifier::categorize;
use crate::error::{CoreError, CoreResult};
use crate::types::{Category, ReportKind};

// ==================== Report Structures ====================

/// One `key,value` line of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub key: String,
    pub value: Decimal,
}

/// Aggregated report, rows already in output order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub kind: ReportKind,
    pub rows: Vec<ReportRow>,
}

// ==================== Aggregators ====================

/// Fold over transactions into an ordered `key -> net value` map
pub trait Aggregator {
    /// Grouping key; its `Ord` is the row order of the report
    type Key: Ord + std::fmt::Display;

    /// Report this aggregator produces
    fn kind(&self) -> ReportKind;

    /// Group a transaction belongs to
    fn key(&self, txn: &Transaction) -> Self::Key;

    /// Signed contribution of a transaction to its group, `None` when it
    /// does not fit in a `Decimal`
    fn value(&self, key: &Self::Key, txn: &Transaction) -> Option<Decimal>;

    /// Fails with [`CoreError::Overflow`] when a group total leaves the
    /// `Decimal` range
    fn aggregate<'a, I>(&self, transactions: I) -> CoreResult<Report>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals: BTreeMap<Self::Key, Decimal> = BTreeMap::new();
        for txn in transactions {
            let key = self.key(txn);
            let overflow = |key: &Self::Key| CoreError::Overflow {
                job: self.kind(),
                key: key.to_string(),
            };
            let value = self.value(&key, txn).ok_or_else(|| overflow(&key))?;
            let total = totals.entry(key).or_insert(Decimal::ZERO);
            *total = total.checked_add(value).ok_or_else(|| overflow(&self.key(txn)))?;
        }

        Ok(Report {
            kind: self.kind(),
            rows: totals
                .into_iter()
                .map(|(key, value)| ReportRow {
                    key: key.to_string(),
                    value,
                })
                .collect(),
        })
    }
}

/// Net balance (debit - credit) per account name
#[derive(Debug, Default)]
pub struct AccountsAggregator;

impl Aggregator for AccountsAggregator {
    type Key = String;

    fn kind(&self) -> ReportKind {
        ReportKind::Accounts
    }

    fn key(&self, txn: &Transaction) -> String {
        txn.account.clone()
    }

    fn value(&self, _key: &String, txn: &Transaction) -> Option<Decimal> {
        txn.net()
    }
}

/// Year grouping key; undated records sort after every year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum YearKey {
    Year(i32),
    Undated,
}

impl std::fmt::Display for YearKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YearKey::Year(year) => write!(f, "{:04}", year),
            YearKey::Undated => write!(f, "undated"),
        }
    }
}

/// Net balance (debit - credit) per calendar year
#[derive(Debug, Default)]
pub struct YearlyAggregator;

impl Aggregator for YearlyAggregator {
    type Key = YearKey;

    fn kind(&self) -> ReportKind {
        ReportKind::Yearly
    }

    fn key(&self, txn: &Transaction) -> YearKey {
        txn.year().map(YearKey::Year).unwrap_or(YearKey::Undated)
    }

    fn value(&self, _key: &YearKey, txn: &Transaction) -> Option<Decimal> {
        txn.net()
    }
}

/// Financial statement totals per category, each under its own sign convention
#[derive(Debug, Default)]
pub struct FinancialStatementAggregator;

impl Aggregator for FinancialStatementAggregator {
    type Key = Category;

    fn kind(&self) -> ReportKind {
        ReportKind::Fs
    }

    fn key(&self, txn: &Transaction) -> Category {
        categorize(txn)
    }

    fn value(&self, key: &Category, txn: &Transaction) -> Option<Decimal> {
        key.signed_net(txn.debit, txn.credit)
    }
}

/// Build the given report over a transaction set
pub fn aggregate(kind: ReportKind, transactions: &[Transaction]) -> CoreResult<Report> {
    match kind {
        ReportKind::Accounts => AccountsAggregator.aggregate(transactions),
        ReportKind::Yearly => YearlyAggregator.aggregate(transactions),
        ReportKind::Fs => FinancialStatementAggregator.aggregate(transactions),
    }
}
