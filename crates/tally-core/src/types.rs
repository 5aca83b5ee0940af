//! Basic types for the report engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Financial statement category of an account
///
/// Variants are declared in alphabetical order; the financial statement
/// report sorts its rows on the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Cash, receivables, equipment
    Asset,
    /// Owner's equity, retained earnings
    Equity,
    /// Rent, salaries, utilities
    Expense,
    /// Sales and service revenue
    Income,
    /// Payables, loans
    Liability,
    /// Accounts missing from the taxonomy
    Unclassified,
}

impl Category {
    /// Every category, in report order
    pub const ALL: [Category; 6] = [
        Category::Asset,
        Category::Equity,
        Category::Expense,
        Category::Income,
        Category::Liability,
        Category::Unclassified,
    ];

    /// Whether the category grows with debits
    ///
    /// Unclassified is treated as debit-normal so its bucket reads the
    /// same way as the accounts report.
    pub fn is_debit_normal(&self) -> bool {
        matches!(
            self,
            Category::Asset | Category::Expense | Category::Unclassified
        )
    }

    /// Net value of a debit/credit pair under this category's sign convention
    ///
    /// `None` when the difference does not fit in a `Decimal`.
    pub fn signed_net(&self, debit: Decimal, credit: Decimal) -> Option<Decimal> {
        if self.is_debit_normal() {
            debit.checked_sub(credit)
        } else {
            credit.checked_sub(debit)
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" | "assets" => Ok(Category::Asset),
            "liability" | "liabilities" => Ok(Category::Liability),
            "equity" => Ok(Category::Equity),
            "income" | "revenue" => Ok(Category::Income),
            "expense" | "expenses" => Ok(Category::Expense),
            "unclassified" => Ok(Category::Unclassified),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Asset => write!(f, "Asset"),
            Category::Equity => write!(f, "Equity"),
            Category::Expense => write!(f, "Expense"),
            Category::Income => write!(f, "Income"),
            Category::Liability => write!(f, "Liability"),
            Category::Unclassified => write!(f, "Unclassified"),
        }
    }
}

/// The three report jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Net balance per account
    Accounts,
    /// Net balance per calendar year
    Yearly,
    /// Financial statement totals per category
    Fs,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::Accounts, ReportKind::Yearly, ReportKind::Fs];

    /// Job name, also the output file stem
    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::Accounts => "accounts",
            ReportKind::Yearly => "yearly",
            ReportKind::Fs => "fs",
        }
    }

    /// File name the report is written to
    pub fn output_filename(&self) -> &'static str {
        match self {
            ReportKind::Accounts => "accounts.csv",
            ReportKind::Yearly => "yearly.csv",
            ReportKind::Fs => "fs.csv",
        }
    }

    /// Header line of the report CSV
    pub fn header(&self) -> &'static str {
        match self {
            ReportKind::Accounts => "account,balance",
            ReportKind::Yearly => "year,balance",
            ReportKind::Fs => "category,balance",
        }
    }

    /// Glob matching the per-write scratch files of this report
    pub fn temp_pattern(&self) -> &'static str {
        match self {
            ReportKind::Accounts => "accounts.csv.*.tmp",
            ReportKind::Yearly => "yearly.csv.*.tmp",
            ReportKind::Fs => "fs.csv.*.tmp",
        }
    }

    /// Glob patterns of input files this job must never read back
    ///
    /// Every report output and its scratch files are excluded, so reports
    /// stay idempotent when the output directory is also the input
    /// directory, even while other jobs are writing.
    pub fn excluded_inputs(&self) -> Vec<&'static str> {
        ReportKind::ALL
            .iter()
            .flat_map(|k| [k.output_filename(), k.temp_pattern()])
            .collect()
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim_end_matches(".csv") {
            "accounts" => Ok(ReportKind::Accounts),
            "yearly" => Ok(ReportKind::Yearly),
            "fs" => Ok(ReportKind::Fs),
            _ => Err(format!("Invalid report: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_order_is_alphabetical() {
        let mut names: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
        let declared = names.clone();
        names.sort();
        assert_eq!(names, declared);

        let mut sorted = Category::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Category::ALL.to_vec());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(Category::from_str("Assets").unwrap(), Category::Asset);
        assert_eq!(Category::from_str(" liability ").unwrap(), Category::Liability);
        assert_eq!(Category::from_str("Revenue").unwrap(), Category::Income);
        assert!(Category::from_str("misc").is_err());
    }

    #[test]
    fn test_signed_net() {
        let hundred = Decimal::from(100);
        let forty = Decimal::from(40);
        let sixty = Some(Decimal::from(60));
        assert_eq!(Category::Asset.signed_net(hundred, forty), sixty);
        assert_eq!(Category::Expense.signed_net(hundred, forty), sixty);
        assert_eq!(Category::Income.signed_net(hundred, forty), Some(Decimal::from(-60)));
        assert_eq!(Category::Liability.signed_net(forty, hundred), sixty);
        assert_eq!(Category::Equity.signed_net(forty, hundred), sixty);
        assert_eq!(Category::Unclassified.signed_net(hundred, forty), sixty);
        assert_eq!(Category::Income.signed_net(Decimal::MIN, Decimal::MAX), None);
    }

    #[test]
    fn test_report_kind_names() {
        assert_eq!(ReportKind::Accounts.output_filename(), "accounts.csv");
        assert_eq!(ReportKind::Fs.to_string(), "fs");
        assert_eq!(ReportKind::from_str("yearly.csv").unwrap(), ReportKind::Yearly);
        assert!(ReportKind::from_str("monthly").is_err());
    }

    #[test]
    fn test_excluded_inputs_cover_own_output() {
        for kind in ReportKind::ALL {
            let excluded = kind.excluded_inputs();
            assert!(excluded.contains(&kind.output_filename()));
            assert!(excluded.contains(&"fs.csv.*.tmp"));
            assert_eq!(excluded.len(), 6);
        }
    }
}
