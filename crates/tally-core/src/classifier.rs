//! Account name taxonomy

use std::str::FromStr;
use tally_parser::Transaction;

use crate::types::Category;

/// Known account names and their statement category
const TAXONOMY: &[(&str, Category)] = &[
    ("Cash", Category::Asset),
    ("Accounts Receivable", Category::Asset),
    ("Inventory", Category::Asset),
    ("Prepaid Expenses", Category::Asset),
    ("Equipment", Category::Asset),
    ("Accounts Payable", Category::Liability),
    ("Notes Payable", Category::Liability),
    ("Accrued Liabilities", Category::Liability),
    ("Unearned Revenue", Category::Liability),
    ("Common Stock", Category::Equity),
    ("Retained Earnings", Category::Equity),
    ("Owner's Equity", Category::Equity),
    ("Sales Revenue", Category::Income),
    ("Service Revenue", Category::Income),
    ("Interest Income", Category::Income),
    ("Rent Expense", Category::Expense),
    ("Utilities Expense", Category::Expense),
    ("Salaries Expense", Category::Expense),
    ("Cost of Goods Sold", Category::Expense),
    ("Depreciation Expense", Category::Expense),
];

/// Classify an account name, exact match only
pub fn classify(account: &str) -> Category {
    TAXONOMY
        .iter()
        .find(|(name, _)| *name == account)
        .map(|(_, category)| *category)
        .unwrap_or(Category::Unclassified)
}

/// Category a transaction is reported under
///
/// A recognised category column wins over the account lookup.
pub fn categorize(txn: &Transaction) -> Category {
    txn.category
        .as_deref()
        .and_then(|c| Category::from_str(c).ok())
        .unwrap_or_else(|| classify(&txn.account))
}
