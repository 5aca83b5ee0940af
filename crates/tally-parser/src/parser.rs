//! Line-based CSV ledger parser
//!
//! Each non-empty line is `date,account,category,debit,credit`. There is no
//! quoting; embedded commas are not supported. Parsing never fails: missing
//! trailing fields are empty and malformed amounts count as zero.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::types::Transaction;

/// Simple line-based parser for CSV ledgers
pub struct LedgerParser;

impl LedgerParser {
    /// Parse the whole content of a ledger file
    pub fn parse(content: &str) -> Vec<Transaction> {
        Self::parse_with_source(content, None)
    }

    /// Parse ledger content, naming the source file in debug logs
    pub fn parse_with_source(content: &str, source: Option<&str>) -> Vec<Transaction> {
        let mut transactions = Vec::new();

        for (i, line) in content.lines().enumerate() {
            match Self::parse_line(line) {
                Some(txn) => transactions.push(txn),
                None if !line.trim().is_empty() => {
                    log::debug!(
                        "Skipping line {} of {}: {:?}",
                        i + 1,
                        source.unwrap_or("<memory>"),
                        line
                    );
                }
                None => {}
            }
        }

        transactions
    }

    /// Parse a single ledger line
    ///
    /// Returns `None` for blank lines, a `date,...` header line, and lines
    /// without an account name.
    pub fn parse_line(line: &str) -> Option<Transaction> {
        if line.trim().is_empty() {
            return None;
        }

        let mut fields = line.split(',').map(str::trim);
        let date = fields.next().unwrap_or("");
        let account = fields.next().unwrap_or("");
        let category = fields.next().unwrap_or("");
        let debit = fields.next().unwrap_or("");
        let credit = fields.next().unwrap_or("");

        if date.eq_ignore_ascii_case("date") || account.is_empty() {
            return None;
        }

        Some(Transaction {
            date: date.to_string(),
            account: account.to_string(),
            category: if category.is_empty() {
                None
            } else {
                Some(category.to_string())
            },
            debit: parse_amount(debit),
            credit: parse_amount(credit),
        })
    }
}

/// Parse an amount column, treating anything unparseable as zero
pub fn parse_amount(text: &str) -> Decimal {
    let text = text.trim();
    if text.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_full_line() {
        let txn = LedgerParser::parse_line("2023-01-01,Cash,,100,0").unwrap();
        assert_eq!(txn.date, "2023-01-01");
        assert_eq!(txn.account, "Cash");
        assert_eq!(txn.category, None);
        assert_eq!(txn.debit, dec("100"));
        assert_eq!(txn.credit, Decimal::ZERO);
    }

    #[test]
    fn test_parse_trims_fields() {
        let txn = LedgerParser::parse_line("  2023-01-02 , Accounts Receivable ,Asset , 50.25 , 1 ").unwrap();
        assert_eq!(txn.account, "Accounts Receivable");
        assert_eq!(txn.category.as_deref(), Some("Asset"));
        assert_eq!(txn.debit, dec("50.25"));
        assert_eq!(txn.credit, dec("1"));
    }

    #[test]
    fn test_missing_trailing_fields() {
        let txn = LedgerParser::parse_line("2023-01-01,Cash").unwrap();
        assert_eq!(txn.debit, Decimal::ZERO);
        assert_eq!(txn.credit, Decimal::ZERO);

        let txn = LedgerParser::parse_line("2023-01-01,Cash,,75").unwrap();
        assert_eq!(txn.debit, dec("75"));
        assert_eq!(txn.credit, Decimal::ZERO);
    }

    #[test]
    fn test_malformed_amount_is_zero() {
        let txn = LedgerParser::parse_line("2023-01-01,Cash,,abc,12x").unwrap();
        assert_eq!(txn.debit, Decimal::ZERO);
        assert_eq!(txn.credit, Decimal::ZERO);
    }

    #[test]
    fn test_skips_blank_header_and_accountless_lines() {
        assert!(LedgerParser::parse_line("").is_none());
        assert!(LedgerParser::parse_line("   ").is_none());
        assert!(LedgerParser::parse_line("date,account,category,debit,credit").is_none());
        assert!(LedgerParser::parse_line("2023-01-01,,,10,0").is_none());
    }

    #[test]
    fn test_parse_content() {
        let content = "2023-01-01,Cash,,100,0\n\n2023-01-02,Accounts Receivable,,50,0\r\n";
        let txns = LedgerParser::parse(content);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[1].account, "Accounts Receivable");
        assert_eq!(txns[1].credit, Decimal::ZERO);
    }

    #[test]
    fn test_parse_empty_content() {
        assert!(LedgerParser::parse("").is_empty());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50"), dec("12.50"));
        assert_eq!(parse_amount("1e3"), dec("1000"));
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("N/A"), Decimal::ZERO);
        assert_eq!(parse_amount("-5"), dec("-5"));
    }
}
