//! CSV ledger reader
//!
//! Lists the ledger files of an input directory and parses them into
//! transaction records.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod error;
pub mod parser;
pub mod types;

pub use error::ParseError;
pub use parser::{parse_amount, LedgerParser};
pub use types::Transaction;

// ==================== Reader Trait ====================

/// Reader reference type
pub type ReaderRef = Arc<dyn LedgerReaderTrait>;

/// Trait for ledger readers
#[async_trait]
pub trait LedgerReaderTrait: Send + Sync {
    /// List the ledger files directly under `dir`, skipping any file whose
    /// name matches one of the `exclude` glob patterns
    async fn list_ledgers(&self, dir: &Path, exclude: &[&str]) -> Result<Vec<PathBuf>, ParseError>;

    /// Read and parse one ledger file
    async fn read_ledger(&self, path: &Path) -> Result<Vec<Transaction>, ParseError>;

    /// Read every ledger of `dir` and concatenate the records
    ///
    /// Any listing or read failure aborts the whole load, so callers never
    /// aggregate over a partial input set.
    async fn load(&self, dir: &Path, exclude: &[&str]) -> Result<Vec<Transaction>, ParseError> {
        let files = self.list_ledgers(dir, exclude).await?;
        let mut transactions = Vec::new();
        for file in files {
            let records = self.read_ledger(&file).await?;
            log::debug!("Read {} records from {}", records.len(), file.display());
            transactions.extend(records);
        }
        Ok(transactions)
    }
}

/// Default reader backed by tokio::fs
#[derive(Debug, Default)]
pub struct DefaultLedgerReader;

#[async_trait]
impl LedgerReaderTrait for DefaultLedgerReader {
    async fn list_ledgers(&self, dir: &Path, exclude: &[&str]) -> Result<Vec<PathBuf>, ParseError> {
        let list_err = |source| ParseError::ListDir {
            path: dir.to_path_buf(),
            source,
        };

        let patterns: Vec<glob::Pattern> = exclude
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    log::warn!("Ignoring invalid exclude pattern {}: {}", p, e);
                    None
                }
            })
            .collect();

        let mut entries = tokio::fs::read_dir(dir).await.map_err(list_err)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if patterns.iter().any(|pattern| pattern.matches(&name)) {
                log::debug!("Excluding report output {} from input", name);
                continue;
            }
            let file_type = entry.file_type().await.map_err(list_err)?;
            if file_type.is_file() {
                files.push(entry.path());
            }
        }

        // read_dir order is platform dependent
        files.sort();
        Ok(files)
    }

    async fn read_ledger(&self, path: &Path) -> Result<Vec<Transaction>, ParseError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ParseError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        // Stray non-UTF-8 bytes only damage their own field
        let content = String::from_utf8_lossy(&bytes);
        let source = path.to_string_lossy();
        Ok(LedgerParser::parse_with_source(&content, Some(&source)))
    }
}
