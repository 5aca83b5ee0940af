//! Report generation engine
//!
//! Loads the CSV ledgers of the input directory, reduces them into the
//! `accounts`, `yearly` and `fs` reports, writes those as CSV and tracks
//! the state of each report job.

pub mod classifier;
pub mod error;
pub mod jobs;
pub mod reports;
pub mod types;
pub mod writer;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tally_config::Config;
use tally_parser::{DefaultLedgerReader, LedgerReaderTrait, ReaderRef};

pub use classifier::{categorize, classify};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use jobs::{JobState, JobTracker, ReportStatus};
pub use reports::{aggregate, Aggregator, Report, ReportRow};
pub use types::{Category, ReportKind};

/// Result of a successful report run
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub kind: ReportKind,
    pub path: PathBuf,
    pub rows: usize,
    pub duration_ms: u64,
}

/// Runs report jobs and owns their state
pub struct ReportService {
    config: Config,
    reader: ReaderRef,
    jobs: JobTracker,
}

impl ReportService {
    /// Create a service reading ledgers through `reader`
    pub fn new(config: Config, reader: ReaderRef) -> Self {
        Self {
            config,
            reader,
            jobs: JobTracker::new(),
        }
    }

    /// Create a service backed by the filesystem reader
    pub fn with_default_reader(config: Config) -> Self {
        Self::new(config, Arc::new(DefaultLedgerReader))
    }

    /// Current state of one job
    pub fn state(&self, kind: ReportKind) -> JobState {
        self.jobs.state(kind)
    }

    /// Current state of every job; never waits on a running job
    pub fn status(&self) -> ReportStatus {
        self.jobs.snapshot()
    }

    /// Run one report job to completion
    ///
    /// The job is marked running before any I/O. On failure the job is
    /// marked failed and the error is also returned to the caller.
    pub async fn run(&self, kind: ReportKind) -> CoreResult<ReportOutcome> {
        let started = Instant::now();
        self.jobs.start(kind);
        log::info!("Generating {} report", kind);

        let result = match self.config.reports.timeout_secs {
            Some(seconds) => tokio::time::timeout(Duration::from_secs(seconds), self.generate(kind))
                .await
                .unwrap_or(Err(CoreError::Timeout { job: kind, seconds })),
            None => self.generate(kind).await,
        };

        match result {
            Ok((path, rows)) => {
                let duration_ms = started.elapsed().as_millis() as u64;
                self.jobs.succeed(kind, duration_ms);
                log::info!(
                    "Report {} written to {} ({} rows) in {}ms",
                    kind,
                    path.display(),
                    rows,
                    duration_ms
                );
                Ok(ReportOutcome {
                    kind,
                    path,
                    rows,
                    duration_ms,
                })
            }
            Err(e) => {
                match e.severity() {
                    ErrorSeverity::Warning => {
                        log::warn!("[{}] Report {} failed: {}", e.code(), kind, e)
                    }
                    ErrorSeverity::Error => log::error!("[{}] Report {} failed: {}", e.code(), kind, e),
                }
                self.jobs.fail(kind, e.to_string());
                Err(e)
            }
        }
    }

    async fn generate(&self, kind: ReportKind) -> CoreResult<(PathBuf, usize)> {
        let exclude = kind.excluded_inputs();
        let transactions = self
            .reader
            .load(&self.config.data.input_dir, &exclude)
            .await?;
        log::debug!("Report {}: {} transactions loaded", kind, transactions.len());

        let report = aggregate(kind, &transactions)?;
        let path = writer::write_report(
            &self.config.data.output_dir,
            &report,
            self.config.reports.decimal_places,
        )
        .await?;
        Ok((path, report.rows.len()))
    }

    pub async fn accounts(&self) -> CoreResult<ReportOutcome> {
        self.run(ReportKind::Accounts).await
    }

    pub async fn yearly(&self) -> CoreResult<ReportOutcome> {
        self.run(ReportKind::Yearly).await
    }

    pub async fn fs(&self) -> CoreResult<ReportOutcome> {
        self.run(ReportKind::Fs).await
    }

    /// Run the three jobs concurrently and wait for all of them
    ///
    /// Every job gets its own task, so a job that fails or panics does not
    /// stop the others. A panicked job is marked failed.
    pub async fn run_all(self: &Arc<Self>) -> Vec<(ReportKind, CoreResult<ReportOutcome>)> {
        let handles: Vec<_> = ReportKind::ALL
            .into_iter()
            .map(|kind| {
                let service = Arc::clone(self);
                (kind, tokio::spawn(async move { service.run(kind).await }))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (kind, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    let error = CoreError::Aborted {
                        job: kind,
                        message: e.to_string(),
                    };
                    log::error!("[{}] Report {} failed: {}", error.code(), kind, error);
                    self.jobs.fail(kind, error.to_string());
                    Err(error)
                }
            };
            results.push((kind, result));
        }
        results
    }

    /// Start all three jobs in the background and return immediately
    ///
    /// Callers poll [`ReportService::status`]. The returned handle only
    /// matters to callers that want to wait, such as the one-shot CLI.
    pub fn start_generation(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let started = Instant::now();
        for kind in ReportKind::ALL {
            self.jobs.start(kind);
        }

        let service = Arc::clone(self);
        tokio::spawn(async move {
            let results = service.run_all().await;
            let mut failed = false;
            for (kind, result) in &results {
                if let Err(e) = result {
                    failed = true;
                    log::error!("Report generation failed for {}: {}", kind, e);
                }
            }
            if !failed {
                log::info!(
                    "Report generation finished in {}ms",
                    started.elapsed().as_millis()
                );
            }
        })
    }
}

// ==================== Tests ====================
