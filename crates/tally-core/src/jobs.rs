//! Per-report job state
//!
//! Each report owns its own state slot. A run only ever writes the slot of
//! its own report, and no lock is held across an `.await`, so status reads
//! return immediately while reports are being generated.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::types::ReportKind;

/// Observable state of one report job
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum JobState {
    /// Never run since process start
    #[default]
    Idle,
    /// Generation in progress
    Running,
    /// Output written; duration measured from run start
    Succeeded { duration_ms: u64 },
    /// Run aborted; the reason is the error message
    Failed { reason: String },
}

impl JobState {
    pub fn is_running(&self) -> bool {
        matches!(self, JobState::Running)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Idle => write!(f, "idle"),
            JobState::Running => write!(f, "running"),
            JobState::Succeeded { duration_ms } => write!(f, "finished in {}ms", duration_ms),
            JobState::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Status of all three reports, keyed by output file name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStatus {
    #[serde(rename = "accounts.csv")]
    pub accounts: String,
    #[serde(rename = "yearly.csv")]
    pub yearly: String,
    #[serde(rename = "fs.csv")]
    pub fs: String,
}

/// Independent state slots for the three report jobs
#[derive(Debug, Default)]
pub struct JobTracker {
    accounts: RwLock<JobState>,
    yearly: RwLock<JobState>,
    fs: RwLock<JobState>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: ReportKind) -> &RwLock<JobState> {
        match kind {
            ReportKind::Accounts => &self.accounts,
            ReportKind::Yearly => &self.yearly,
            ReportKind::Fs => &self.fs,
        }
    }

    /// Current state of a job
    pub fn state(&self, kind: ReportKind) -> JobState {
        // A poisoned slot still holds the last state written
        match self.slot(kind).read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Overwrite the state of a job
    pub fn set(&self, kind: ReportKind, state: JobState) {
        log::debug!("Report {} -> {}", kind, state);
        match self.slot(kind).write() {
            Ok(mut guard) => *guard = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    }

    pub fn start(&self, kind: ReportKind) {
        self.set(kind, JobState::Running);
    }

    pub fn succeed(&self, kind: ReportKind, duration_ms: u64) {
        self.set(kind, JobState::Succeeded { duration_ms });
    }

    pub fn fail(&self, kind: ReportKind, reason: impl Into<String>) {
        self.set(kind, JobState::Failed { reason: reason.into() });
    }

    /// Human-readable state of every job
    pub fn snapshot(&self) -> ReportStatus {
        ReportStatus {
            accounts: self.state(ReportKind::Accounts).to_string(),
            yearly: self.state(ReportKind::Yearly).to_string(),
            fs: self.state(ReportKind::Fs).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle() {
        let tracker = JobTracker::new();
        for kind in ReportKind::ALL {
            assert_eq!(tracker.state(kind), JobState::Idle);
        }
        let status = tracker.snapshot();
        assert_eq!(status.accounts, "idle");
        assert_eq!(status.yearly, "idle");
        assert_eq!(status.fs, "idle");
    }

    #[test]
    fn test_slots_are_independent() {
        let tracker = JobTracker::new();
        tracker.start(ReportKind::Yearly);
        tracker.succeed(ReportKind::Fs, 12);

        assert_eq!(tracker.state(ReportKind::Accounts), JobState::Idle);
        assert!(tracker.state(ReportKind::Yearly).is_running());
        assert_eq!(tracker.snapshot().fs, "finished in 12ms");
    }

    #[test]
    fn test_rerun_goes_back_to_running() {
        let tracker = JobTracker::new();
        tracker.fail(ReportKind::Accounts, "Directory not found");
        assert!(matches!(tracker.state(ReportKind::Accounts), JobState::Failed { .. }));
        assert_eq!(tracker.snapshot().accounts, "failed: Directory not found");

        tracker.start(ReportKind::Accounts);
        assert_eq!(tracker.snapshot().accounts, "running");
        assert!(tracker.state(ReportKind::Accounts).is_running());
    }

    #[test]
    fn test_status_serializes_with_file_names() {
        let tracker = JobTracker::new();
        tracker.succeed(ReportKind::Accounts, 3);
        let json = serde_json::to_value(tracker.snapshot()).unwrap();
        assert_eq!(json["accounts.csv"], "finished in 3ms");
        assert_eq!(json["yearly.csv"], "idle");
        assert_eq!(json["fs.csv"], "idle");
    }

    #[test]
    fn test_job_state_serializes_tagged() {
        let json = serde_json::to_value(JobState::Succeeded { duration_ms: 7 }).unwrap();
        assert_eq!(json["state"], "succeeded");
        assert_eq!(json["duration_ms"], 7);
    }
}
