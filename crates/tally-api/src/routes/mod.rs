//! Route modules for the API server
//!
//! - reports: trigger report generation and poll job status
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints

pub mod reports;
