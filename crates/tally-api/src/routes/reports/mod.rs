//! Report routes - start generation and poll status
//!
//! Structure:
//! - api.rs: JSON API endpoints

pub mod api;

pub use api::{api_report_state, api_reports_generate, api_reports_status};
