//! Output module
//! Report assembly and formatting for match results

pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::MatchReport;
