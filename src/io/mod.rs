//! Input loading: scanner reports.

pub mod report;

pub use report::{ParseError, load_report, parse_report};
