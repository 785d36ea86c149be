//! Report module - terminal tables and JSON export of analysis results

pub mod eda_report;
pub mod summary;
pub mod tables;

pub use eda_report::*;
pub use summary::*;
pub use tables::*;
