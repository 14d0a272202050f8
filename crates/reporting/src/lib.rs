//! Calculation reports — metric tables, text/CSV/JSON export, and `mailto:`
//! links for sharing results.

pub mod mailto;
pub mod report_builder;

pub use mailto::build_mailto_link;
pub use report_builder::{format_amount, CalculationReport, ReportBuilder, ReportRow, ReportValue};
