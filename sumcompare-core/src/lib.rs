//! # sumcompare core
//!
//! Compares AI-generated document summaries with an LLM, parses the
//! structured differences, aggregates several neighbor comparisons into one
//! report, renders it as HTML and delivers it by email.

pub mod brain;
pub mod comparison;
pub mod config;
pub mod delivery;
pub mod error;
pub mod providers;
pub mod types;

// Re-export commonly used types at the crate root.
pub use brain::{LlmProvider, MockLlmProvider};
pub use comparison::{
    AggregatedReport, Category, ComparisonOutcome, ParsedComparison, ParsedSection,
    SummaryComparator, parse_comparison, render_report_html,
};
pub use config::{ComparatorConfig, EmailConfig, LlmConfig, ReportConfig, load_config};
pub use delivery::{DeliveryStatus, MemorySink, ReportSink, SmtpReportSink};
pub use error::{Result, SumcompareError};
pub use types::Summary;
