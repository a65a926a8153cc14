//! Summary comparison pipeline.
//!
//! - [`requester`]: prompt construction and the LLM call
//! - [`parser`]: free-text response to per-category sections
//! - [`aggregator`]: merging several neighbor comparisons
//! - [`renderer`]: HTML table output
//! - [`comparator`]: the end-to-end run including delivery

pub mod aggregator;
pub mod category;
pub mod comparator;
pub mod parser;
pub mod renderer;
pub mod requester;

pub use aggregator::{AggregatedReport, CategoryRow, NeighborCell, ReportAggregator, ReportBuilder};
pub use category::{Category, Side};
pub use comparator::{ComparisonOutcome, SummaryComparator, report_subject};
pub use parser::{LINE_BREAK, ParsedComparison, ParsedSection, parse_comparison};
pub use renderer::{RenderOptions, render_report_html};
pub use requester::{COMPARISON_SYSTEM_PROMPT, ComparisonRequester, build_comparison_prompt};
