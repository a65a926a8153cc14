//! HTML rendering of an aggregated comparison report.
//!
//! Produces a single table: one row per category, one column for the
//! original summary and one per neighbor.

use super::aggregator::{AggregatedReport, CategoryRow};
use super::parser::LINE_BREAK;
use crate::config::ReportConfig;

const TABLE_OPEN: &str = "<table border='1' cellpadding='5' cellspacing='0' style='border-collapse: collapse; width: 100%;'>";
const TH_OPEN: &str = "<th style='text-align: left;'>";
const TD_DIVIDER_OPEN: &str = "<td style='text-align: left; border-right: 2px solid black;'>";
const TD_OPEN: &str = "<td style='text-align: left;'>";

/// Options controlling how fragments are written into cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Escape LLM fragments. When false they are trusted and inserted verbatim.
    pub escape_fragments: bool,
    /// Written into cells of neighbors that produced nothing for a category.
    pub absent_marker: String,
}

impl From<&ReportConfig> for RenderOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            escape_fragments: config.escape_fragments,
            absent_marker: config.absent_marker.clone(),
        }
    }
}

/// Render the report as an HTML table.
///
/// Header cells and category names are always escaped. Neighbor columns
/// follow `report.neighbor_ids`, which every row matches cell for cell.
pub fn render_report_html(report: &AggregatedReport, options: &RenderOptions) -> String {
    let mut html = String::from(TABLE_OPEN);
    html.push_str("<thead><tr>");
    html.push_str(&format!("{TH_OPEN}Comparison Category</th>"));
    html.push_str(&format!(
        "{TH_OPEN}Original Summary ({})</th>",
        escape_html(&report.original_id)
    ));
    for (i, neighbor_id) in report.neighbor_ids.iter().enumerate() {
        html.push_str(&format!(
            "{TH_OPEN}Neighbor Summary {} ({})</th>",
            i + 1,
            escape_html(neighbor_id)
        ));
    }
    html.push_str("</tr></thead><tbody>");

    for row in &report.rows {
        render_row(&mut html, row, options);
    }

    html.push_str("</tbody></table>");
    html
}

fn render_row(html: &mut String, row: &CategoryRow, options: &RenderOptions) {
    html.push_str("<tr>");
    html.push_str(&format!(
        "{TD_DIVIDER_OPEN}<strong>{}</strong></td>",
        escape_html(row.category.label())
    ));
    html.push_str(&format!(
        "{TD_DIVIDER_OPEN}{}</td>",
        fragment_html(&row.original, options)
    ));
    for cell in &row.neighbors {
        let content = match &cell.fragment {
            Some(fragment) => fragment_html(fragment, options),
            None => escape_html(&options.absent_marker),
        };
        html.push_str(&format!("{TD_OPEN}{content}</td>"));
    }
    html.push_str("</tr>");
}

/// Fragment as cell content. When escaping, the `<br>` separators survive.
fn fragment_html(fragment: &str, options: &RenderOptions) -> String {
    if options.escape_fragments {
        fragment
            .split(LINE_BREAK)
            .map(escape_html)
            .collect::<Vec<_>>()
            .join(LINE_BREAK)
    } else {
        fragment.to_string()
    }
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
