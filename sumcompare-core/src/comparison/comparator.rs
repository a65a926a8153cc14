//! End-to-end comparison run: aggregate, render, deliver.

use super::aggregator::{AggregatedReport, ReportAggregator};
use super::parser::ParsedComparison;
use super::renderer::{RenderOptions, render_report_html};
use super::requester::ComparisonRequester;
use crate::brain::LlmProvider;
use crate::config::ComparatorConfig;
use crate::delivery::{DeliveryStatus, ReportSink, deliver_logged};
use crate::error::{ComparisonError, Result, SumcompareError};
use crate::types::Summary;
use serde::Serialize;
use std::sync::Arc;
use tracing::{Instrument, info, info_span};

/// Email subject for a multi-neighbor report.
pub fn report_subject(original_id: &str) -> String {
    format!("Summary Comparison Results for {original_id} with Multiple Neighbors")
}

/// Everything produced by one multi-neighbor run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutcome {
    pub report: AggregatedReport,
    pub subject: String,
    pub html: String,
    pub delivery: DeliveryStatus,
}

/// Compares an original summary against neighbors and emails the result.
pub struct SummaryComparator {
    aggregator: ReportAggregator,
    sink: Arc<dyn ReportSink>,
    render_options: RenderOptions,
    send_email: bool,
}

impl SummaryComparator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        sink: Arc<dyn ReportSink>,
        config: &ComparatorConfig,
    ) -> Self {
        let requester = ComparisonRequester::new(provider, &config.llm);
        Self {
            aggregator: ReportAggregator::new(requester),
            sink,
            render_options: RenderOptions::from(&config.report),
            send_email: config.report.send_email,
        }
    }

    /// Compare the original with one neighbor and return the parsed sections.
    pub async fn compare_summaries(
        &self,
        original: &Summary,
        neighbor: &Summary,
    ) -> Result<ParsedComparison> {
        Ok(self.aggregator.compare_pair(original, neighbor).await?)
    }

    /// Compare the original with every neighbor, render one table and send it.
    ///
    /// LLM failures abort the run. Delivery failures are logged and reported
    /// in [`ComparisonOutcome::delivery`] instead.
    pub async fn compare_with_multiple_neighbors(
        &self,
        original: &Summary,
        neighbors: &[Summary],
    ) -> Result<ComparisonOutcome> {
        if neighbors.is_empty() {
            return Err(ComparisonError::NoNeighbors {
                original_id: original.id.clone(),
            }
            .into());
        }

        let span = info_span!(
            "compare",
            original = %original.id,
            neighbors = neighbors.len(),
            model = %self.aggregator.requester().model_name()
        );

        async {
            let report = self.aggregator.aggregate(original, neighbors).await?;
            let html = render_report_html(&report, &self.render_options);
            let subject = report_subject(&original.id);

            info!(rows = report.rows.len(), "Report rendered");

            let delivery = if self.send_email {
                deliver_logged(self.sink.as_ref(), &subject, &html, true).await
            } else {
                DeliveryStatus::Skipped
            };

            Ok::<_, SumcompareError>(ComparisonOutcome {
                report,
                subject,
                html,
                delivery,
            })
        }
        .instrument(span)
        .await
    }
}
