//! Merges per-neighbor comparisons into one report.
//!
//! Every row holds exactly one cell per neighbor, in neighbor input order.
//! A neighbor whose response never mentioned a category gets an absent
//! (`None`) cell rather than being skipped, so columns always line up.

use super::category::Category;
use super::parser::{ParsedComparison, parse_comparison};
use super::requester::ComparisonRequester;
use crate::error::LlmError;
use crate::types::Summary;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One neighbor's contribution to a category row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborCell {
    pub neighbor_id: String,
    /// `None` when the neighbor's comparison did not produce this category.
    pub fragment: Option<String>,
}

/// A category with the original fragment and every neighbor's fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: Category,
    /// Taken from the first neighbor comparison that produced this category.
    pub original: String,
    pub neighbors: Vec<NeighborCell>,
}

/// Combined result of comparing one original against several neighbors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedReport {
    pub original_id: String,
    pub neighbor_ids: Vec<String>,
    /// Rows in order of first appearance across the neighbor sequence.
    pub rows: Vec<CategoryRow>,
}

impl AggregatedReport {
    pub fn row(&self, category: Category) -> Option<&CategoryRow> {
        self.rows.iter().find(|r| r.category == category)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.rows.iter().map(|r| r.category)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Incrementally folds parsed comparisons into an [`AggregatedReport`].
#[derive(Debug)]
pub struct ReportBuilder {
    report: AggregatedReport,
}

impl ReportBuilder {
    pub fn new(original_id: impl Into<String>) -> Self {
        Self {
            report: AggregatedReport {
                original_id: original_id.into(),
                neighbor_ids: Vec::new(),
                rows: Vec::new(),
            },
        }
    }

    /// Add the next neighbor's parsed comparison.
    ///
    /// New categories are seeded with this comparison's original fragment and
    /// absent cells for all earlier neighbors; existing rows keep their
    /// original fragment. Rows this comparison lacks get an absent cell.
    pub fn push(&mut self, neighbor_id: &str, parsed: ParsedComparison) -> &mut Self {
        let prior = self.report.neighbor_ids.len();
        self.report.neighbor_ids.push(neighbor_id.to_string());

        for (category, section) in parsed {
            if self.report.row(category).is_none() {
                let neighbors = self.report.neighbor_ids[..prior]
                    .iter()
                    .map(|id| NeighborCell {
                        neighbor_id: id.clone(),
                        fragment: None,
                    })
                    .collect();
                self.report.rows.push(CategoryRow {
                    category,
                    original: section.original,
                    neighbors,
                });
            }
            if let Some(row) = self.report.rows.iter_mut().find(|r| r.category == category) {
                row.neighbors.push(NeighborCell {
                    neighbor_id: neighbor_id.to_string(),
                    fragment: Some(section.neighbor),
                });
            }
        }

        for row in &mut self.report.rows {
            if row.neighbors.len() == prior {
                row.neighbors.push(NeighborCell {
                    neighbor_id: neighbor_id.to_string(),
                    fragment: None,
                });
            }
        }
        self
    }

    pub fn finish(self) -> AggregatedReport {
        self.report
    }
}

/// Runs one comparison per neighbor and aggregates the results.
pub struct ReportAggregator {
    requester: ComparisonRequester,
}

impl ReportAggregator {
    pub fn new(requester: ComparisonRequester) -> Self {
        Self { requester }
    }

    pub fn requester(&self) -> &ComparisonRequester {
        &self.requester
    }

    /// Compare `original` with a single neighbor and parse the answer.
    pub async fn compare_pair(
        &self,
        original: &Summary,
        neighbor: &Summary,
    ) -> Result<ParsedComparison, LlmError> {
        let raw = self.requester.compare(&original.text, &neighbor.text).await?;
        Ok(parse_comparison(&raw))
    }

    /// Compare `original` with each neighbor in order.
    ///
    /// Requests are sequential. The first LLM error aborts the whole run.
    pub async fn aggregate(
        &self,
        original: &Summary,
        neighbors: &[Summary],
    ) -> Result<AggregatedReport, LlmError> {
        let mut builder = ReportBuilder::new(&original.id);
        for (i, neighbor) in neighbors.iter().enumerate() {
            info!(
                index = i + 1,
                total = neighbors.len(),
                neighbor = %neighbor.id,
                "Comparing summary {} from file {}",
                i + 1,
                neighbor.id
            );
            let parsed = self.compare_pair(original, neighbor).await?;
            builder.push(&neighbor.id, parsed);
        }
        Ok(builder.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::MockLlmProvider;
    use crate::config::LlmConfig;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn parsed(raw: &str) -> ParsedComparison {
        parse_comparison(raw)
    }

    #[test]
    fn test_builder_single_neighbor() {
        let mut builder = ReportBuilder::new("orig.pdf");
        builder.push(
            "n1.pdf",
            parsed("Identify Core Ideas:\nOriginal Summary:\n- A\nNeighbor Summary:\n- B"),
        );
        let report = builder.finish();
        assert_eq!(report.neighbor_ids, vec!["n1.pdf"]);
        assert_eq!(
            report.rows,
            vec![CategoryRow {
                category: Category::IdentifyCoreIdeas,
                original: "- A<br>".into(),
                neighbors: vec![NeighborCell {
                    neighbor_id: "n1.pdf".into(),
                    fragment: Some("- B<br>".into()),
                }],
            }]
        );
    }

    #[test]
    fn test_builder_first_original_wins() {
        let mut builder = ReportBuilder::new("orig");
        builder.push(
            "n1",
            parsed("Identify Core Ideas:\nOriginal Summary:\n- first view\nNeighbor Summary:\n- x"),
        );
        builder.push(
            "n2",
            parsed("Identify Core Ideas:\nOriginal Summary:\n- drifted view\nNeighbor Summary:\n- y"),
        );
        let report = builder.finish();
        let row = report.row(Category::IdentifyCoreIdeas).unwrap();
        assert_eq!(row.original, "- first view<br>");
        assert_eq!(row.neighbors.len(), 2);
        assert_eq!(row.neighbors[1].fragment.as_deref(), Some("- y<br>"));
    }

    #[test]
    fn test_builder_category_only_in_first_neighbor() {
        let mut builder = ReportBuilder::new("orig");
        builder.push(
            "N1",
            parsed(
                "Identify Core Ideas:\nNeighbor Summary:\n- a\nContextual Integrity:\nNeighbor Summary:\n- c",
            ),
        );
        builder.push("N2", parsed("Identify Core Ideas:\nNeighbor Summary:\n- b"));
        let report = builder.finish();

        let row = report.row(Category::ContextualIntegrity).unwrap();
        assert_eq!(row.neighbors[0].neighbor_id, "N1");
        assert_eq!(row.neighbors[0].fragment.as_deref(), Some("- c<br>"));
        assert_eq!(row.neighbors[1].neighbor_id, "N2");
        assert_eq!(row.neighbors[1].fragment, None);
    }

    #[test]
    fn test_builder_category_first_seen_in_later_neighbor() {
        let mut builder = ReportBuilder::new("orig");
        builder.push("N1", parsed("Identify Core Ideas:\nNeighbor Summary:\n- a"));
        builder.push(
            "N2",
            parsed("Assess Tone and Emphasis:\nOriginal Summary:\n- calm\nNeighbor Summary:\n- loud"),
        );
        let report = builder.finish();

        let row = report.row(Category::AssessToneAndEmphasis).unwrap();
        assert_eq!(row.original, "- calm<br>");
        assert_eq!(
            row.neighbors,
            vec![
                NeighborCell {
                    neighbor_id: "N1".into(),
                    fragment: None
                },
                NeighborCell {
                    neighbor_id: "N2".into(),
                    fragment: Some("- loud<br>".into())
                },
            ]
        );
    }

    #[test]
    fn test_builder_row_order_is_first_appearance() {
        let mut builder = ReportBuilder::new("orig");
        builder.push(
            "N1",
            parsed("Summarize Key Differences:\n- x\nContextual Integrity:\n- y"),
        );
        builder.push(
            "N2",
            parsed("Identify Core Ideas:\n- z\nContextual Integrity:\n- w"),
        );
        let order: Vec<Category> = builder.finish().categories().collect();
        assert_eq!(
            order,
            vec![
                Category::SummarizeKeyDifferences,
                Category::ContextualIntegrity,
                Category::IdentifyCoreIdeas,
            ]
        );
    }

    #[test]
    fn test_builder_every_row_has_one_cell_per_neighbor() {
        let mut builder = ReportBuilder::new("orig");
        builder.push("N1", parsed("Identify Core Ideas:"));
        builder.push("N2", parsed(""));
        builder.push("N3", parsed("Contextual Integrity:"));
        let report = builder.finish();
        assert_eq!(report.neighbor_ids, vec!["N1", "N2", "N3"]);
        for row in &report.rows {
            let ids: Vec<&str> = row.neighbors.iter().map(|c| c.neighbor_id.as_str()).collect();
            assert_eq!(ids, vec!["N1", "N2", "N3"]);
        }
    }

    #[test]
    fn test_builder_empty_responses_produce_no_rows() {
        let mut builder = ReportBuilder::new("orig");
        builder.push("N1", parsed("nothing useful"));
        let report = builder.finish();
        assert!(report.is_empty());
        assert_eq!(report.neighbor_ids, vec!["N1"]);
    }

    #[tokio::test]
    async fn test_aggregate_calls_provider_once_per_neighbor() {
        let provider = Arc::new(MockLlmProvider::with_responses([
            "Identify Core Ideas:\nOriginal Summary:\n- o\nNeighbor Summary:\n- one",
            "Identify Core Ideas:\nOriginal Summary:\n- o\nNeighbor Summary:\n- two",
        ]));
        let aggregator = ReportAggregator::new(ComparisonRequester::new(
            provider.clone(),
            &LlmConfig::default(),
        ));
        let original = Summary::new("orig.pdf", "original text");
        let neighbors = vec![
            Summary::new("n1.pdf", "first neighbor"),
            Summary::new("n2.pdf", "second neighbor"),
        ];

        let report = aggregator.aggregate(&original, &neighbors).await.unwrap();
        assert_eq!(provider.request_count(), 2);
        assert_eq!(report.original_id, "orig.pdf");
        let row = report.row(Category::IdentifyCoreIdeas).unwrap();
        assert_eq!(row.neighbors[0].fragment.as_deref(), Some("- one<br>"));
        assert_eq!(row.neighbors[1].fragment.as_deref(), Some("- two<br>"));

        let second_prompt = &provider.requests()[1].messages[1].text;
        assert!(second_prompt.contains("second neighbor"));
        assert!(second_prompt.contains("original text"));
    }

    #[tokio::test]
    async fn test_aggregate_aborts_on_first_error() {
        let provider = Arc::new(MockLlmProvider::new());
        provider.queue_response(MockLlmProvider::text_response("Identify Core Ideas:"));
        provider.queue_error(LlmError::ApiRequest {
            message: "boom".into(),
        });
        provider.queue_response(MockLlmProvider::text_response("Identify Core Ideas:"));
        let aggregator = ReportAggregator::new(ComparisonRequester::new(
            provider.clone(),
            &LlmConfig::default(),
        ));
        let neighbors = vec![
            Summary::new("n1", "a"),
            Summary::new("n2", "b"),
            Summary::new("n3", "c"),
        ];

        let err = aggregator
            .aggregate(&Summary::new("orig", "o"), &neighbors)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ApiRequest { .. }));
        assert_eq!(provider.request_count(), 2);
    }
}
