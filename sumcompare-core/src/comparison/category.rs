//! Comparison categories and summary sides of the prompt contract.

use serde::{Deserialize, Serialize};

/// One of the five fixed comparison dimensions requested from the LLM.
///
/// The set is closed; the parser never creates categories outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Identify Core Ideas")]
    IdentifyCoreIdeas,
    #[serde(rename = "Highlight Differences in Content")]
    HighlightDifferencesInContent,
    #[serde(rename = "Assess Tone and Emphasis")]
    AssessToneAndEmphasis,
    #[serde(rename = "Contextual Integrity")]
    ContextualIntegrity,
    #[serde(rename = "Summarize Key Differences")]
    SummarizeKeyDifferences,
}

impl Category {
    /// All categories in declared (prompt) order. Heading matching checks them in this order.
    pub const ALL: [Category; 5] = [
        Category::IdentifyCoreIdeas,
        Category::HighlightDifferencesInContent,
        Category::AssessToneAndEmphasis,
        Category::ContextualIntegrity,
        Category::SummarizeKeyDifferences,
    ];

    /// The heading text used in the prompt and in LLM output.
    pub fn label(self) -> &'static str {
        match self {
            Category::IdentifyCoreIdeas => "Identify Core Ideas",
            Category::HighlightDifferencesInContent => "Highlight Differences in Content",
            Category::AssessToneAndEmphasis => "Assess Tone and Emphasis",
            Category::ContextualIntegrity => "Contextual Integrity",
            Category::SummarizeKeyDifferences => "Summarize Key Differences",
        }
    }

    /// First category whose label occurs anywhere in `line`.
    ///
    /// Substring match: a bullet that quotes a label also switches category.
    pub fn find_in(line: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| line.contains(c.label()))
    }

    /// Look up a category by its exact label.
    pub fn from_label(label: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which summary a bullet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Original,
    Neighbor,
}

impl Side {
    /// The sub-heading marker that switches to this side.
    pub fn marker(self) -> &'static str {
        match self {
            Side::Original => "Original Summary",
            Side::Neighbor => "Neighbor Summary",
        }
    }

    /// Side whose marker occurs in `line`; the original marker is checked first.
    pub fn find_in(line: &str) -> Option<Side> {
        if line.contains(Side::Original.marker()) {
            Some(Side::Original)
        } else if line.contains(Side::Neighbor.marker()) {
            Some(Side::Neighbor)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_in_declared_order() {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Identify Core Ideas",
                "Highlight Differences in Content",
                "Assess Tone and Emphasis",
                "Contextual Integrity",
                "Summarize Key Differences",
            ]
        );
    }

    #[test]
    fn test_find_in_heading_variants() {
        assert_eq!(
            Category::find_in("1- Identify Core Ideas:"),
            Some(Category::IdentifyCoreIdeas)
        );
        assert_eq!(
            Category::find_in("### 4. **Contextual Integrity**"),
            Some(Category::ContextualIntegrity)
        );
        assert_eq!(Category::find_in("Overall Verdict"), None);
        assert_eq!(Category::find_in("identify core ideas"), None);
    }

    #[test]
    fn test_find_in_first_declared_wins() {
        let line = "Summarize Key Differences after we Identify Core Ideas";
        assert_eq!(Category::find_in(line), Some(Category::IdentifyCoreIdeas));
    }

    #[test]
    fn test_from_label_and_display() {
        for c in Category::ALL {
            assert_eq!(Category::from_label(c.label()), Some(c));
            assert_eq!(c.to_string(), c.label());
        }
        assert_eq!(Category::from_label("Contextual"), None);
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&Category::AssessToneAndEmphasis).unwrap();
        assert_eq!(json, "\"Assess Tone and Emphasis\"");
    }

    #[test]
    fn test_side_find_in() {
        assert_eq!(Side::find_in("**Original Summary:**"), Some(Side::Original));
        assert_eq!(Side::find_in("Neighbor Summary:"), Some(Side::Neighbor));
        assert_eq!(
            Side::find_in("- Neighbor Summary repeats the Original Summary"),
            Some(Side::Original)
        );
        assert_eq!(Side::find_in("- a bullet"), None);
    }
}
