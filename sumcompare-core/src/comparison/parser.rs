//! Line-oriented parser for the LLM's comparison text.
//!
//! The response is semi-structured: category headings, "Original Summary" /
//! "Neighbor Summary" sub-headings and `-` bullets. Parsing never fails;
//! anything unrecognized is dropped.

use super::category::{Category, Side};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Appended after every accumulated bullet line.
pub const LINE_BREAK: &str = "<br>";

/// Bullet lines collected for one category, per side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSection {
    #[serde(rename = "Original Summary")]
    pub original: String,
    #[serde(rename = "Neighbor Summary")]
    pub neighbor: String,
}

impl ParsedSection {
    fn side_mut(&mut self, side: Side) -> &mut String {
        match side {
            Side::Original => &mut self.original,
            Side::Neighbor => &mut self.neighbor,
        }
    }

    pub fn side(&self, side: Side) -> &str {
        match side {
            Side::Original => &self.original,
            Side::Neighbor => &self.neighbor,
        }
    }
}

/// Parsed sections keyed by category, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedComparison {
    sections: Vec<(Category, ParsedSection)>,
}

impl ParsedComparison {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: Category) -> Option<&ParsedSection> {
        self.sections
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, s)| s)
    }

    /// Entry for `category`, created empty at the end if missing.
    /// An existing entry keeps its content.
    pub fn entry(&mut self, category: Category) -> &mut ParsedSection {
        let index = match self.sections.iter().position(|(c, _)| *c == category) {
            Some(index) => index,
            None => {
                self.sections.push((category, ParsedSection::default()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index].1
    }

    pub fn contains(&self, category: Category) -> bool {
        self.get(category).is_some()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.sections.iter().map(|(c, _)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &ParsedSection)> {
        self.sections.iter().map(|(c, s)| (*c, s))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl IntoIterator for ParsedComparison {
    type Item = (Category, ParsedSection);
    type IntoIter = std::vec::IntoIter<(Category, ParsedSection)>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

impl Serialize for ParsedComparison {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (category, section) in &self.sections {
            map.serialize_entry(category.label(), section)?;
        }
        map.end()
    }
}

/// Parse a raw comparison response into per-category sections.
///
/// Single pass over trimmed lines:
/// - a line containing a category label selects that category (and keeps
///   being processed);
/// - a line containing a side marker selects that side;
/// - otherwise a `-` bullet is appended to the current category and side,
///   followed by [`LINE_BREAK`];
/// - everything else is ignored.
pub fn parse_comparison(raw: &str) -> ParsedComparison {
    let mut parsed = ParsedComparison::new();
    let mut current_category: Option<Category> = None;
    let mut current_side: Option<Side> = None;

    for line in raw.split('\n') {
        let line = line.trim();

        if let Some(category) = Category::find_in(line) {
            current_category = Some(category);
            parsed.entry(category);
        }

        if let Some(side) = Side::find_in(line) {
            current_side = Some(side);
        } else if line.starts_with('-')
            && let (Some(category), Some(side)) = (current_category, current_side)
        {
            let fragment = parsed.entry(category).side_mut(side);
            fragment.push_str(line);
            fragment.push_str(LINE_BREAK);
        }
    }

    parsed
}
