//! Property-based tests for the response parser and renderer.

use proptest::prelude::*;

use sumcompare_core::comparison::{
    Category, RenderOptions, ReportBuilder, parse_comparison, render_report_html,
};

fn category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

/// Bullet text free of headings and side markers.
fn bullet_text() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,8}( [a-z0-9]{1,8}){0,3}"
}

proptest! {
    #[test]
    fn parse_never_panics(raw in any::<String>()) {
        let _ = parse_comparison(&raw);
    }

    #[test]
    fn text_without_headings_parses_empty(raw in "[a-z \n.-]{0,200}") {
        prop_assert!(parse_comparison(&raw).is_empty());
    }

    #[test]
    fn bullets_are_kept_in_order(
        cat in category(),
        bullets in prop::collection::vec(bullet_text(), 1..8),
    ) {
        let mut raw = format!("{}:\nOriginal Summary:\n", cat.label());
        for b in &bullets {
            raw.push_str(&format!("- {}\n", b));
        }
        let parsed = parse_comparison(&raw);
        let expected: String = bullets
            .iter()
            .map(|b| format!("- {}<br>", b))
            .collect();
        prop_assert_eq!(&parsed.get(cat).unwrap().original, &expected);
        prop_assert_eq!(parsed.get(cat).unwrap().neighbor.as_str(), "");
    }

    #[test]
    fn categories_follow_first_appearance(cats in prop::collection::vec(category(), 1..10)) {
        let raw: String = cats.iter().map(|c| format!("{}:\n", c.label())).collect();
        let parsed = parse_comparison(&raw);
        let mut expected: Vec<Category> = Vec::new();
        for c in &cats {
            if !expected.contains(c) {
                expected.push(*c);
            }
        }
        prop_assert_eq!(parsed.categories().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn every_row_has_a_cell_per_neighbor(
        responses in prop::collection::vec(prop::collection::vec(category(), 0..5), 1..6),
    ) {
        let mut builder = ReportBuilder::new("orig");
        for (i, cats) in responses.iter().enumerate() {
            let raw: String = cats.iter().map(|c| format!("{}:\n", c.label())).collect();
            builder.push(&format!("n{}", i), parse_comparison(&raw));
        }
        let report = builder.finish();
        for row in &report.rows {
            prop_assert_eq!(row.neighbors.len(), responses.len());
        }

        let html = render_report_html(&report, &RenderOptions::default());
        let body = html.split("<tbody>").nth(1).unwrap();
        prop_assert_eq!(body.matches("<tr>").count(), report.rows.len());
        prop_assert_eq!(
            body.matches("<td ").count(),
            report.rows.len() * (responses.len() + 2)
        );
    }
}
