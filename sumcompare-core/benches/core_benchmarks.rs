use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sumcompare_core::comparison::{
    Category, RenderOptions, ReportBuilder, parse_comparison, render_report_html,
};

fn protocol_response(bullets_per_side: usize) -> String {
    let mut raw = String::new();
    for (i, category) in Category::ALL.iter().enumerate() {
        raw.push_str(&format!("{}- {}:\n   **Original Summary:**\n", i + 1, category));
        for j in 0..bullets_per_side {
            raw.push_str(&format!("   - original point {}\n", j));
        }
        raw.push_str("\n   **Neighbor Summary:**\n");
        for j in 0..bullets_per_side {
            raw.push_str(&format!("   - neighbor point {}\n", j));
        }
        raw.push('\n');
    }
    raw
}

fn bench_parser(c: &mut Criterion) {
    let small = protocol_response(2);
    c.bench_function("parse_protocol_response", |b| {
        b.iter(|| parse_comparison(black_box(&small)))
    });

    let large = protocol_response(200);
    c.bench_function("parse_long_response", |b| {
        b.iter(|| parse_comparison(black_box(&large)))
    });

    let prose = "no structure here at all\n".repeat(2000);
    c.bench_function("parse_unstructured_text", |b| {
        b.iter(|| parse_comparison(black_box(&prose)))
    });
}

fn bench_aggregate_and_render(c: &mut Criterion) {
    let raw = protocol_response(5);

    c.bench_function("aggregate_ten_neighbors", |b| {
        b.iter(|| {
            let mut builder = ReportBuilder::new("original.pdf");
            for i in 0..10 {
                builder.push(&format!("neighbor_{}.pdf", i), parse_comparison(&raw));
            }
            builder.finish()
        })
    });

    let mut builder = ReportBuilder::new("original.pdf");
    for i in 0..10 {
        builder.push(&format!("neighbor_{}.pdf", i), parse_comparison(&raw));
    }
    let report = builder.finish();
    let escaped = RenderOptions {
        escape_fragments: true,
        ..Default::default()
    };

    c.bench_function("render_html_verbatim", |b| {
        b.iter(|| render_report_html(black_box(&report), &RenderOptions::default()))
    });
    c.bench_function("render_html_escaped", |b| {
        b.iter(|| render_report_html(black_box(&report), &escaped))
    });
}

criterion_group!(benches, bench_parser, bench_aggregate_and_render);
criterion_main!(benches);
