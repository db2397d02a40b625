//! Performance benchmarks for rs-table-tracer.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - A small captioned table for microbenchmarks
//! - Generated tables of growing size, traced by both backends

use std::fmt::Write;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rs_table_tracer::{dom, trace_tables, DomTableTracer, EventTiming, MarkupTableTracer, Structure};

const SAMPLE_HTML: &str = r#"
<table class="prices">
    <caption>Prices</caption>
    <thead><tr><th>Item</th><th>Price</th><th>Stock</th></tr></thead>
    <tbody>
        <tr><td>Tea</td><td>2.50</td><td>12</td></tr>
        <tr><td>Coffee</td><td>3.10</td><td>0</td></tr>
        <tr><td>Cocoa</td><td>2.80</td><td>7</td></tr>
    </tbody>
</table>
"#;

/// Builds a table with a head row and `rows` body rows of five cells.
fn generated_table(rows: usize) -> String {
    let mut html = String::from("<table><tr><th>id</th><th>name</th><th>a</th><th>b</th><th>c</th></tr>");
    for row in 0..rows {
        let _ = write!(
            html,
            "<tr><td>{row}</td><td>item {row}</td><td><b>{}</b></td><td>{}</td><td>{}</td></tr>",
            row * 2,
            row * 3,
            row % 7
        );
    }
    html.push_str("</table>");
    html
}

fn bench_sample_dom(c: &mut Criterion) {
    c.bench_function("sample_dom", |b| {
        b.iter(|| trace_tables(black_box(SAMPLE_HTML)));
    });
}

fn bench_sample_markup(c: &mut Criterion) {
    c.bench_function("sample_markup", |b| {
        b.iter(|| {
            let mut tracer = MarkupTableTracer::new();
            tracer.infer_table_from(black_box(SAMPLE_HTML), false)?;
            tracer.table_data()
        });
    });
}

/// Both backends over the same generated tables, with named columns.
fn bench_generated_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("generated");

    for rows in [10, 100, 1000] {
        let html = generated_table(rows);
        group.throughput(Throughput::Bytes(html.len() as u64));

        group.bench_with_input(BenchmarkId::new("dom", rows), &html, |b, html| {
            b.iter(|| {
                let doc = dom::parse(black_box(html), false);
                let mut tracer = DomTableTracer::new();
                tracer.add_event_listener(Structure::Row, EventTiming::Start, |event| {
                    let id = event.table_id().unwrap_or_default();
                    event.tracer_mut().set_column_names(&["id", "name"], id, &[])
                })?;
                tracer.infer_table_from((&doc).into(), false)?;
                tracer.table_data()
            });
        });

        group.bench_with_input(BenchmarkId::new("markup", rows), &html, |b, html| {
            b.iter(|| {
                let mut tracer = MarkupTableTracer::new();
                tracer.add_event_listener(Structure::Row, EventTiming::Start, |event| {
                    let id = event.table_id().unwrap_or_default();
                    event.tracer_mut().set_column_names(&["id", "name"], id, &[])
                })?;
                tracer.infer_table_from(black_box(html.as_str()), false)?;
                tracer.table_data()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_sample_dom,
    bench_sample_markup,
    bench_generated_tables
);
criterion_main!(benches);
