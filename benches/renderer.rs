use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mindr::{CharWidthMetrics, Config, SectionPalette, layout_tree, parse_outline, render_svg};
use std::hint::black_box;

/// One long chain, each item two spaces deeper than the last.
fn deep_outline(levels: usize) -> String {
    let mut out = String::new();
    for level in 0..levels {
        out.push_str(&" ".repeat(level * 2));
        out.push_str(&format!("- level {}\n", level));
    }
    out
}

/// A root with `branches` children, each carrying `leaves` leaf items.
fn wide_outline(branches: usize, leaves: usize) -> String {
    let mut out = String::from("- root\n");
    for branch in 0..branches {
        out.push_str(&format!("  - branch {}\n", branch));
        for leaf in 0..leaves {
            out.push_str(&format!("    - leaf {}-{}\n", branch, leaf));
        }
    }
    out
}

/// Every third item carries a continuation line, exercising multi-line
/// label measurement.
fn multiline_outline(items: usize) -> String {
    let mut out = String::from("- root\n");
    for item in 0..items {
        out.push_str(&format!("  - item {}\n", item));
        if item % 3 == 0 {
            out.push_str("with a continuation line\n");
        }
    }
    out
}

fn sources() -> Vec<(&'static str, String)> {
    vec![
        ("deep_64", deep_outline(64)),
        ("deep_256", deep_outline(256)),
        ("wide_16x16", wide_outline(16, 16)),
        ("wide_32x8", wide_outline(32, 8)),
        ("multiline_200", multiline_outline(200)),
    ]
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, input) in sources() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let root = parse_outline(black_box(data)).expect("parse failed");
                black_box(root.node_count());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = Config::default();
    let metrics = CharWidthMetrics::default();
    let palette = SectionPalette::default();
    for (name, input) in sources() {
        let outline = parse_outline(&input).expect("parse failed");
        let root = outline.children.first().expect("empty outline").clone();
        group.bench_with_input(BenchmarkId::from_parameter(name), &root, |b, root| {
            b.iter(|| {
                let (surface, _) =
                    layout_tree(black_box(root), &config.layout, &metrics, &palette)
                        .expect("layout failed");
                black_box(surface.ops().len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let config = Config::default();
    let metrics = CharWidthMetrics::default();
    let palette = SectionPalette::default();
    for (name, input) in sources() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let outline = parse_outline(black_box(data)).expect("parse failed");
                let root = outline.children.first().expect("empty outline");
                let (surface, _) = layout_tree(root, &config.layout, &metrics, &palette)
                    .expect("layout failed");
                let svg = render_svg(&surface, &config.layout, &config.render);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_layout, bench_end_to_end
);
criterion_main!(benches);
