use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use radial_tree_renderer::aggregate::{aggregate, build_tree};
use radial_tree_renderer::config::{AggregateConfig, Config, LayoutConfig};
use radial_tree_renderer::ir::Record;
use radial_tree_renderer::layout::compute_layout;
use radial_tree_renderer::layout::{TidyOptions, tidy_tree};
use radial_tree_renderer::page::render_page;
use radial_tree_renderer::parser::parse_records;
use radial_tree_renderer::render::render_svg;
use radial_tree_renderer::theme::Theme;
use radial_tree_renderer::viewer::ViewerState;
use std::hint::black_box;

const CLASSES: [&str; 4] = ["攻略", "下载", "新闻", "杂谈"];

/// `titles` titles per class, each carrying `subtitles` subtitle rows.
fn synthetic_records(titles: usize, subtitles: usize) -> Vec<Record> {
    let mut out = Vec::new();
    for class in CLASSES {
        for t in 0..titles {
            let title = format!("{class} title number {t}");
            if subtitles == 0 {
                out.push(Record::new(class, &title, None));
            }
            for s in 0..subtitles {
                out.push(Record::new(class, &title, Some(&format!("Part {s}"))));
            }
        }
    }
    out
}

fn synthetic_json(titles: usize, subtitles: usize) -> String {
    let rows: Vec<String> = synthetic_records(titles, subtitles)
        .iter()
        .map(|r| {
            format!(
                "{{\"class\":\"{}\",\"title\":\"{}\",\"subtitle\":{}}}",
                r.class,
                r.title,
                r.subtitle()
                    .map(|s| format!("\"{s}\""))
                    .unwrap_or_else(|| "null".to_string())
            )
        })
        .collect();
    format!("[{}]", rows.join(","))
}

fn layout_config() -> LayoutConfig {
    LayoutConfig {
        fast_text_metrics: true,
        ..Default::default()
    }
}

const SIZES: [(&str, usize, usize); 3] = [("small", 5, 2), ("medium", 30, 5), ("capped", 90, 20)];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, titles, subtitles) in SIZES {
        let input = synthetic_json(titles, subtitles);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let parsed = parse_records(black_box(data)).expect("parse failed");
                black_box(parsed.records.len());
            });
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let config = AggregateConfig::default();
    for (name, titles, subtitles) in SIZES {
        let records = synthetic_records(titles, subtitles);
        group.bench_with_input(BenchmarkId::from_parameter(name), &records, |b, records| {
            b.iter(|| {
                let classes = aggregate(black_box(records), true, &config);
                black_box(classes.len());
            });
        });
    }
    group.finish();
}

fn bench_tidy(c: &mut Criterion) {
    let mut group = c.benchmark_group("tidy");
    let options = TidyOptions {
        breadth: std::f32::consts::TAU,
        depth: 380.0,
        sibling_separation: 1.0,
        subtree_separation: 2.0,
    };
    for (name, titles, subtitles) in SIZES {
        let tree = build_tree(
            &synthetic_records(titles, subtitles),
            true,
            &AggregateConfig::default(),
            "🐒",
        );
        group.bench_with_input(BenchmarkId::from_parameter(name), &tree, |b, tree| {
            b.iter(|| {
                let points = tidy_tree(black_box(tree), &options);
                black_box(points.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let theme = Theme::classic();
    let config = layout_config();
    for (name, titles, subtitles) in SIZES {
        let tree = build_tree(
            &synthetic_records(titles, subtitles),
            true,
            &AggregateConfig::default(),
            "🐒",
        );
        group.bench_with_input(BenchmarkId::from_parameter(name), &tree, |b, tree| {
            b.iter(|| {
                let layout = compute_layout(black_box(tree), &theme, &config);
                black_box(layout.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let theme = Theme::classic();
    let config = layout_config();
    for (name, titles, subtitles) in SIZES {
        let tree = build_tree(
            &synthetic_records(titles, subtitles),
            true,
            &AggregateConfig::default(),
            "🐒",
        );
        let layout = compute_layout(&tree, &theme, &config);
        group.bench_with_input(BenchmarkId::from_parameter(name), &layout, |b, layout| {
            b.iter(|| {
                let svg = render_svg(black_box(layout), &theme, &config);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let mut config = Config::default();
    config.layout.fast_text_metrics = true;
    for (name, titles, subtitles) in SIZES {
        let input = synthetic_json(titles, subtitles);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let parsed = parse_records(black_box(data)).expect("parse failed");
                let state = ViewerState::from_records(&parsed.records, &config);
                let html = render_page(&state, &config).expect("render failed");
                black_box(html.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_aggregate, bench_tidy, bench_layout, bench_render, bench_end_to_end
);
criterion_main!(benches);
