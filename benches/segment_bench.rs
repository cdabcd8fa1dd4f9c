//! Segmentation throughput for each breaker
//!
//! Short labels, medium paragraphs and long documents, so scaling with
//! text length shows up next to the per-rune cost of each rule set.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use typeseg::{
    segmenter_for, BreakerKind, GraphemeBreaker, LineBreaker, RuneBreaker, Segmenter,
    WordBreaker,
};

fn texts() -> Vec<(&'static str, String)> {
    vec![
        ("short", "Hello World".to_string()),
        (
            "medium",
            "The quick brown fox jumps over the lazy dog. ".repeat(5),
        ),
        (
            "long",
            "Lorem ipsum dolor sit amet, \"consectetur\" (adipiscing) elit: 12,345.67%. "
                .repeat(40),
        ),
        (
            "emoji",
            "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467} \u{1F1E9}\u{1F1EA} a\u{0301} ".repeat(20),
        ),
    ]
}

/// Count segments so the whole input is consumed
fn count(segmenter: &mut Segmenter<'_>) -> usize {
    let mut n = 0;
    while let Ok(Some(segment)) = segmenter.next_segment() {
        black_box(segment.penalty());
        n += 1;
    }
    n
}

fn bench_breakers(c: &mut Criterion) {
    let texts = texts();
    for kind in BreakerKind::ALL {
        let mut group = c.benchmark_group(format!("{kind:?}").to_lowercase());
        for (name, text) in &texts {
            group.throughput(Throughput::Bytes(text.len() as u64));
            group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
                let mut segmenter = segmenter_for(kind).unwrap();
                b.iter(|| {
                    segmenter.init_str(black_box(text));
                    count(&mut segmenter)
                })
            });
        }
        group.finish();
    }
}

/// All three rule sets summed over one pass
fn bench_combined(c: &mut Criterion) {
    let text = "The quick (\"brown\") fox-like dog can't jump 1,000.5 feet. ".repeat(20);
    c.bench_function("combined_long_text", |b| {
        let breakers: Vec<Box<dyn RuneBreaker>> = vec![
            Box::new(GraphemeBreaker::new().unwrap()),
            Box::new(WordBreaker::new().unwrap()),
            Box::new(LineBreaker::new().unwrap()),
        ];
        let mut segmenter = Segmenter::new(breakers);
        b.iter(|| {
            segmenter.init_str(black_box(&text));
            count(&mut segmenter)
        })
    });
}

/// Cold start: a fresh breaker per run, with the shared tables already built
fn bench_setup(c: &mut Criterion) {
    let _ = LineBreaker::new();
    c.bench_function("line_breaker_new", |b| {
        b.iter(|| LineBreaker::new().unwrap())
    });
}

criterion_group!(benches, bench_breakers, bench_combined, bench_setup);
criterion_main!(benches);
