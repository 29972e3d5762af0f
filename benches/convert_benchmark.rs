//! Benchmarks for conversion throughput.
//!
//! Run with: cargo bench
//!
//! These benchmarks test conversion performance at various document sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pastemark::convert;

/// Creates a synthetic pasted document with the given number of sections,
/// mixing the constructs the heuristics care about: headings, bullets,
/// numbered items, tables, indented code, and bare URLs.
fn synthetic_document(sections: usize) -> String {
    let mut text = String::from("DOCUMENT TITLE\n\n");

    for i in 0..sections {
        text.push_str(&format!("Section Number {}\n", i + 1));
        text.push_str("Some introductory prose that should stay a plain paragraph.\n\n");
        text.push_str("• first bullet point\n");
        text.push_str("• second bullet point\n\n");
        text.push_str("1) A numbered item that ends with closing punctuation.\n\n");
        text.push_str("Name    Value   Unit\n");
        text.push_str("alpha   1.25    ms\n");
        text.push_str("beta    3.50    ms\n\n");
        text.push_str("    let sample = compute();\n");
        text.push_str("    emit(sample);\n\n");
        text.push_str("More details at https://www.example.com/docs for reference.\n\n");
    }

    text
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    for &sections in &[1usize, 10, 100] {
        let input = synthetic_document(sections);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(sections),
            &input,
            |b, input| b.iter(|| convert(black_box(input))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
