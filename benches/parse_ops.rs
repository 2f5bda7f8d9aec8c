//! Benchmarks for command parsing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use taskling::command::CommandParser;

fn bench_bare_command(c: &mut Criterion) {
    let parser = CommandParser::new();

    c.bench_function("parse_bare", |bench| {
        bench.iter(|| black_box(parser.parse("add buy milk")))
    });
}

fn bench_full_command(c: &mut Criterion) {
    let parser = CommandParser::new();

    c.bench_function("parse_full", |bench| {
        bench.iter(|| {
            black_box(parser.parse(
                "remind me to submit HCI report with high priority by monday in school category",
            ))
        })
    });
}

fn bench_fuzzy_date_tail(c: &mut Criterion) {
    let parser = CommandParser::new();

    c.bench_function("parse_fuzzy_date", |bench| {
        bench.iter(|| black_box(parser.parse("book flights by next friday 5pm")))
    });
}

criterion_group!(
    benches,
    bench_bare_command,
    bench_full_command,
    bench_fuzzy_date_tail
);
criterion_main!(benches);
