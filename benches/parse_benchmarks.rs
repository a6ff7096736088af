use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use optic_core::{interpret, lexer::Lexer, parser::Parser, schema::OptionSchema};

// ============================================================================
// Test Data: Varying Complexity and Size
// ============================================================================

const TINY_ARGS: &str = "--help";

const SMALL_ARGS: &str = "--entrypoint main --graph-max-depth 5 -hv";

const MEDIUM_ARGS: &str = "--entrypoint main --graph-max-depth=250 \
    --ignore-files generated --version=false -abc --max-depth 9 \
    --not-real-flag --also-unknown=value -v";

fn large_args() -> String {
    let mut input = String::new();
    for i in 0..200 {
        input.push_str(&format!("--flag{i}=value{i} -xyz --spaced{i} v{i} "));
    }
    input
}

fn bench_lexer(c: &mut Criterion) {
    let large = large_args();
    let mut group = c.benchmark_group("lexer");
    for (name, input) in [
        ("tiny", TINY_ARGS),
        ("small", SMALL_ARGS),
        ("medium", MEDIUM_ARGS),
        ("large", large.as_str()),
    ] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| Lexer::new(black_box(input)).lex());
        });
    }
    group.finish();
}

fn bench_parser(c: &mut Criterion) {
    let large = large_args();
    let mut group = c.benchmark_group("parser");
    for (name, input) in [
        ("tiny", TINY_ARGS),
        ("small", SMALL_ARGS),
        ("medium", MEDIUM_ARGS),
        ("large", large.as_str()),
    ] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| Parser::new(black_box(input)).parse());
        });
    }
    group.finish();
}

fn bench_interpret(c: &mut Criterion) {
    let schema = OptionSchema::standard();
    let mut group = c.benchmark_group("interpret");
    for (name, input) in [
        ("tiny", TINY_ARGS),
        ("small", SMALL_ARGS),
        ("medium", MEDIUM_ARGS),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| interpret(black_box(input), &schema));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lexer, bench_parser, bench_interpret);
criterion_main!(benches);
