#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
use std::fmt::Write;

#[cfg(not(target_arch = "wasm32"))]
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// Builds a synthetic shader unit: `blocks` annotated uniform groups
/// interleaved with plain source lines, every path unique.
#[cfg(not(target_arch = "wasm32"))]
fn build_source(blocks: usize) -> String {
    let mut out = String::new();
    out.push_str("#pragma default uniform (calculate_size=true)\n");
    out.push_str("#pragma default sampler (filter=Linear, wrap=Repeat)\n");
    for i in 0..blocks {
        let _ = writeln!(out, "// group {i}");
        let _ = writeln!(out, "#pragma label \"Group {i}\"");
        let _ = writeln!(out, "#pragma float g{i}.exposure : range(0..10) = 1.0");
        let _ = writeln!(out, "#pragma color g{i}.tint = [1, 1, 1, 1]");
        let _ = writeln!(out, "#pragma vec2 g{i}.offset : range([-1, -1]..[1, 1]) = [0, 0]");
        let _ = writeln!(out, "#pragma uniform g{i}.params (dynamic_offset=true)");
        let _ = writeln!(out, "#pragma sampler g{i}.samp");
        let _ = writeln!(out, "#pragma texture g{i}.atlas[4]");
        let _ = writeln!(out, "var<uniform> g{i}_params: G{i}Params;");
    }
    out
}

#[cfg(not(target_arch = "wasm32"))]
fn bench_pragma_parse(c: &mut Criterion) {
    let source = build_source(64);
    assert!(sigil::parse_unit(&source).is_ok());

    let mut group = c.benchmark_group("pragma_parse");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("parse_unit", |b| {
        b.iter(|| sigil::parse_unit(black_box(&source)))
    });
    group.bench_function("strip_pragmas", |b| {
        b.iter(|| sigil::strip_pragmas(black_box(&source)))
    });
    group.finish();
}

#[cfg(not(target_arch = "wasm32"))]
criterion_group!(benches, bench_pragma_parse);
#[cfg(not(target_arch = "wasm32"))]
criterion_main!(benches);
