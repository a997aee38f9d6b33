//! Scanner and suggestion benchmarks.
//!
//! Run with: cargo bench -p commentator-analysis --bench scanner_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use commentator_analysis::dictionary::Dictionary;
use commentator_analysis::generation::{GenerationSettings, SuggestionEngine};
use commentator_analysis::patterns::PatternLearner;
use commentator_analysis::pipeline::suggest_source;
use commentator_analysis::structure::scan_source;

/// One translation-unit-sized chunk of C++ per index.
fn sample_unit(idx: usize) -> String {
    format!(
        r#"namespace game_{idx} {{
// Base address of the height table
static const unsigned kBase_{idx} = 0x{idx:04X};
uint8_t buffer_{idx}[256];

struct Entity_{idx} {{
    int health;
    float speed;
}};

// Advances the simulation
int step_{idx}(int frames) {{
    int total = 0;
    for (int i = 0; i < frames; ++i) {{
        if (i % 4 == 0) {{
            total += i << 2;
        }}
    }}
    while (total > {idx}) {{
        total >>= 1;
    }}
    return total & 0xFF;
}}
}}
"#
    )
}

fn generate_source(units: usize) -> String {
    (0..units).map(sample_unit).collect()
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_source");
    for units in [10usize, 100, 1000] {
        let src = generate_source(units);
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(units), &src, |b, src| {
            b.iter(|| scan_source("bench.cpp", src));
        });
    }
    group.finish();
}

fn bench_learn_and_suggest(c: &mut Criterion) {
    let dict = Dictionary::from_entries([("kBase", "Terrain height base"), ("total", "Running total")]);
    let learner = PatternLearner::new(&dict);
    let mut group = c.benchmark_group("suggest_source");
    for units in [10usize, 100] {
        let src = generate_source(units);
        let (table, _) = learner.learn_source(0, "bench.cpp", &src);
        let model = table.finalize(8, 1);
        let engine = SuggestionEngine::new(&model, &dict, GenerationSettings::default());
        group.bench_with_input(BenchmarkId::from_parameter(units), &src, |b, src| {
            b.iter(|| suggest_source(&engine, "bench.cpp", src));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan, bench_learn_and_suggest);
criterion_main!(benches);
