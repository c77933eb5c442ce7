use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode, Throughput};
use ngram_stats::{Analyzer, AnalyzerConfig, ExtensionStrategy};

const WORDS: [&str; 24] = [
    "the", "a", "cat", "dog", "sat", "ran", "on", "under", "mat", "table", "quickly", "slowly",
    "red", "green", "house", "garden", "bird", "sang", "while", "and", "then", "it", "slept",
    "again",
];

fn build_corpus() -> Vec<String> {
    let mut state = 0x2545_f491_u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state as usize
    };
    (0..400)
        .map(|_| {
            let sentences = 1 + next() % 4;
            (0..sentences)
                .map(|_| {
                    let len = 3 + next() % 12;
                    let words: Vec<&str> = (0..len).map(|_| WORDS[next() % WORDS.len()]).collect();
                    format!("{}.", words.join(" "))
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn bench_extension_strategies(c: &mut Criterion) {
    let corpus = build_corpus();
    let total_bytes: usize = corpus.iter().map(String::len).sum();

    let mut group = c.benchmark_group("analyze_trigrams");
    group.throughput(Throughput::Bytes(total_bytes as u64));
    group.sampling_mode(SamplingMode::Flat);
    for strategy in [ExtensionStrategy::PrefixScan, ExtensionStrategy::CrossProduct] {
        let cfg = AnalyzerConfig::builder()
            .order(3)
            .katz_threshold(5)
            .extension_strategy(strategy)
            .show_progress(false)
            .build()
            .expect("configuration");
        group.bench_function(BenchmarkId::from_parameter(strategy), |b| {
            b.iter(|| {
                let analyzer = Analyzer::new(cfg.clone());
                // Smoothing may reject a synthetic corpus; the counting work is what is measured.
                let _ = black_box(analyzer.analyze(&corpus));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_extension_strategies);
criterion_main!(benches);
