//! Throughput benchmark for the Extractor (§4.4): automaton + pattern
//! scanning over a representative document, independent of the rest of
//! the pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Write;

use entity_engine::automaton::AutomatonSet;
use entity_engine::corpus::CorpusStore;
use entity_engine::extractor::extract;
use entity_engine::patterns::PatternEngine;

const SAMPLE_DOCUMENT: &str = "\
Dr. John Smith, CEO of Acme Inc., announced a $50 million round on March 15, 2024. \
The company's handrail specification calls for a height of 30-37 inches (76-94 cm), \
rated for temperatures from -20\u{b0}F to 120\u{b0}F. Growth projection: 10-15% annually. \
Call (555) 321-6742 for info, or visit https://example.com for the full filing under 17 C.F.R. 240.10b-5.";

fn build_fixture_corpus() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut f = std::fs::File::create(tmp.path().join("first_names.txt")).unwrap();
    f.write_all(b"John\n").unwrap();
    let mut f = std::fs::File::create(tmp.path().join("last_names.txt")).unwrap();
    f.write_all(b"Smith\n").unwrap();
    let mut f = std::fs::File::create(tmp.path().join("org.txt")).unwrap();
    f.write_all(b"Acme Inc\nAcme Inc.\n").unwrap();
    tmp
}

fn bench_extract(c: &mut Criterion) {
    let tmp = build_fixture_corpus();
    let corpus = CorpusStore::load(tmp.path()).unwrap();
    let automatons = AutomatonSet::build(&corpus).unwrap();
    let patterns = PatternEngine::build().unwrap();
    let pattern_set = patterns.get("default").unwrap();

    c.bench_function("extract_sample_document", |b| {
        b.iter(|| {
            let hits = extract(
                black_box(SAMPLE_DOCUMENT),
                black_box(&automatons),
                black_box(&corpus),
                black_box(pattern_set),
            );
            black_box(hits.len())
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
