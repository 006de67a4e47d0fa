use criterion::{criterion_group, criterion_main, Criterion};
use std::path::Path;

use mail2es::DocumentOptions;

fn load(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read(path).unwrap()
}

fn bench_convert_simple(c: &mut Criterion) {
    let raw = load("simple.eml");
    let options = DocumentOptions::default();

    c.bench_function("convert_simple", |b| {
        b.iter(|| mail2es::convert(&raw, &options).unwrap())
    });
}

fn bench_convert_multipart(c: &mut Criterion) {
    let raw = load("forwarded.eml");
    let options = DocumentOptions::default();

    c.bench_function("convert_forwarded_to_json", |b| {
        b.iter(|| {
            mail2es::convert(&raw, &options)
                .unwrap()
                .to_json(false)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_convert_simple, bench_convert_multipart);
criterion_main!(benches);
