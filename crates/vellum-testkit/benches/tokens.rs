//! Token construction benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vellum_core::{pae, Version};
use vellum_testkit::fixtures::KeyFixture;

fn bench_pae(c: &mut Criterion) {
    let payload = vec![0u8; 1024];
    let pieces = [payload.as_slice(); 4];
    c.bench_function("pae/4x1KiB", |b| b.iter(|| pae(black_box(&pieces))));
}

fn bench_local(c: &mut Criterion) {
    let message = vec![0x42u8; 1024];
    let mut group = c.benchmark_group("local");
    for version in Version::ALL {
        let fixture = KeyFixture::new(version);
        let token = version.encrypt(&fixture.local, &message, b"", b"").unwrap();

        group.bench_with_input(BenchmarkId::new("encrypt", version), &version, |b, v| {
            b.iter(|| v.encrypt(&fixture.local, black_box(&message), b"", b"").unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decrypt", version), &version, |b, v| {
            b.iter(|| v.decrypt(&fixture.local, black_box(&token), None, b"").unwrap())
        });
    }
    group.finish();
}

fn bench_public(c: &mut Criterion) {
    let message = vec![0x42u8; 1024];
    let mut group = c.benchmark_group("public");
    for version in Version::ALL {
        let fixture = KeyFixture::new(version);
        let token = version.sign(&fixture.secret, &message, b"", b"").unwrap();

        group.bench_with_input(BenchmarkId::new("sign", version), &version, |b, v| {
            b.iter(|| v.sign(&fixture.secret, black_box(&message), b"", b"").unwrap())
        });
        group.bench_with_input(BenchmarkId::new("verify", version), &version, |b, v| {
            b.iter(|| v.verify(&fixture.public, black_box(&token), None, b"").unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pae, bench_local, bench_public);
criterion_main!(benches);
