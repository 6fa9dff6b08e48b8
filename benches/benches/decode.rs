use ark_std::{
    rand::{rngs::StdRng, SeedableRng},
    UniformRand,
};
use babyjub_elgamal::{
    elgamal::encode_u32, storage::InMemoryTableStorage, LookupTable, TableCache,
    DEFAULT_PRECOMPUTE_SIZE,
};
use benches::setup_encryptions;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn table_build(c: &mut Criterion) {
    let sizes = [8u8, 12, 16];
    let mut group = c.benchmark_group("Build lookup table");
    group.sample_size(10);
    for p in sizes {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("2^{} entries", p)),
            &p,
            |b, &p| b.iter(|| LookupTable::build(black_box(p)).unwrap()),
        );
    }
    group.finish();
}

fn decode(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    setup_encryptions!(rng, 10, keypairs, plaintexts, encryptions);
    let points = keypairs
        .iter()
        .zip(encryptions.iter())
        .map(|(kp, e)| e.ciphertext.decrypt(&kp.private_key))
        .collect::<Vec<_>>();

    let cache = TableCache::new(InMemoryTableStorage::new());
    let sizes = [16u8, 18, DEFAULT_PRECOMPUTE_SIZE];
    for p in sizes {
        cache.table(p).unwrap();
    }

    let mut group = c.benchmark_group("Decode");
    for p in sizes {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("precompute size {}", p)),
            &p,
            |b, &p| {
                let mut i = 0;
                b.iter(|| {
                    let m = cache.decode(black_box(&points[i % 10]), p).unwrap();
                    assert_eq!(m, plaintexts[i % 10]);
                    i += 1;
                })
            },
        );
    }
    group.finish();

    c.bench_function("Cached table lookup", |b| {
        b.iter(|| cache.table(black_box(DEFAULT_PRECOMPUTE_SIZE)).unwrap())
    });

    let point = encode_u32(123456);
    c.bench_function("Decode 123456", |b| {
        b.iter(|| cache.decode(black_box(&point), DEFAULT_PRECOMPUTE_SIZE).unwrap())
    });
}

criterion_group!(benches, table_build, decode);
criterion_main!(benches);
