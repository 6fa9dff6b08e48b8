use ark_std::{
    rand::{rngs::StdRng, SeedableRng},
    UniformRand,
};
use babyjub_elgamal::{elgamal::encode_u32, encrypt, keys::PrivateKey, KeyPair, PublicKey};
use benches::setup_encryptions;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn keys(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    let sk = PrivateKey::random(&mut rng);

    c.bench_function("Derive secret scalar", |b| {
        b.iter(|| black_box(&sk).secret_scalar())
    });

    c.bench_function("Derive public key", |b| {
        b.iter(|| PublicKey::new(black_box(&sk)))
    });

    c.bench_function("Generate keypair", |b| b.iter(|| KeyPair::generate(&mut rng)));
}

fn elgamal(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);
    setup_encryptions!(rng, 10, keypairs, plaintexts, encryptions);

    let mut i = 0;
    c.bench_function("Encrypt", |b| {
        b.iter(|| {
            let msg = encode_u32(plaintexts[i % 10]);
            let e = encrypt(
                &mut rng,
                black_box(&keypairs[i % 10].public_key),
                Some(&msg),
                None,
            )
            .unwrap();
            i += 1;
            e
        })
    });

    let mut i = 0;
    c.bench_function("Decrypt", |b| {
        b.iter(|| {
            let p = encryptions[i % 10]
                .ciphertext
                .decrypt(black_box(&keypairs[i % 10].private_key));
            i += 1;
            p
        })
    });

    let mut i = 0;
    c.bench_function("Rerandomize", |b| {
        b.iter(|| {
            let r = encryptions[i % 10]
                .ciphertext
                .rerandomize(&mut rng, black_box(&keypairs[i % 10].public_key), None)
                .unwrap();
            i += 1;
            r
        })
    });

    c.bench_function("Add ciphertexts", |b| {
        b.iter(|| black_box(encryptions[0].ciphertext) + black_box(encryptions[1].ciphertext))
    });
}

criterion_group!(benches, keys, elgamal);
criterion_main!(benches);
