//! # PoA-Chain Subsystem Benchmarks
//!
//! | Subsystem | Operation |
//! |-----------|-----------|
//! | pc-01 Authority | ECDSA sign, verify |
//! | pc-02 Block | transaction root over N transactions |
//! | pc-04 Ledger | append, full-chain audit |
//! | pc-05 Mempool | add, select_for_block |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pc_01_authority::Authority;
use pc_02_block::compute_transaction_root;
use pc_05_mempool::{Mempool, MempoolConfig};
use pc_tests::fixtures::{create_ledger, extend_chain, next_block, transaction, BLOCK_INTERVAL_MS};
use rand::Rng;
use shared_crypto::sha256;
use std::sync::Arc;
use std::time::Duration;

fn bench_authority(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-01-authority");
    let authority = Authority::generate();
    let digest = sha256(b"benchmark header digest");
    let signature = authority.sign(&digest).expect("sign");

    group.bench_function("sign", |b| b.iter(|| authority.sign(black_box(&digest))));
    group.bench_function("verify", |b| {
        b.iter(|| authority.verify(black_box(&digest), black_box(&signature)))
    });
    group.finish();
}

fn bench_transaction_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-02-block");
    for size in [16usize, 256, 1024] {
        let txs: Vec<_> = (0..size)
            .map(|i| transaction((i % 251) as u8, i as u64, 10, 21_000))
            .collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("transaction_root", size), &txs, |b, txs| {
            b.iter(|| compute_transaction_root(black_box(txs)))
        });
    }
    group.finish();
}

fn bench_ledger(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-04-ledger");
    group.measurement_time(Duration::from_secs(5));

    let v1 = Arc::new(Authority::generate());
    group.bench_function("append_block", |b| {
        let (ledger, clock) = create_ledger(&v1);
        b.iter(|| {
            let now = clock.advance(BLOCK_INTERVAL_MS);
            ledger
                .append_block(next_block(&ledger, &v1, now))
                .expect("append")
        })
    });

    for length in [100usize, 1_000] {
        let (ledger, clock) = create_ledger(&v1);
        extend_chain(&ledger, &clock, &[Arc::clone(&v1)], length);
        group.bench_with_input(BenchmarkId::new("audit", length), &ledger, |b, ledger| {
            b.iter(|| ledger.is_valid())
        });
    }
    group.finish();
}

fn bench_mempool(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-05-mempool");
    let mut rng = rand::thread_rng();

    for size in [1_000usize, 10_000] {
        let mempool = Mempool::new(MempoolConfig::default());
        for i in 0..size {
            let price = rng.gen_range(1..1_000u64);
            mempool
                .add(transaction((i % 256) as u8, (i / 256) as u64, price, 21_000))
                .expect("add");
        }
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("select_for_block", size), &mempool, |b, pool| {
            b.iter(|| pool.select_for_block(black_box(8_000_000)))
        });
    }

    group.bench_function("add_remove", |b| {
        let mempool = Mempool::new(MempoolConfig::default());
        let tx = transaction(1, 0, 10, 21_000);
        b.iter(|| {
            mempool.add(tx.clone()).expect("add");
            mempool.remove(&tx.hash)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_authority,
    bench_transaction_root,
    bench_ledger,
    bench_mempool
);
criterion_main!(benches);
