use criterion::{criterion_group, criterion_main, Criterion};
use twobit_seq::prelude::*;
use twobit_seq::test_utilities::{random_sequence, TwoBitBuilder};
use twobit_seq::twobit::decode::unpack_dna;

const CHROM_LENGTH: usize = 1_000_000;

fn bench_decode(c: &mut Criterion) {
    // create the benchmark group
    let mut group = c.benchmark_group("decode");

    // create the test data
    let seq = random_sequence(CHROM_LENGTH);
    let builder = TwoBitBuilder::new().sequence("chr1", seq);
    let bytes = builder.build();
    let packed: Vec<u8> = bytes[bytes.len() - CHROM_LENGTH / 4..].to_vec();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let twobit = runtime
        .block_on(TwoBit::open(
            MemorySource::new(bytes),
            TwoBitOptions::default(),
        ))
        .unwrap();

    // configure the sample size for the group
    group.sample_size(10);

    group.bench_function("unpack_dna", |b| {
        b.iter(|| unpack_dna(&packed, 0, CHROM_LENGTH).len());
    });

    group.bench_function("fetch_10kb_windows", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let mut total = 0;
                for start in (0..CHROM_LENGTH as u32).step_by(100_000) {
                    let range = ContigInterval::new("chr1", start, start + 9_999);
                    total += twobit.fetch(&range).await.unwrap().len();
                }
                total
            })
        });
    });

    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
