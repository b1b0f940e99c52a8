use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use float_decode_eval::fixture::{self, Dist, CHECKSUM_TOLERANCE};
use float_decode_eval::registry;
use std::hint::black_box;

/// Benchmark group for decoding the shared fixture array with every strategy.
fn bench_decode(criterion: &mut Criterion) {
  let dir = fixture::default_dir();
  let mut entries = registry();
  let (manifest, _values) = fixture::prepare(
    &dir,
    fixture::DEFAULT_LEN,
    fixture::DEFAULT_SEED,
    Dist::Uniform,
    &mut entries,
  )
  .unwrap();
  let len = manifest.len;

  let mut group = criterion.benchmark_group("decode f32 array");
  group.throughput(Throughput::Bytes((len * 4) as u64));
  // The slow strategies (json, sqlite) run for seconds per iteration.
  group.sample_size(10);

  for entry in &mut entries {
    let path = dir.join(entry.file);
    entry.strategy.open(&path).unwrap();

    // A wrong decoder must fail loudly before it gets a timing.
    entry.strategy.rewind().unwrap();
    let sum = entry.strategy.read_and_sum(len).unwrap();
    assert!(
      (sum - manifest.checksum).abs() < CHECKSUM_TOLERANCE,
      "{} decoded checksum {} != {}",
      entry.name,
      sum,
      manifest.checksum
    );

    group.bench_function(BenchmarkId::new(entry.name, len), |b| {
      b.iter(|| {
        entry.strategy.rewind().unwrap();
        black_box(entry.strategy.read_and_sum(len).unwrap())
      })
    });
  }

  group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
