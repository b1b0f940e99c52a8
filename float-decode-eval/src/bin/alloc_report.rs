use std::hint::black_box;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{ensure, Result};
use clap::Parser;
use float_decode_eval::alloc::{self, CountingAlloc};
use float_decode_eval::fixture::{self, Dist, CHECKSUM_TOLERANCE};
use float_decode_eval::registry;

#[global_allocator]
static ALLOC: CountingAlloc = CountingAlloc;

/// Runs every decoding strategy once and reports heap allocations, wall time
/// and throughput per decode.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
  /// Fixture directory (defaults to the shared bench fixture dir)
  #[clap(long)]
  dir: Option<PathBuf>,
  #[clap(long, default_value_t = fixture::DEFAULT_LEN, help = "Number of f32 values")]
  len: usize,
  #[clap(long, default_value_t = fixture::DEFAULT_SEED, help = "Dataset RNG seed")]
  seed: u64,
  #[clap(long, value_enum, default_value_t = Dist::Uniform, help = "Dataset distribution")]
  distribution: Dist,
}

fn main() -> Result<()> {
  let args = Args::parse();
  let dir = args.dir.unwrap_or_else(fixture::default_dir);

  let mut entries = registry();
  let (manifest, _values) =
    fixture::prepare(&dir, args.len, args.seed, args.distribution, &mut entries)?;
  let len = manifest.len;
  let payload_mb = (len * 4) as f64 / 1e6;

  println!(
    "{:<14} {:>12} {:>16} {:>12} {:>10}",
    "strategy", "allocs", "alloc bytes", "time", "MB/s"
  );

  for entry in &mut entries {
    let path = dir.join(entry.file);
    entry.strategy.open(&path)?;

    // Untimed warm-up: page cache, lazy driver setup, and the checksum gate.
    entry.strategy.rewind()?;
    let warm = entry.strategy.read_and_sum(len)?;
    ensure!(
      (warm - manifest.checksum).abs() < CHECKSUM_TOLERANCE,
      "{} decoded checksum {} != {}",
      entry.name,
      warm,
      manifest.checksum
    );

    entry.strategy.rewind()?;
    alloc::reset();
    let start = Instant::now();
    let sum = entry.strategy.read_and_sum(len)?;
    let elapsed = start.elapsed();
    let stats = alloc::snapshot();
    black_box(sum);

    println!(
      "{:<14} {:>12} {:>16} {:>10.1?} {:>10.1}",
      entry.name,
      stats.allocations,
      stats.bytes,
      elapsed,
      payload_mb / elapsed.as_secs_f64()
    );
  }

  Ok(())
}
