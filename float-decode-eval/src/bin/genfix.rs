use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use float_decode_eval::fixture::{self, Dist};
use float_decode_eval::registry;

/// Materializes every fixture encoding into a directory and reports the
/// encoded size per strategy.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
  /// Directory to write fixtures into
  dir: PathBuf,
  #[clap(long, default_value_t = fixture::DEFAULT_LEN, help = "Number of f32 values")]
  len: usize,
  #[clap(long, default_value_t = fixture::DEFAULT_SEED, help = "Dataset RNG seed")]
  seed: u64,
  #[clap(long, value_enum, default_value_t = Dist::Uniform, help = "Dataset distribution")]
  distribution: Dist,
}

fn main() -> Result<()> {
  let args = Args::parse();

  let mut entries = registry();
  let (manifest, _values) = fixture::prepare(
    &args.dir,
    args.len,
    args.seed,
    args.distribution,
    &mut entries,
  )?;

  println!(
    "{} values, seed {}, {} distribution, checksum {}",
    manifest.len, manifest.seed, manifest.distribution, manifest.checksum
  );
  println!("logical payload: {} bytes", manifest.len * 4);
  println!();

  for entry in &entries {
    if entry.file.is_empty() {
      continue;
    }
    let size = fs::metadata(args.dir.join(entry.file))?.len();
    println!("{:<14} {:>12} bytes  {}", entry.name, size, entry.file);
  }

  Ok(())
}
