//! Shared test data for the harness: one seeded pseudo-random float array,
//! written out once per strategy through the strategies' own write paths. A
//! manifest beside the fixtures records the generation parameters and the
//! expected checksum so repeated runs can reuse the files.

use std::env;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use float_decode_core::checksum;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rand_distr::{Distribution as _, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::Entry;

pub const DEFAULT_LEN: usize = 1 << 20;
pub const DEFAULT_SEED: u64 = 4711;

/// Absolute tolerance when comparing a strategy's checksum against the
/// manifest. Every decode path here is value-exact; this only guards the
/// comparison itself.
pub const CHECKSUM_TOLERANCE: f32 = 0.005;

const MANIFEST_FILE: &str = "manifest.json";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dist {
  /// Uniform in [0, 1).
  Uniform,
  /// Standard normal.
  Normal,
}

impl std::fmt::Display for Dist {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Dist::Uniform => write!(f, "uniform"),
      Dist::Normal => write!(f, "normal"),
    }
  }
}

/// Generation parameters plus the expected checksum of the dataset they
/// produce. Persisted as `manifest.json` beside the fixture files.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
  pub len: usize,
  pub seed: u64,
  pub distribution: Dist,
  pub checksum: f32,
}

pub fn gen_dataset(len: usize, seed: u64, distribution: Dist) -> Vec<f32> {
  let mut rng = SmallRng::seed_from_u64(seed);
  match distribution {
    Dist::Uniform => (0..len).map(|_| rng.gen::<f32>()).collect(),
    Dist::Normal => StandardNormal.sample_iter(&mut rng).take(len).collect(),
  }
}

/// Fixture directory: `FLOAT_DECODE_FIXTURE_DIR` if set, else a fixed spot
/// under the system temp directory.
pub fn default_dir() -> PathBuf {
  match env::var_os("FLOAT_DECODE_FIXTURE_DIR") {
    Some(dir) => PathBuf::from(dir),
    None => env::temp_dir().join("float-decode-fixtures"),
  }
}

/// Regenerate the dataset, make sure every registry fixture exists in `dir`
/// (reusing files when the on-disk manifest matches the requested parameters),
/// and feed the resident baseline. Returns the manifest and the dataset.
pub fn prepare(
  dir: &Path,
  len: usize,
  seed: u64,
  distribution: Dist,
  entries: &mut [Entry],
) -> Result<(Manifest, Vec<f32>)> {
  fs::create_dir_all(dir)?;

  let values = gen_dataset(len, seed, distribution);
  let manifest = Manifest {
    len,
    seed,
    distribution,
    checksum: checksum(&values),
  };
  let reuse = read_manifest(dir).map_or(false, |on_disk| on_disk == manifest);

  for entry in entries.iter_mut() {
    if entry.file.is_empty() {
      // Fixtures that live in memory are rebuilt every run.
      entry.strategy.generate(Path::new(""), &values)?;
      continue;
    }
    let path = dir.join(entry.file);
    if !reuse || !path.exists() {
      entry
        .strategy
        .generate(&path, &values)
        .with_context(|| format!("generate fixture for {}", entry.name))?;
    }
  }

  if !reuse {
    let mut writer = BufWriter::new(File::create(dir.join(MANIFEST_FILE))?);
    serde_json::to_writer_pretty(&mut writer, &manifest)?;
    writer.flush()?;
  }

  Ok((manifest, values))
}

fn read_manifest(dir: &Path) -> Option<Manifest> {
  let file = File::open(dir.join(MANIFEST_FILE)).ok()?;
  serde_json::from_reader(file).ok()
}
