use std::path::Path;

use rstest::rstest;
use tempfile::tempdir;

use crate::codec::Binary;
use crate::fixture::{self, Dist, CHECKSUM_TOLERANCE};
use crate::sqlite::Sqlite;
use crate::{registry, Strategy};

/// Every registered strategy must decode the shared fixture back to the
/// dataset checksum, and do it again after a rewind.
#[rstest]
#[case(512, Dist::Uniform)]
#[case(4096, Dist::Uniform)]
#[case(4096, Dist::Normal)]
#[case(65536, Dist::Uniform)]
fn test_strategies_roundtrip(#[case] len: usize, #[case] distribution: Dist) {
  let dir = tempdir().unwrap();
  let mut entries = registry();
  let (manifest, values) = fixture::prepare(
    dir.path(),
    len,
    fixture::DEFAULT_SEED,
    distribution,
    &mut entries,
  )
  .unwrap();

  assert_eq!(manifest.checksum, float_decode_core::checksum(&values));

  for entry in &mut entries {
    let path = dir.path().join(entry.file);
    entry.strategy.open(&path).unwrap();

    for round in 0..2 {
      entry.strategy.rewind().unwrap();
      let sum = entry.strategy.read_and_sum(len).unwrap();
      assert!(
        (sum - manifest.checksum).abs() < CHECKSUM_TOLERANCE,
        "{} round {}: checksum {} != {}",
        entry.name,
        round,
        sum,
        manifest.checksum
      );
    }
  }
}

/// A second prepare with the same parameters must agree with the first and
/// reuse the manifest on disk.
#[test]
fn test_prepare_is_deterministic() {
  let dir = tempdir().unwrap();

  let mut first = registry();
  let (manifest_a, values_a) =
    fixture::prepare(dir.path(), 2048, 7, Dist::Uniform, &mut first).unwrap();

  let mut second = registry();
  let (manifest_b, values_b) =
    fixture::prepare(dir.path(), 2048, 7, Dist::Uniform, &mut second).unwrap();

  assert_eq!(manifest_a, manifest_b);
  assert_eq!(values_a, values_b);
}

/// The deflated fixture must actually be smaller than the plain JSON one.
#[test]
fn test_deflate_shrinks_json() {
  let dir = tempdir().unwrap();
  let mut entries = registry();
  fixture::prepare(dir.path(), 8192, fixture::DEFAULT_SEED, Dist::Uniform, &mut entries).unwrap();

  let json = std::fs::metadata(dir.path().join("floats.json")).unwrap().len();
  let deflated = std::fs::metadata(dir.path().join("floats.json.z")).unwrap().len();
  assert!(deflated < json, "{} >= {}", deflated, json);
}

#[test]
fn test_unopened_strategy_errors() {
  let mut strategy = Binary::default();
  assert!(strategy.read_and_sum(4).is_err());
  assert!(strategy.rewind().is_err());
}

#[test]
fn test_truncated_fixture_errors() {
  let dir = tempdir().unwrap();
  let path = dir.path().join("floats.bin");
  let values = fixture::gen_dataset(100, fixture::DEFAULT_SEED, Dist::Uniform);

  let mut strategy = Binary::default();
  strategy.generate(&path, &values).unwrap();
  strategy.open(&path).unwrap();

  // Asking for more values than the file holds must fail the iteration.
  assert!(strategy.read_and_sum(200).is_err());
}

#[test]
fn test_sqlite_row_count_mismatch_errors() {
  let dir = tempdir().unwrap();
  let path = dir.path().join("floats.sqlite");
  let values = fixture::gen_dataset(100, fixture::DEFAULT_SEED, Dist::Uniform);

  let mut strategy = Sqlite::default();
  strategy.generate(&path, &values).unwrap();
  strategy.open(&path).unwrap();

  assert!(strategy.read_and_sum(50).is_err());
  assert!(strategy.read_and_sum(100).is_ok());
}

/// The resident baseline never touches the filesystem.
#[test]
fn test_resident_ignores_paths() {
  let values = fixture::gen_dataset(256, fixture::DEFAULT_SEED, Dist::Uniform);

  let mut strategy = crate::Resident::default();
  strategy.generate(Path::new("/nonexistent/nowhere"), &values).unwrap();
  strategy.open(Path::new("/nonexistent/nowhere")).unwrap();
  strategy.rewind().unwrap();
  let sum = strategy.read_and_sum(256).unwrap();
  assert_eq!(sum, float_decode_core::checksum(&values));
}
