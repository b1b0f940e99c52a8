//! This crate implements the decoding-strategy comparison harness, including:
//! - The [`Strategy`] trait every measured decoder implements
//! - One thin strategy per encoding (raw little-endian, JSON, deflated JSON,
//!   binary records, MessagePack, parquet, sqlite, memory map, brutal casts,
//!   and the hand-rolled decoders from `float-decode-core`)
//! - Fixture generation and the strategy registry shared by benches, bins and tests

pub mod alloc;
pub mod codec;
pub mod fixture;
pub mod parquet;
pub mod sqlite;
#[cfg(test)]
mod test;
pub mod zerocopy;

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use float_decode_core::checksum;

/// One decoding strategy under measurement.
///
/// The lifecycle mirrors a benchmark run: `generate` builds the fixture file
/// (the write path exists only for that), `open` acquires whatever handle the
/// strategy reads through, and each timed iteration is a `rewind` followed by
/// `read_and_sum`. Dropping the strategy releases the handle.
pub trait Strategy {
  /// Write the fixture encoding of `values` to `path`.
  fn generate(&mut self, path: &Path, values: &[f32]) -> Result<()>;

  /// Open the fixture for reading.
  fn open(&mut self, path: &Path) -> Result<()>;

  /// Return to the start of the fixture between iterations.
  fn rewind(&mut self) -> Result<()>;

  /// Decode `len` values and return their checksum. Any I/O or decode error
  /// fails the iteration; there is no recovery.
  fn read_and_sum(&mut self, len: usize) -> Result<f32>;
}

/// A registry row: strategy name, its fixture file name, and the strategy itself.
/// Strategies with identical payload bytes still get distinct files so no run
/// measures another strategy's page cache. The resident baseline has an empty
/// file name and never touches the filesystem.
pub struct Entry {
  pub name: &'static str,
  pub file: &'static str,
  pub strategy: Box<dyn Strategy>,
}

/// Every strategy the harness measures, in report order.
pub fn registry() -> Vec<Entry> {
  let mut entries = vec![
    entry("binary", "floats.bin", codec::Binary::default()),
    entry("json", "floats.json", codec::Json::default()),
    entry("json-deflate", "floats.json.z", codec::JsonDeflate::default()),
    entry("record", "floats.record", codec::Record::default()),
    entry("msgpack", "floats.msgpack", codec::MsgPack::default()),
    entry("parquet", "floats.parquet", parquet::Parquet::default()),
    entry("sqlite", "floats.sqlite", sqlite::Sqlite::default()),
    entry("mmap", "floats-mmap.bin", zerocopy::MemoryMap::default()),
    entry("cast-read", "floats-cast.bin", zerocopy::CastRead::default()),
  ];
  #[cfg(unix)]
  entries.push(entry(
    "cast-read-at",
    "floats-cast-at.bin",
    zerocopy::CastReadAt::default(),
  ));
  entries.push(entry("scalar", "floats-scalar.bin", codec::Scalar::default()));
  entries.push(entry("chunked", "floats-chunked.bin", codec::Chunked::default()));
  entries.push(entry("resident", "", Resident::default()));
  entries
}

fn entry<S: Strategy + 'static>(name: &'static str, file: &'static str, strategy: S) -> Entry {
  Entry {
    name,
    file,
    strategy: Box::new(strategy),
  }
}

/// Shared file handle plumbing for the strategies that read a plain file from
/// the front each iteration.
#[derive(Default)]
pub(crate) struct FileSource {
  file: Option<File>,
}

impl FileSource {
  pub fn open(&mut self, path: &Path) -> Result<()> {
    self.file = Some(File::open(path).with_context(|| format!("open {}", path.display()))?);
    Ok(())
  }

  pub fn rewind(&mut self) -> Result<()> {
    self.file_mut()?.seek(SeekFrom::Start(0))?;
    Ok(())
  }

  pub fn file_mut(&mut self) -> Result<&mut File> {
    self.file.as_mut().context("strategy not opened")
  }
}

/// Already-in-memory baseline: no I/O, no decode, just the checksum fold over
/// a resident array. Bounds every other strategy from above.
#[derive(Default)]
pub struct Resident {
  values: Vec<f32>,
}

impl Strategy for Resident {
  fn generate(&mut self, _path: &Path, values: &[f32]) -> Result<()> {
    self.values = values.to_vec();
    Ok(())
  }

  fn open(&mut self, _path: &Path) -> Result<()> {
    ensure!(!self.values.is_empty(), "resident baseline was never generated");
    Ok(())
  }

  fn rewind(&mut self) -> Result<()> {
    Ok(())
  }

  fn read_and_sum(&mut self, len: usize) -> Result<f32> {
    ensure!(
      self.values.len() == len,
      "resident array holds {} values, expected {}",
      self.values.len(),
      len
    );
    Ok(checksum(&self.values))
  }
}
