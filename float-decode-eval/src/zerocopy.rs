//! Strategies that reinterpret bytes in place instead of decoding element by
//! element: a memory map read directly as floats, and two variants that pull the
//! whole file into a heap buffer first. The reinterpretation itself lives in
//! `float-decode-core::cast_f32`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use float_decode_core::{cast_f32, checksum};
use memmap2::Mmap;

use crate::codec::write_raw_le;
use crate::{FileSource, Strategy};

/// Memory-mapped file summed in place. The only strategy that never copies the
/// payload into the heap.
#[derive(Default)]
pub struct MemoryMap {
  map: Option<Mmap>,
}

impl Strategy for MemoryMap {
  fn generate(&mut self, path: &Path, values: &[f32]) -> Result<()> {
    write_raw_le(path, values)
  }

  fn open(&mut self, path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    self.map = Some(unsafe { Mmap::map(&file)? });
    Ok(())
  }

  fn rewind(&mut self) -> Result<()> {
    Ok(())
  }

  fn read_and_sum(&mut self, len: usize) -> Result<f32> {
    let map = self.map.as_ref().context("strategy not opened")?;
    ensure!(
      map.len() == len * 4,
      "mapped {} bytes, expected {}",
      map.len(),
      len * 4
    );
    Ok(checksum(cast_f32(map)))
  }
}

/// Slurp the whole file, then reinterpret the buffer.
#[derive(Default)]
pub struct CastRead {
  src: FileSource,
}

impl Strategy for CastRead {
  fn generate(&mut self, path: &Path, values: &[f32]) -> Result<()> {
    write_raw_le(path, values)
  }

  fn open(&mut self, path: &Path) -> Result<()> {
    self.src.open(path)
  }

  fn rewind(&mut self) -> Result<()> {
    self.src.rewind()
  }

  fn read_and_sum(&mut self, len: usize) -> Result<f32> {
    let mut bytes = Vec::with_capacity(len * 4);
    self.src.file_mut()?.read_to_end(&mut bytes)?;
    ensure!(
      bytes.len() == len * 4,
      "read {} bytes, expected {}",
      bytes.len(),
      len * 4
    );
    Ok(checksum(cast_f32(&bytes)))
  }
}

/// Positioned read into a pre-sized buffer, then reinterpret. Positioned reads
/// never move a cursor, so rewinding is a no-op.
#[cfg(unix)]
#[derive(Default)]
pub struct CastReadAt {
  file: Option<File>,
}

#[cfg(unix)]
impl Strategy for CastReadAt {
  fn generate(&mut self, path: &Path, values: &[f32]) -> Result<()> {
    write_raw_le(path, values)
  }

  fn open(&mut self, path: &Path) -> Result<()> {
    self.file = Some(File::open(path).with_context(|| format!("open {}", path.display()))?);
    Ok(())
  }

  fn rewind(&mut self) -> Result<()> {
    Ok(())
  }

  fn read_and_sum(&mut self, len: usize) -> Result<f32> {
    use std::os::unix::fs::FileExt;

    let file = self.file.as_ref().context("strategy not opened")?;
    let mut bytes = vec![0u8; len * 4];
    file.read_exact_at(&mut bytes, 0)?;
    Ok(checksum(cast_f32(&bytes)))
  }
}
