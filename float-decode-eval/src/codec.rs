//! Strategies wrapping general-purpose encoders and decoders, plus the wrappers
//! around the hand-rolled decoders from `float-decode-core`. Each one is a few
//! lines around an existing codec; the point is what those few lines cost.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{ensure, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use float_decode_core::{checksum, decode_chunked, decode_scalar};

use crate::{FileSource, Strategy};

/// Write the shared raw little-endian payload. Several strategies read the same
/// byte layout from their own fixture files.
pub(crate) fn write_raw_le(path: &Path, values: &[f32]) -> Result<()> {
  let mut writer = BufWriter::new(File::create(path)?);
  for &value in values {
    writer.write_f32::<LittleEndian>(value)?;
  }
  writer.flush()?;
  Ok(())
}

/// Raw fixed-width little-endian binary through the standard byte-order reader.
#[derive(Default)]
pub struct Binary {
  src: FileSource,
}

impl Strategy for Binary {
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
    let mut out = vec![0f32; len];
    self.src.file_mut()?.read_f32_into::<LittleEndian>(&mut out)?;
    Ok(checksum(&out))
  }
}

/// JSON array of numbers.
#[derive(Default)]
pub struct Json {
  src: FileSource,
}

impl Strategy for Json {
  fn generate(&mut self, path: &Path, values: &[f32]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, values)?;
    writer.flush()?;
    Ok(())
  }

  fn open(&mut self, path: &Path) -> Result<()> {
    self.src.open(path)
  }

  fn rewind(&mut self) -> Result<()> {
    self.src.rewind()
  }

  fn read_and_sum(&mut self, len: usize) -> Result<f32> {
    let out: Vec<f32> = serde_json::from_reader(BufReader::new(self.src.file_mut()?))?;
    ensure_len(out.len(), len)?;
    Ok(checksum(&out))
  }
}

/// JSON array behind raw deflate.
#[derive(Default)]
pub struct JsonDeflate {
  src: FileSource,
}

impl Strategy for JsonDeflate {
  fn generate(&mut self, path: &Path, values: &[f32]) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = DeflateEncoder::new(file, Compression::default());
    serde_json::to_writer(&mut encoder, values)?;
    encoder.finish()?.flush()?;
    Ok(())
  }

  fn open(&mut self, path: &Path) -> Result<()> {
    self.src.open(path)
  }

  fn rewind(&mut self) -> Result<()> {
    self.src.rewind()
  }

  fn read_and_sum(&mut self, len: usize) -> Result<f32> {
    let decoder = DeflateDecoder::new(self.src.file_mut()?);
    let out: Vec<f32> = serde_json::from_reader(BufReader::new(decoder))?;
    ensure_len(out.len(), len)?;
    Ok(checksum(&out))
  }
}

/// Length-prefixed binary record codec.
#[derive(Default)]
pub struct Record {
  src: FileSource,
}

impl Strategy for Record {
  fn generate(&mut self, path: &Path, values: &[f32]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, values)?;
    writer.flush()?;
    Ok(())
  }

  fn open(&mut self, path: &Path) -> Result<()> {
    self.src.open(path)
  }

  fn rewind(&mut self) -> Result<()> {
    self.src.rewind()
  }

  fn read_and_sum(&mut self, len: usize) -> Result<f32> {
    let out: Vec<f32> = bincode::deserialize_from(BufReader::new(self.src.file_mut()?))?;
    ensure_len(out.len(), len)?;
    Ok(checksum(&out))
  }
}

/// Self-describing MessagePack stream.
#[derive(Default)]
pub struct MsgPack {
  src: FileSource,
}

impl Strategy for MsgPack {
  fn generate(&mut self, path: &Path, values: &[f32]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    rmp_serde::encode::write(&mut writer, values)?;
    writer.flush()?;
    Ok(())
  }

  fn open(&mut self, path: &Path) -> Result<()> {
    self.src.open(path)
  }

  fn rewind(&mut self) -> Result<()> {
    self.src.rewind()
  }

  fn read_and_sum(&mut self, len: usize) -> Result<f32> {
    let out: Vec<f32> = rmp_serde::decode::from_read(BufReader::new(self.src.file_mut()?))?;
    ensure_len(out.len(), len)?;
    Ok(checksum(&out))
  }
}

/// Hand-rolled decoder, element at a time.
#[derive(Default)]
pub struct Scalar {
  src: FileSource,
}

impl Strategy for Scalar {
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
    let mut bytes = vec![0u8; len * 4];
    self.src.file_mut()?.read_exact(&mut bytes)?;
    let mut out = vec![0f32; len];
    decode_scalar(&bytes, &mut out);
    Ok(checksum(&out))
  }
}

/// Hand-rolled decoder over 4-byte chunks.
#[derive(Default)]
pub struct Chunked {
  src: FileSource,
}

impl Strategy for Chunked {
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
    let mut bytes = vec![0u8; len * 4];
    self.src.file_mut()?.read_exact(&mut bytes)?;
    let mut out = vec![0f32; len];
    decode_chunked(&bytes, &mut out);
    Ok(checksum(&out))
  }
}

pub(crate) fn ensure_len(decoded: usize, expected: usize) -> Result<()> {
  ensure!(
    decoded == expected,
    "decoded {} values, expected {}",
    decoded,
    expected
  );
  Ok(())
}
