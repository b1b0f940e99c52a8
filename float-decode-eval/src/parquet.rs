//! Columnar file strategy using the synchronous arrow reader. The fixture is a
//! single-column Float32 file; reading drains the record batch reader and sums
//! the primitive values of each batch in order, so the checksum fold matches
//! every other strategy.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, AsArray, Float32Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Float32Type, Schema};
use float_decode_core::checksum;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;

use crate::codec::ensure_len;
use crate::Strategy;

const BATCH_SIZE: usize = 1 << 13;

/// The batch reader is consumed by a full scan, so the strategy holds the path
/// and rebuilds the reader every iteration; rewinding is a no-op.
#[derive(Default)]
pub struct Parquet {
  path: Option<PathBuf>,
}

impl Strategy for Parquet {
  fn generate(&mut self, path: &Path, values: &[f32]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![Field::new(
      "value",
      DataType::Float32,
      false,
    )]));
    let column: ArrayRef = Arc::new(Float32Array::from(values.to_vec()));
    let batch = RecordBatch::try_new(schema.clone(), vec![column])?;

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
  }

  fn open(&mut self, path: &Path) -> Result<()> {
    self.path = Some(path.to_path_buf());
    Ok(())
  }

  fn rewind(&mut self) -> Result<()> {
    Ok(())
  }

  fn read_and_sum(&mut self, len: usize) -> Result<f32> {
    let path = self.path.as_ref().context("strategy not opened")?;
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
      .with_batch_size(BATCH_SIZE)
      .build()?;

    let mut sum = 0f32;
    let mut decoded = 0;
    for batch in reader {
      let batch = batch?;
      let values = batch.column(0).as_primitive::<Float32Type>().values();
      decoded += values.len();
      sum += checksum(values);
    }
    ensure_len(decoded, len)?;
    Ok(sum)
  }
}
