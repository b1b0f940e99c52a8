//! Relational row store strategy: one row per float, decoded back row at a time
//! through a prepared statement. Deliberately dumb storage; the interesting part
//! is how much the row-at-a-time round trip costs next to the bulk decoders.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use float_decode_core::checksum;
use rusqlite::Connection;

use crate::codec::ensure_len;
use crate::Strategy;

#[derive(Default)]
pub struct Sqlite {
  conn: Option<Connection>,
}

impl Strategy for Sqlite {
  fn generate(&mut self, path: &Path, values: &[f32]) -> Result<()> {
    if path.exists() {
      fs::remove_file(path)?;
    }
    let mut conn = Connection::open(path)?;
    conn.execute_batch("CREATE TABLE floats (id INTEGER NOT NULL PRIMARY KEY, value REAL)")?;

    let tx = conn.transaction()?;
    {
      let mut stmt = tx.prepare("INSERT INTO floats (value) VALUES (?1)")?;
      for &value in values {
        stmt.execute([f64::from(value)])?;
      }
    }
    tx.commit()?;
    Ok(())
  }

  fn open(&mut self, path: &Path) -> Result<()> {
    self.conn = Some(Connection::open(path)?);
    Ok(())
  }

  fn rewind(&mut self) -> Result<()> {
    Ok(())
  }

  fn read_and_sum(&mut self, len: usize) -> Result<f32> {
    let conn = self.conn.as_ref().context("strategy not opened")?;
    let mut stmt = conn.prepare_cached("SELECT value FROM floats ORDER BY id")?;
    let mut rows = stmt.query([])?;

    let mut out = Vec::with_capacity(len);
    while let Some(row) = rows.next()? {
      let value: f64 = row.get(0)?;
      out.push(value as f32);
    }
    ensure_len(out.len(), len)?;
    Ok(checksum(&out))
  }
}
