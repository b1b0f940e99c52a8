//! This crate provides the hand-rolled fixed-width decoders measured by the benchmark
//! harness: a per-element word assembler, a chunked specialization, and the in-place
//! byte-buffer reinterpretation. Everything here assumes a little-endian host, as do
//! the fixture writers in the eval crate.

pub mod traits;

use traits::FixedWidth;

/// Decode a little-endian byte buffer one element at a time, assembling each
/// 32-bit word from four bytes with shifts.
///
/// This duplicates what the standard byte-order readers already do; it exists to
/// measure what the manual version costs.
///
/// Panics if `bytes` is not exactly `out.len() * T::WIDTH` bytes long.
pub fn decode_scalar<T: FixedWidth>(bytes: &[u8], out: &mut [T]) {
  assert_eq!(
    bytes.len(),
    out.len() * T::WIDTH,
    "buffer length {} does not hold exactly {} elements",
    bytes.len(),
    out.len()
  );

  let mut cursor = bytes;
  for slot in out.iter_mut() {
    let word = u32::from(cursor[0])
      | u32::from(cursor[1]) << 8
      | u32::from(cursor[2]) << 16
      | u32::from(cursor[3]) << 24;
    *slot = T::from_le_word(word);
    cursor = &cursor[T::WIDTH..];
  }
}

/// Decode a little-endian byte buffer in 4-byte chunks using the primitive
/// from-little-endian conversion. The smarter sibling of [`decode_scalar`].
///
/// Panics if `bytes` is not exactly `out.len() * 4` bytes long.
pub fn decode_chunked(bytes: &[u8], out: &mut [f32]) {
  assert_eq!(
    bytes.len(),
    out.len() * 4,
    "buffer length {} does not hold exactly {} f32 values",
    bytes.len(),
    out.len()
  );

  for (slot, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
    *slot = f32::from_le_bytes(chunk.try_into().unwrap());
  }
}

/// Reinterpret a byte buffer in place as a float array.
///
/// The buffer must start on a 4-byte boundary and hold a whole number of f32
/// values, otherwise this panics. Heap buffers from the global allocator and
/// memory-mapped pages satisfy the alignment requirement on the machines this
/// harness targets; nothing here is meant for production use.
pub fn cast_f32(bytes: &[u8]) -> &[f32] {
  let (head, floats, tail) = unsafe { bytes.align_to::<f32>() };
  assert!(
    head.is_empty() && tail.is_empty(),
    "buffer is not aligned and sized for f32 ({} head bytes, {} tail bytes)",
    head.len(),
    tail.len()
  );
  floats
}

/// Naive in-order f32 sum. Every strategy folds its decoded array through this
/// so results are comparable across strategies.
pub fn checksum(values: &[f32]) -> f32 {
  values.iter().sum()
}

#[cfg(test)]
mod tests {
  use rand::{rngs::SmallRng, Rng, SeedableRng};
  use rstest::rstest;

  use crate::{cast_f32, checksum, decode_chunked, decode_scalar, traits::FixedWidth};

  fn encode_le<T: FixedWidth>(values: &[T]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * T::WIDTH);
    for value in values {
      bytes.extend_from_slice(&value.to_le_word().to_le_bytes());
    }
    bytes
  }

  #[test]
  fn test_scalar_known_bytes() {
    // 1.0f32 is 0x3f800000, little-endian on the wire
    let bytes = [0x00, 0x00, 0x80, 0x3f, 0x00, 0x00, 0x00, 0x40];
    let mut out = [0f32; 2];
    decode_scalar(&bytes, &mut out);
    assert_eq!([1.0, 2.0], out);
  }

  #[test]
  fn test_scalar_u32_identity() {
    let values = [0u32, 1, 0xdead_beef, u32::MAX];
    let bytes = encode_le(&values);
    let mut out = [0u32; 4];
    decode_scalar(&bytes, &mut out);
    assert_eq!(values, out);
  }

  #[rstest]
  #[case(1)]
  #[case(64)]
  #[case(1000)]
  #[case(4096)]
  fn test_decoders_agree(#[case] len: usize) {
    let mut rng = SmallRng::seed_from_u64(64);
    let values: Vec<f32> = (0..len).map(|_| rng.gen::<f32>()).collect();
    let bytes = encode_le(&values);

    let mut scalar = vec![0f32; len];
    decode_scalar(&bytes, &mut scalar);
    assert_eq!(values, scalar);

    let mut chunked = vec![0f32; len];
    decode_chunked(&bytes, &mut chunked);
    assert_eq!(values, chunked);
  }

  #[test]
  fn test_cast_roundtrip() {
    let values: Vec<f32> = (0..256).map(|i| i as f32 * 0.5).collect();
    // View the f32 storage as bytes; the source pointer keeps f32 alignment so
    // the cast back cannot hit the misalignment assert.
    let bytes =
      unsafe { std::slice::from_raw_parts(values.as_ptr().cast::<u8>(), values.len() * 4) };
    assert_eq!(&values[..], cast_f32(bytes));
  }

  #[test]
  #[should_panic(expected = "does not hold exactly")]
  fn test_scalar_length_mismatch_panics() {
    let bytes = [0u8; 6];
    let mut out = [0f32; 2];
    decode_scalar(&bytes, &mut out);
  }

  #[test]
  fn test_checksum_order() {
    assert_eq!(0.0, checksum(&[]));
    assert_eq!(6.0, checksum(&[1.0, 2.0, 3.0]));
  }
}
