//! Embedding blob codec.
//!
//! A vector is stored as `D` consecutive little-endian IEEE-754 `f32`
//! values with no header. The length is implied by `bytes.len() / 4`.

use crate::error::{DsError, Result};

const F32_BYTES: usize = std::mem::size_of::<f32>();

/// Encode a vector into its blob representation.
pub fn encode_vector(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * F32_BYTES);
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

/// Decode a blob produced by [`encode_vector`].
///
/// Bit patterns are preserved exactly, including NaN payloads.
pub fn decode_vector(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % F32_BYTES != 0 {
        return Err(DsError::StoreUnavailable(format!(
            "embedding blob length {} is not a multiple of {F32_BYTES}",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(F32_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Number of floats a blob of `byte_len` bytes holds, if well-formed.
pub const fn dims_of(byte_len: usize) -> Option<usize> {
    if byte_len % F32_BYTES == 0 {
        Some(byte_len / F32_BYTES)
    } else {
        None
    }
}
