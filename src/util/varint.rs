//! Variable-length integer encoding utilities.
//!
//! Seven payload bits per byte with a continuation bit, so small deltas
//! between consecutive row IDs take a single byte.

use crate::error::{InfoBaseError, Result};

/// Encode a u64 value using variable-length encoding.
pub fn encode_u64(value: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(10);
    let mut val = value;

    loop {
        let mut byte = (val & 0x7F) as u8;
        val >>= 7;

        if val != 0 {
            byte |= 0x80; // Set continuation bit
        }

        bytes.push(byte);

        if val == 0 {
            break;
        }
    }

    bytes
}

/// Decode a u64 value from variable-length encoding.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_u64(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0;
    let mut bytes_read = 0;

    for &byte in bytes {
        bytes_read += 1;

        if shift >= 64 {
            return Err(InfoBaseError::storage("VarInt overflow"));
        }

        result |= ((byte & 0x7F) as u64) << shift;

        if (byte & 0x80) == 0 {
            return Ok((result, bytes_read));
        }

        shift += 7;
    }

    Err(InfoBaseError::storage("Incomplete VarInt"))
}

/// Number of bytes `value` occupies once encoded.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_small_values() {
        assert_eq!(encode_u64(0), vec![0]);
        assert_eq!(encode_u64(1), vec![1]);
        assert_eq!(encode_u64(127), vec![127]);
        assert_eq!(encode_u64(128), vec![0x80, 0x01]);
        assert_eq!(encode_u64(300), vec![0xAC, 0x02]);
    }

    #[test]
    fn test_decode_consumes_one_value() {
        let mut bytes = encode_u64(16_384);
        bytes.extend(encode_u64(5));

        let (value, read) = decode_u64(&bytes).unwrap();
        assert_eq!(value, 16_384);
        assert_eq!(read, 3);

        let (value, read) = decode_u64(&bytes[read..]).unwrap();
        assert_eq!(value, 5);
        assert_eq!(read, 1);
    }

    #[test]
    fn test_encoded_len() {
        for value in [0u64, 1, 127, 128, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
            assert_eq!(encoded_len(value), encode_u64(value).len(), "value {value}");
        }
    }

    #[test]
    fn test_incomplete_varint() {
        assert!(decode_u64(&[0x80, 0x80]).is_err());
        assert!(decode_u64(&[]).is_err());
    }
}
