//! Variable-length integer encoding utilities.
//!
//! Unsigned values use 7 bits per byte with a continuation bit, the same layout
//! protocol buffers use. Signed values are zig-zag mapped first so that small
//! negative numbers stay short.

use std::io::{Read, Write};

use byteorder::ReadBytesExt;

use crate::error::{RankEvalError, Result};

/// Encode a u64 value using variable-length encoding.
pub fn encode_u64(value: u64) -> Vec<u8> {
    let mut bytes = Vec::new();
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

/// Write a variable-length encoded u64 to a writer.
pub fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<usize> {
    let bytes = encode_u64(value);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Read a variable-length encoded u64 from a reader.
pub fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut result = 0u64;
    let mut shift = 0;

    loop {
        let byte = reader.read_u8()?;

        if shift >= 64 || (shift == 63 && byte > 1) {
            return Err(RankEvalError::malformed("VarInt overflow"));
        }

        result |= ((byte & 0x7F) as u64) << shift;

        if (byte & 0x80) == 0 {
            return Ok(result);
        }

        shift += 7;
    }
}

/// Map a signed value onto an unsigned one so small magnitudes encode short.
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Write a zig-zag varint encoded i64 to a writer.
pub fn write_i64<W: Write>(writer: &mut W, value: i64) -> Result<usize> {
    write_u64(writer, zigzag_encode(value))
}

/// Read a zig-zag varint encoded i64 from a reader.
pub fn read_i64<R: Read>(reader: &mut R) -> Result<i64> {
    Ok(zigzag_decode(read_u64(reader)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_write_read_u64() {
        for value in [0, 1, 127, 128, 16384, 123456789012345u64, u64::MAX] {
            let mut buffer = Vec::new();
            let bytes_written = write_u64(&mut buffer, value).unwrap();
            assert_eq!(bytes_written, buffer.len());

            let mut cursor = Cursor::new(buffer);
            assert_eq!(read_u64(&mut cursor).unwrap(), value);
        }
    }

    #[test]
    fn test_zigzag_keeps_small_negatives_short() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(encode_u64(zigzag_encode(-64)).len(), 1);

        for value in [i64::MIN, -1, 0, 1, i64::MAX] {
            assert_eq!(zigzag_decode(zigzag_encode(value)), value);
        }
    }

    #[test]
    fn test_write_read_i64() {
        let mut buffer = Vec::new();
        write_i64(&mut buffer, -300).unwrap();

        let mut cursor = Cursor::new(buffer);
        assert_eq!(read_i64(&mut cursor).unwrap(), -300);
    }

    #[test]
    fn test_encoding_efficiency() {
        assert_eq!(encode_u64(0).len(), 1);
        assert_eq!(encode_u64(127).len(), 1);
        assert_eq!(encode_u64(128).len(), 2);
        assert_eq!(encode_u64(u64::MAX).len(), 10);
    }

    #[test]
    fn test_incomplete_varint() {
        let mut cursor = Cursor::new(vec![0x80]);
        assert!(read_u64(&mut cursor).is_err());
    }

    #[test]
    fn test_overflow() {
        let mut cursor = Cursor::new(vec![0xFF; 11]);
        assert!(matches!(
            read_u64(&mut cursor),
            Err(RankEvalError::Malformed(_))
        ));
    }
}
