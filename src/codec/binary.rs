//! Compact binary encoding.
//!
//! Layout:
//!
//! ```text
//! "RQB" version:u8 | node | crc32(node bytes):u32 LE
//!
//! node := 0x00                         null
//!       | 0x01 | 0x02                  false | true
//!       | 0x03 zigzag-varint           integer
//!       | 0x04 f64 LE                  float
//!       | 0x05 varint-len utf8         string
//!       | 0x06 varint-count node*      array
//!       | 0x07 varint-count (key node)* object, key is a string body
//! ```

use std::io::{self, Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::codec::content::Content;
use crate::error::{RankEvalError, Result};
use crate::util::varint;

const MAGIC: &[u8; 3] = b"RQB";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 4;
const TRAILER_LEN: usize = 4;

/// Deeper documents are rejected rather than recursed into.
pub const MAX_DEPTH: usize = 256;

const TAG_NULL: u8 = 0x00;
const TAG_FALSE: u8 = 0x01;
const TAG_TRUE: u8 = 0x02;
const TAG_INT: u8 = 0x03;
const TAG_FLOAT: u8 = 0x04;
const TAG_STRING: u8 = 0x05;
const TAG_ARRAY: u8 = 0x06;
const TAG_OBJECT: u8 = 0x07;

/// Encode `content` into the binary format.
pub fn encode(content: &Content) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    write_node(&mut body, content, 0)?;

    let mut out = Vec::with_capacity(HEADER_LEN + body.len() + TRAILER_LEN);
    out.write_all(MAGIC)?;
    out.write_u8(VERSION)?;
    out.write_all(&body)?;
    out.write_u32::<LittleEndian>(crc32fast::hash(&body))?;
    Ok(out)
}

/// Decode a binary document, verifying header and checksum.
pub fn decode(bytes: &[u8]) -> Result<Content> {
    if bytes.len() < HEADER_LEN + 1 + TRAILER_LEN {
        return Err(RankEvalError::malformed("binary document is truncated"));
    }
    if &bytes[..3] != MAGIC {
        return Err(RankEvalError::malformed("binary document has a bad magic"));
    }
    if bytes[3] != VERSION {
        return Err(RankEvalError::malformed(format!(
            "unsupported binary document version {}",
            bytes[3]
        )));
    }

    let body = &bytes[HEADER_LEN..bytes.len() - TRAILER_LEN];
    let mut trailer = &bytes[bytes.len() - TRAILER_LEN..];
    let expected = trailer.read_u32::<LittleEndian>()?;
    let actual = crc32fast::hash(body);
    if expected != actual {
        return Err(RankEvalError::malformed(format!(
            "binary document checksum mismatch: expected {expected:#010x}, found {actual:#010x}"
        )));
    }

    let mut cursor = Cursor::new(body);
    let content = read_node(&mut cursor, 0)?;
    if cursor.position() != body.len() as u64 {
        return Err(RankEvalError::malformed(
            "binary document has trailing bytes after the root value",
        ));
    }
    Ok(content)
}

fn write_node<W: Write>(writer: &mut W, content: &Content, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(RankEvalError::malformed(format!(
            "document nesting exceeds {MAX_DEPTH} levels"
        )));
    }

    match content {
        Content::Null => writer.write_u8(TAG_NULL)?,
        Content::Bool(false) => writer.write_u8(TAG_FALSE)?,
        Content::Bool(true) => writer.write_u8(TAG_TRUE)?,
        Content::Int(i) => {
            writer.write_u8(TAG_INT)?;
            varint::write_i64(writer, *i)?;
        }
        Content::Float(f) => {
            writer.write_u8(TAG_FLOAT)?;
            writer.write_f64::<LittleEndian>(*f)?;
        }
        Content::String(s) => {
            writer.write_u8(TAG_STRING)?;
            write_str(writer, s)?;
        }
        Content::Array(items) => {
            writer.write_u8(TAG_ARRAY)?;
            varint::write_u64(writer, items.len() as u64)?;
            for item in items {
                write_node(writer, item, depth + 1)?;
            }
        }
        Content::Object(members) => {
            writer.write_u8(TAG_OBJECT)?;
            varint::write_u64(writer, members.len() as u64)?;
            for (key, value) in members {
                write_str(writer, key)?;
                write_node(writer, value, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn write_str<W: Write>(writer: &mut W, value: &str) -> Result<()> {
    varint::write_u64(writer, value.len() as u64)?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

fn read_node(cursor: &mut Cursor<&[u8]>, depth: usize) -> Result<Content> {
    if depth > MAX_DEPTH {
        return Err(RankEvalError::malformed(format!(
            "document nesting exceeds {MAX_DEPTH} levels"
        )));
    }

    let tag = cursor.read_u8().map_err(truncated)?;
    let content = match tag {
        TAG_NULL => Content::Null,
        TAG_FALSE => Content::Bool(false),
        TAG_TRUE => Content::Bool(true),
        TAG_INT => Content::Int(varint::read_i64(cursor).map_err(truncated_err)?),
        TAG_FLOAT => Content::Float(cursor.read_f64::<LittleEndian>().map_err(truncated)?),
        TAG_STRING => Content::String(read_str(cursor)?),
        TAG_ARRAY => {
            let count = read_len(cursor)?;
            let mut items = Vec::with_capacity(count.min(remaining(cursor)));
            for _ in 0..count {
                items.push(read_node(cursor, depth + 1)?);
            }
            Content::Array(items)
        }
        TAG_OBJECT => {
            let count = read_len(cursor)?;
            let mut members = Vec::with_capacity(count.min(remaining(cursor)));
            for _ in 0..count {
                let key = read_str(cursor)?;
                let value = read_node(cursor, depth + 1)?;
                members.push((key, value));
            }
            Content::Object(members)
        }
        other => {
            return Err(RankEvalError::malformed(format!(
                "unknown binary tag {other:#04x} at offset {}",
                cursor.position() - 1
            )));
        }
    };
    Ok(content)
}

fn read_len(cursor: &mut Cursor<&[u8]>) -> Result<usize> {
    let len = varint::read_u64(cursor).map_err(truncated_err)?;
    usize::try_from(len)
        .ok()
        .filter(|&len| len <= remaining(cursor))
        .ok_or_else(|| RankEvalError::malformed("binary document is truncated"))
}

fn read_str(cursor: &mut Cursor<&[u8]>) -> Result<String> {
    let len = read_len(cursor)?;
    let mut buf = vec![0u8; len];
    cursor.read_exact(&mut buf).map_err(truncated)?;
    String::from_utf8(buf)
        .map_err(|e| RankEvalError::malformed(format!("invalid UTF-8 in binary document: {e}")))
}

fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    cursor.get_ref().len().saturating_sub(cursor.position() as usize)
}

fn truncated(_: io::Error) -> RankEvalError {
    RankEvalError::malformed("binary document is truncated")
}

fn truncated_err(err: RankEvalError) -> RankEvalError {
    match err {
        RankEvalError::Io(_) => RankEvalError::malformed("binary document is truncated"),
        other => other,
    }
}
