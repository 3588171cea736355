//! Document codec.
//!
//! Entities serialize into a [`Content`] tree through [`ToContent`]; the tree is
//! then written in one of the supported [`Encoding`]s. Reading goes the other
//! way: bytes decode into a tree which the entity parsers walk.
//!
//! The encoding is always chosen by the caller. Nothing here inspects the
//! bytes to guess a format.
//!
//! # Example
//!
//! ```
//! use rankeval::codec::{self, Content, Encoding, WriteOptions};
//!
//! let doc = Content::object().field("id", "q1").build();
//! let options = WriteOptions::new(Encoding::Json).with_pretty(true);
//! let bytes = codec::encode(&doc, &options).unwrap();
//! assert_eq!(codec::decode(&bytes, Encoding::Json).unwrap(), doc);
//! ```

pub mod binary;
pub mod content;
pub mod json;

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{RankEvalError, Result};

pub use self::content::{Content, ObjectBuilder};

/// Supported wire encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// JSON text.
    #[default]
    Json,
    /// Tagged binary format, see [`binary`].
    Binary,
}

impl Encoding {
    /// Every supported encoding.
    pub const ALL: [Encoding; 2] = [Encoding::Json, Encoding::Binary];

    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::Binary => "binary",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = RankEvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "binary" | "bin" => Ok(Encoding::Binary),
            other => Err(RankEvalError::invalid_argument(format!(
                "unknown encoding '{other}'"
            ))),
        }
    }
}

/// Options controlling how a document is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Target encoding.
    pub encoding: Encoding,
    /// Pretty-print. Only JSON honours this.
    #[serde(default)]
    pub pretty: bool,
}

impl WriteOptions {
    pub fn new(encoding: Encoding) -> Self {
        WriteOptions {
            encoding,
            pretty: false,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Types that can write themselves as a document tree.
pub trait ToContent {
    fn to_content(&self) -> Content;

    /// Serialize straight to bytes.
    fn to_bytes(&self, options: &WriteOptions) -> Result<Vec<u8>> {
        encode(&self.to_content(), options)
    }
}

impl ToContent for Content {
    fn to_content(&self) -> Content {
        self.clone()
    }
}

/// Write a document tree.
pub fn encode(content: &Content, options: &WriteOptions) -> Result<Vec<u8>> {
    let bytes = match options.encoding {
        Encoding::Json => json::encode(content, options.pretty)?,
        Encoding::Binary => binary::encode(content)?,
    };
    tracing::debug!(
        encoding = %options.encoding,
        pretty = options.pretty,
        bytes = bytes.len(),
        "encoded document"
    );
    Ok(bytes)
}

/// Read a document tree.
pub fn decode(bytes: &[u8], encoding: Encoding) -> Result<Content> {
    tracing::debug!(%encoding, bytes = bytes.len(), "decoding document");
    match encoding {
        Encoding::Json => json::decode(bytes),
        Encoding::Binary => binary::decode(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("json".parse::<Encoding>().unwrap(), Encoding::Json);
        assert_eq!("BINARY".parse::<Encoding>().unwrap(), Encoding::Binary);
        assert!("yaml".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_every_encoding_decodes_what_it_encodes() {
        let doc = Content::object()
            .field("id", "q1")
            .field("ratings", vec![Content::Int(1), Content::Int(0)])
            .build();

        for encoding in Encoding::ALL {
            for pretty in [false, true] {
                let options = WriteOptions::new(encoding).with_pretty(pretty);
                let bytes = encode(&doc, &options).unwrap();
                assert_eq!(decode(&bytes, encoding).unwrap(), doc);
            }
        }
    }

    #[test]
    fn test_encoding_is_not_sniffed() {
        let bytes = encode(&Content::Null, &WriteOptions::new(Encoding::Json)).unwrap();
        assert!(decode(&bytes, Encoding::Binary).is_err());
    }

    #[test]
    fn test_write_options_config() {
        let options: WriteOptions = serde_json::from_str(r#"{"encoding": "binary"}"#).unwrap();
        assert_eq!(options, WriteOptions::new(Encoding::Binary));
        assert_eq!(WriteOptions::default().encoding, Encoding::Json);
    }
}
