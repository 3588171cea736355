//! Relevance judgments.
//!
//! A [`RatedDocument`] grades one document, identified by index, type and id,
//! for one rated request. Written as
//! `{"key": {"index": "test", "type": "testtype", "doc_id": "1"}, "rating": 1}`.

use std::fmt;

use crate::codec::{Content, ToContent};
use crate::error::{RankEvalError, Result};
use crate::parse::{ObjectParser, ParseContext};

/// Identifies a judged document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    index: String,
    doc_type: String,
    doc_id: String,
}

impl DocumentKey {
    pub const TYPE_NAME: &'static str = "key";

    pub fn new<I, T, D>(index: I, doc_type: T, doc_id: D) -> Self
    where
        I: Into<String>,
        T: Into<String>,
        D: Into<String>,
    {
        DocumentKey {
            index: index.into(),
            doc_type: doc_type.into(),
            doc_id: doc_id.into(),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    /// Describe what is wrong with this key, if anything.
    pub(crate) fn problem(&self) -> Option<String> {
        if self.index.is_empty() {
            Some(format!("document key {self} has an empty index"))
        } else if self.doc_id.is_empty() {
            Some(format!("document key {self} has an empty doc_id"))
        } else {
            None
        }
    }

    /// Parse a key object. Missing parts are reported as malformed.
    pub fn from_content(content: &Content, ctx: &ParseContext<'_>) -> Result<Self> {
        let mut parser = ObjectParser::new(content, Self::TYPE_NAME)?;
        let index = parser
            .required_str("index")
            .map_err(RankEvalError::into_malformed)?;
        let doc_type = parser
            .required_str("type")
            .map_err(RankEvalError::into_malformed)?;
        let doc_id = parser
            .required_str("doc_id")
            .map_err(RankEvalError::into_malformed)?;
        parser.finish(ctx)?;

        let key = DocumentKey::new(index, doc_type, doc_id);
        match key.problem() {
            Some(problem) => Err(RankEvalError::malformed(problem)),
            None => Ok(key),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}/{}]", self.index, self.doc_type, self.doc_id)
    }
}

impl ToContent for DocumentKey {
    fn to_content(&self) -> Content {
        Content::object()
            .field("index", self.index.as_str())
            .field("type", self.doc_type.as_str())
            .field("doc_id", self.doc_id.as_str())
            .build()
    }
}

/// A document key with its relevance grade.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RatedDocument {
    key: DocumentKey,
    rating: u32,
}

impl RatedDocument {
    pub const TYPE_NAME: &'static str = "rated_document";

    pub fn new<I, T, D>(index: I, doc_type: T, doc_id: D, rating: u32) -> Self
    where
        I: Into<String>,
        T: Into<String>,
        D: Into<String>,
    {
        RatedDocument {
            key: DocumentKey::new(index, doc_type, doc_id),
            rating,
        }
    }

    pub fn from_key(key: DocumentKey, rating: u32) -> Self {
        RatedDocument { key, rating }
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    pub fn rating(&self) -> u32 {
        self.rating
    }

    /// Parse one rating entry.
    ///
    /// A missing `key` or `rating`, a rating that is not a non-negative
    /// integer, or an incomplete key fails with a malformed-document error.
    pub fn from_content(content: &Content, ctx: &ParseContext<'_>) -> Result<Self> {
        let mut parser = ObjectParser::new(content, Self::TYPE_NAME)?;
        let key = parser.required("key").map_err(RankEvalError::into_malformed)?;
        let key = DocumentKey::from_content(key, ctx)?;
        let rating = parser
            .required("rating")
            .map_err(RankEvalError::into_malformed)?;
        let rating = parser.expect_u32("rating", rating)?;
        parser.finish(ctx)?;

        Ok(RatedDocument { key, rating })
    }
}

impl ToContent for RatedDocument {
    fn to_content(&self) -> Content {
        Content::object()
            .field("key", self.key.to_content())
            .field("rating", self.rating)
            .build()
    }
}
