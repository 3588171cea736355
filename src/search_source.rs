//! Search request body.
//!
//! The part of a rated request that is sent to the search layer: an optional
//! query plus paging. Written as
//! `{"query": {...}, "size": 10, "from": 0}`; absent members are omitted.

use crate::codec::{Content, ToContent};
use crate::error::Result;
use crate::parse::{ObjectParser, ParseContext};
use crate::query::Query;

/// A search request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchSource {
    query: Option<Box<dyn Query>>,
    size: Option<u32>,
    from: Option<u32>,
}

impl SearchSource {
    /// Type name used in error messages.
    pub const TYPE_NAME: &'static str = "request";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query<Q: Query + 'static>(mut self, query: Q) -> Self {
        self.query = Some(Box::new(query));
        self
    }

    pub fn with_boxed_query(mut self, query: Box<dyn Query>) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_from(mut self, from: u32) -> Self {
        self.from = Some(from);
        self
    }

    pub fn query(&self) -> Option<&dyn Query> {
        self.query.as_deref()
    }

    pub fn size(&self) -> Option<u32> {
        self.size
    }

    pub fn from(&self) -> Option<u32> {
        self.from
    }

    /// Parse a request body. Errors raised by query factories are returned
    /// unchanged.
    pub fn from_content(content: &Content, ctx: &ParseContext<'_>) -> Result<Self> {
        let mut parser = ObjectParser::new(content, Self::TYPE_NAME)?;
        let query = match parser.take("query") {
            Some(query) => Some(ctx.parse_inner_query(query)?),
            None => None,
        };
        let size = parser.optional_u32("size")?;
        let from = parser.optional_u32("from")?;
        parser.finish(ctx)?;

        Ok(SearchSource { query, size, from })
    }
}

impl ToContent for SearchSource {
    fn to_content(&self) -> Content {
        Content::object()
            .field_opt("query", self.query.as_ref().map(|q| q.to_content()))
            .field_opt("size", self.size)
            .field_opt("from", self.from)
            .build()
    }
}
