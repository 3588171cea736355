//! Query definitions embedded in search requests.
//!
//! Queries are polymorphic: a request body names a query type and the body is
//! parsed by whatever factory the [`QueryRegistry`] holds for that name. The
//! crate ships a small built-in family; callers add their own types by
//! registering further factories before freezing the registry.

pub mod boolean;
pub mod match_all;
pub mod match_query;
#[allow(clippy::module_inception)]
pub mod query;
pub mod term;

use std::sync::Arc;

use crate::codec::Content;
use crate::error::Result;
use crate::parse::ParseContext;
use crate::registry::{NamedRegistry, RegistryBuilder};

pub use self::boolean::{BooleanClause, BooleanQuery, Occur};
pub use self::match_all::MatchAllQuery;
pub use self::match_query::{MatchQuery, Operator};
pub use self::query::Query;
pub use self::term::TermQuery;

/// Parses the body found under a query type name.
pub type QueryParserFn =
    Arc<dyn Fn(&Content, &ParseContext<'_>) -> Result<Box<dyn Query>> + Send + Sync>;

/// Registry of query parsers keyed by query type name.
pub type QueryRegistry = NamedRegistry<QueryParserFn>;

impl NamedRegistry<QueryParserFn> {
    /// Empty builder for query parsers.
    pub fn query_builder() -> RegistryBuilder<QueryParserFn> {
        NamedRegistry::builder("query")
    }

    /// Builder pre-populated with the built-in query types.
    pub fn builder_with_defaults() -> RegistryBuilder<QueryParserFn> {
        NamedRegistry::builder_with("query", default_parsers())
    }

    /// Registry holding only the built-in query types.
    pub fn with_defaults() -> QueryRegistry {
        Self::builder_with_defaults().build()
    }
}

impl RegistryBuilder<QueryParserFn> {
    /// Register a query parser function.
    pub fn register_query<S, F>(&mut self, name: S, parser: F) -> Result<&mut Self>
    where
        S: Into<String>,
        F: Fn(&Content, &ParseContext<'_>) -> Result<Box<dyn Query>> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(parser))
    }
}

type BuiltinParser = fn(&Content, &ParseContext<'_>) -> Result<Box<dyn Query>>;

fn default_parsers() -> impl Iterator<Item = (&'static str, QueryParserFn)> {
    let defaults: [(&'static str, BuiltinParser); 4] = [
        (MatchAllQuery::NAME, MatchAllQuery::from_content),
        (TermQuery::NAME, TermQuery::from_content),
        (MatchQuery::NAME, MatchQuery::from_content),
        (BooleanQuery::NAME, BooleanQuery::from_content),
    ];
    defaults
        .into_iter()
        .map(|(name, parser)| (name, Arc::new(parser) as QueryParserFn))
}
