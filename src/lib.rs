//! # rankeval
//!
//! Rated search requests: a named search request paired with human relevance
//! judgments, plus the codec that writes them to and reads them from JSON or a
//! compact binary form without losing anything on the way.
//!
//! ## Features
//!
//! - Format-agnostic document tree with JSON (compact or pretty) and binary encodings
//! - Pluggable query types resolved through an immutable registry
//! - Strict parsing that names the offending field and type
//! - Call-site scoping of indices and types after parsing
//!
//! ## Example
//!
//! ```
//! use rankeval::prelude::*;
//!
//! let registry = QueryRegistry::with_defaults();
//! let ctx = ParseContext::strict(&registry);
//!
//! let request = RatedRequest::new(
//!     "coffee",
//!     SearchSource::new().with_query(MatchQuery::new("beverage", "coffee")).with_size(10),
//!     vec![],
//!     vec![],
//!     vec![RatedDocument::new("test", "testtype", "1", 1)],
//! )
//! .unwrap();
//!
//! let bytes = request.to_bytes(&WriteOptions::new(Encoding::Binary)).unwrap();
//! let parsed = RatedRequest::from_bytes(&bytes, Encoding::Binary, &ctx)
//!     .unwrap()
//!     .with_scope(vec![], vec![]);
//! assert_eq!(parsed, request);
//! ```

pub mod cli;
pub mod codec;
pub mod error;
pub mod parse;
pub mod query;
pub mod rank_eval_spec;
pub mod rated_document;
pub mod rated_request;
pub mod registry;
pub mod search_source;
pub mod util;

pub mod prelude {
    pub use crate::codec::{Content, Encoding, ToContent, WriteOptions};
    pub use crate::error::{RankEvalError, Result};
    pub use crate::parse::{ParseContext, Strictness};
    pub use crate::query::{
        BooleanQuery, MatchAllQuery, MatchQuery, Occur, Operator, Query, QueryRegistry, TermQuery,
    };
    pub use crate::rank_eval_spec::RankEvalSpec;
    pub use crate::rated_document::{DocumentKey, RatedDocument};
    pub use crate::rated_request::{QuerySource, RatedRequest, UnscopedRatedRequest};
    pub use crate::search_source::SearchSource;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
