//! Base query trait.

use std::any::Any;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use crate::codec::{Content, ToContent};

/// A query that can be embedded in a search request.
///
/// Implementations only describe themselves; executing them is left to the
/// search layer. Two queries are equal when they have the same registered name
/// and write the same body, which keeps equality and hashing consistent for
/// every implementation without per-type glue.
pub trait Query: Send + Sync + Debug {
    /// Name the query is registered under, i.e. the key it is written with.
    fn name(&self) -> &'static str;

    /// The body written under [`Query::name`].
    fn body_to_content(&self) -> Content;

    /// Get the boost factor for this query.
    fn boost(&self) -> f32;

    /// Clone this query.
    fn clone_box(&self) -> Box<dyn Query>;

    /// Get this query as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Get the field name this query targets, if applicable.
    fn field(&self) -> Option<&str> {
        None
    }
}

impl ToContent for dyn Query {
    fn to_content(&self) -> Content {
        Content::object()
            .field(self.name(), self.body_to_content())
            .build()
    }
}

impl Clone for Box<dyn Query> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl PartialEq for dyn Query {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.body_to_content() == other.body_to_content()
    }
}

impl Eq for dyn Query {}

impl Hash for dyn Query {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.body_to_content().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{MatchAllQuery, TermQuery};

    #[test]
    fn test_query_equality_by_content() {
        let a: Box<dyn Query> = Box::new(TermQuery::new("title", "hello"));
        let b: Box<dyn Query> = Box::new(TermQuery::new("title", "hello").with_boost(1.0));
        let c: Box<dyn Query> = Box::new(TermQuery::new("title", "world"));
        let d: Box<dyn Query> = Box::new(MatchAllQuery::new());

        assert_eq!(&a, &b);
        assert_ne!(&a, &c);
        assert_ne!(&a, &d);
    }

    #[test]
    fn test_query_to_content_wraps_name() {
        let query: Box<dyn Query> = Box::new(MatchAllQuery::new());
        let content = query.to_content();
        assert!(content.get("match_all").is_some());
    }

    #[test]
    fn test_clone_and_downcast() {
        let query: Box<dyn Query> = Box::new(TermQuery::new("title", "hello").with_boost(2.0));
        let cloned = query.clone();

        let term = cloned.as_any().downcast_ref::<TermQuery>().unwrap();
        assert_eq!(term.boost(), 2.0);
        assert_eq!(cloned.field(), Some("title"));
    }
}
