//! Boolean query combining multiple queries.

use std::any::Any;

use crate::codec::{Content, ToContent};
use crate::error::{RankEvalError, Result};
use crate::parse::{ObjectParser, ParseContext};
use crate::query::query::Query;

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occur {
    /// The clause must match and contributes to the score.
    Must,
    /// The clause must match but does not score.
    Filter,
    /// The clause should match (equivalent to OR).
    Should,
    /// The clause must not match (equivalent to NOT).
    MustNot,
}

impl Occur {
    /// Order in which clause groups are written.
    pub const ALL: [Occur; 4] = [Occur::Must, Occur::Filter, Occur::Should, Occur::MustNot];

    pub fn as_str(&self) -> &'static str {
        match self {
            Occur::Must => "must",
            Occur::Filter => "filter",
            Occur::Should => "should",
            Occur::MustNot => "must_not",
        }
    }
}

/// A clause in a boolean query.
#[derive(Debug, Clone)]
pub struct BooleanClause {
    /// The query for this clause.
    pub query: Box<dyn Query>,
    /// The occurrence requirement.
    pub occur: Occur,
}

impl BooleanClause {
    pub fn new(query: Box<dyn Query>, occur: Occur) -> Self {
        BooleanClause { query, occur }
    }
}

/// A boolean query that combines multiple queries with boolean logic.
#[derive(Debug, Clone)]
pub struct BooleanQuery {
    clauses: Vec<BooleanClause>,
    boost: f32,
    /// Minimum number of should clauses that must match.
    minimum_should_match: Option<u32>,
}

impl Default for BooleanQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl BooleanQuery {
    pub const NAME: &'static str = "bool";

    /// Create a new empty boolean query.
    pub fn new() -> Self {
        BooleanQuery {
            clauses: Vec::new(),
            boost: 1.0,
            minimum_should_match: None,
        }
    }

    pub fn add_clause(&mut self, clause: BooleanClause) {
        self.clauses.push(clause);
    }

    pub fn add_must(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::new(query, Occur::Must));
    }

    pub fn add_filter(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::new(query, Occur::Filter));
    }

    pub fn add_should(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::new(query, Occur::Should));
    }

    pub fn add_must_not(&mut self, query: Box<dyn Query>) {
        self.add_clause(BooleanClause::new(query, Occur::MustNot));
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn with_minimum_should_match(mut self, minimum: u32) -> Self {
        self.minimum_should_match = Some(minimum);
        self
    }

    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    pub fn minimum_should_match(&self) -> Option<u32> {
        self.minimum_should_match
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Get clauses by occurrence type.
    pub fn clauses_by_occur(&self, occur: Occur) -> Vec<&BooleanClause> {
        self.clauses.iter().filter(|c| c.occur == occur).collect()
    }

    /// Factory registered under [`BooleanQuery::NAME`].
    ///
    /// Each clause group accepts a single query object or an array of them.
    pub fn from_content(body: &Content, ctx: &ParseContext<'_>) -> Result<Box<dyn Query>> {
        let mut parser = ObjectParser::new(body, Self::NAME)?;
        let mut query = BooleanQuery::new();

        for occur in Occur::ALL {
            let Some(group) = parser.take(occur.as_str()) else {
                continue;
            };
            match group {
                Content::Array(items) => {
                    for item in items {
                        query.add_clause(BooleanClause::new(ctx.parse_inner_query(item)?, occur));
                    }
                }
                Content::Object(_) => {
                    query.add_clause(BooleanClause::new(ctx.parse_inner_query(group)?, occur));
                }
                other => {
                    return Err(RankEvalError::query(format!(
                        "[bool] [{}] expected a query or an array of queries but found {}",
                        occur.as_str(),
                        other.kind()
                    )));
                }
            }
        }

        query.minimum_should_match = parser.optional_u32("minimum_should_match")?;
        query.boost = parser.optional_f32("boost")?.unwrap_or(1.0);
        parser.finish(ctx)?;
        Ok(Box::new(query))
    }
}

impl Query for BooleanQuery {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn body_to_content(&self) -> Content {
        let mut body = Content::object();
        for occur in Occur::ALL {
            let group: Vec<Content> = self
                .clauses_by_occur(occur)
                .into_iter()
                .map(|clause| clause.query.to_content())
                .collect();
            if !group.is_empty() {
                body = body.field(occur.as_str(), group);
            }
        }
        body.field_opt("minimum_should_match", self.minimum_should_match)
            .field_opt("boost", (self.boost != 1.0).then_some(self.boost))
            .build()
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn clone_box(&self) -> Box<dyn Query> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{self, Encoding};
    use crate::query::{MatchQuery, QueryRegistry, TermQuery};

    const FIXTURE: &str = r#"{
        "must": [
            {"match": {"beverage": "coffee"}},
            {"term": {"browser": {"value": "safari"}}},
            {"term": {"time_of_day": {"value": "morning", "boost": 2}}},
            {"term": {"ip_location": {"value": "ams", "boost": 10}}}
        ]
    }"#;

    fn parse(body: &Content) -> Result<Box<dyn Query>> {
        let registry = QueryRegistry::with_defaults();
        BooleanQuery::from_content(body, &ParseContext::strict(&registry))
    }

    #[test]
    fn test_boolean_query_creation() {
        let mut query = BooleanQuery::new();
        query.add_must(Box::new(TermQuery::new("title", "hello")));
        query.add_should(Box::new(TermQuery::new("body", "world")));
        query.add_must_not(Box::new(TermQuery::new("category", "spam")));

        assert_eq!(query.clauses().len(), 3);
        assert_eq!(query.clauses_by_occur(Occur::Must).len(), 1);
        assert!(!query.is_empty());
    }

    #[test]
    fn test_parse_four_must_clauses() {
        let body = codec::decode(FIXTURE.as_bytes(), Encoding::Json).unwrap();
        let query = parse(&body).unwrap();
        let boolean = query.as_any().downcast_ref::<BooleanQuery>().unwrap();

        let must = boolean.clauses_by_occur(Occur::Must);
        assert_eq!(must.len(), 4);
        assert_eq!(must[0].query.name(), "match");
        assert_eq!(must[2].query.boost(), 2.0);
        assert_eq!(must[3].query.field(), Some("ip_location"));
    }

    #[test]
    fn test_single_object_clause() {
        let body = Content::object()
            .field(
                "filter",
                Content::object()
                    .field("term", Content::object().field("lang", "en").build())
                    .build(),
            )
            .field("minimum_should_match", 1i64)
            .build();
        let query = parse(&body).unwrap();
        let boolean = query.as_any().downcast_ref::<BooleanQuery>().unwrap();
        assert_eq!(boolean.clauses_by_occur(Occur::Filter).len(), 1);
        assert_eq!(boolean.minimum_should_match(), Some(1));
    }

    #[test]
    fn test_written_form_parses_back() {
        let mut query = BooleanQuery::new().with_boost(3.0);
        query.add_must(Box::new(MatchQuery::new("beverage", "coffee")));
        query.add_must_not(Box::new(TermQuery::new("browser", "ie")));
        let query: Box<dyn Query> = Box::new(query);

        let content = query.to_content();
        let reparsed = parse(content.get("bool").unwrap()).unwrap();
        assert_eq!(&reparsed, &query);
    }

    #[test]
    fn test_nested_errors_propagate() {
        let body = Content::object()
            .field(
                "must",
                vec![
                    Content::object()
                        .field("span_term", Content::object().build())
                        .build(),
                ],
            )
            .build();
        assert!(matches!(
            parse(&body),
            Err(RankEvalError::UnknownType { .. })
        ));

        let body = Content::object().field("should", "coffee").build();
        assert!(matches!(parse(&body), Err(RankEvalError::Query(_))));
    }

    #[test]
    fn test_unknown_bool_field() {
        let body = Content::object().field("must_maybe", vec![Content::Null]).build();
        let err = parse(&body).unwrap_err();
        assert_eq!(err.field(), Some("must_maybe"));
    }
}
