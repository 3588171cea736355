//! Query matching every document.

use std::any::Any;

use crate::codec::Content;
use crate::error::Result;
use crate::parse::{ObjectParser, ParseContext};
use crate::query::query::Query;

#[derive(Debug, Clone)]
pub struct MatchAllQuery {
    boost: f32,
}

impl Default for MatchAllQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchAllQuery {
    pub const NAME: &'static str = "match_all";

    pub fn new() -> Self {
        MatchAllQuery { boost: 1.0 }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Factory registered under [`MatchAllQuery::NAME`].
    pub fn from_content(body: &Content, ctx: &ParseContext<'_>) -> Result<Box<dyn Query>> {
        let mut parser = ObjectParser::new(body, Self::NAME)?;
        let boost = parser.optional_f32("boost")?.unwrap_or(1.0);
        parser.finish(ctx)?;
        Ok(Box::new(MatchAllQuery { boost }))
    }
}

impl Query for MatchAllQuery {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn body_to_content(&self) -> Content {
        let boost = (self.boost != 1.0).then_some(self.boost);
        Content::object().field_opt("boost", boost).build()
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
