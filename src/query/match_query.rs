//! Full-text match query.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use crate::codec::Content;
use crate::error::{RankEvalError, Result};
use crate::parse::{ObjectParser, ParseContext};
use crate::query::query::Query;
use crate::query::term::single_field;

/// How the analyzed terms of a match query are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    /// Any term may match.
    #[default]
    Or,
    /// Every term must match.
    And,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Or => "or",
            Operator::And => "and",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = RankEvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "or" => Ok(Operator::Or),
            "and" => Ok(Operator::And),
            other => Err(RankEvalError::query(format!(
                "[match] unknown operator [{other}]"
            ))),
        }
    }
}

/// A query matching analyzed text against a field.
#[derive(Debug, Clone)]
pub struct MatchQuery {
    field: String,
    text: String,
    operator: Operator,
    boost: f32,
}

impl MatchQuery {
    pub const NAME: &'static str = "match";

    pub fn new<F: Into<String>, T: Into<String>>(field: F, text: T) -> Self {
        MatchQuery {
            field: field.into(),
            text: text.into(),
            operator: Operator::Or,
            boost: 1.0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Factory registered under [`MatchQuery::NAME`].
    pub fn from_content(body: &Content, ctx: &ParseContext<'_>) -> Result<Box<dyn Query>> {
        let (field, value) = single_field(Self::NAME, body)?;

        let query = match value {
            Content::String(text) => MatchQuery::new(field, text.as_str()),
            Content::Object(_) => {
                let mut parser = ObjectParser::new(value, Self::NAME)?;
                let text = parser.required_str("query")?;
                let operator = match parser.optional_str("operator")? {
                    Some(op) => op.parse()?,
                    None => Operator::Or,
                };
                let boost = parser.optional_f32("boost")?.unwrap_or(1.0);
                parser.finish(ctx)?;
                MatchQuery::new(field, text)
                    .with_operator(operator)
                    .with_boost(boost)
            }
            other => {
                return Err(RankEvalError::query(format!(
                    "[match] expected a string or an object for field [{field}] but found {}",
                    other.kind()
                )));
            }
        };
        Ok(Box::new(query))
    }
}

impl Query for MatchQuery {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn body_to_content(&self) -> Content {
        let value = if self.boost == 1.0 && self.operator == Operator::Or {
            Content::from(self.text.as_str())
        } else {
            let mut inner = Content::object().field("query", self.text.as_str());
            if self.operator != Operator::Or {
                inner = inner.field("operator", self.operator.as_str());
            }
            if self.boost != 1.0 {
                inner = inner.field("boost", self.boost);
            }
            inner.build()
        };
        Content::object().field(self.field.as_str(), value).build()
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

    fn field(&self) -> Option<&str> {
        Some(&self.field)
    }
}
