//! Term query for exact term matching.
//!
//! Written either in short form, `{"term": {"browser": "safari"}}`, or in long
//! form when it carries a boost, `{"term": {"browser": {"value": "safari", "boost": 2.0}}}`.

use std::any::Any;

use crate::codec::Content;
use crate::error::{RankEvalError, Result};
use crate::parse::{ObjectParser, ParseContext};
use crate::query::query::Query;

/// A query that matches documents containing a specific term.
#[derive(Debug, Clone)]
pub struct TermQuery {
    /// The field to search in.
    field: String,
    /// The term to search for. Always a scalar.
    value: Content,
    /// The boost factor for this query.
    boost: f32,
}

impl TermQuery {
    pub const NAME: &'static str = "term";

    /// Create a new term query.
    ///
    /// The value is matched exactly, without analysis.
    pub fn new<F, T>(field: F, value: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        TermQuery {
            field: field.into(),
            value: Content::String(value.into()),
            boost: 1.0,
        }
    }

    /// Create a term query on a non-string scalar such as a number or boolean.
    pub fn with_value<F: Into<String>>(field: F, value: Content) -> Result<Self> {
        if !is_scalar(&value) {
            return Err(RankEvalError::query(format!(
                "[term] value must be a scalar but found {}",
                value.kind()
            )));
        }
        if let Some(number) = value.find_non_finite() {
            return Err(RankEvalError::query(format!(
                "[term] value must be a finite number but found {number}"
            )));
        }
        Ok(TermQuery {
            field: field.into(),
            value,
            boost: 1.0,
        })
    }

    /// Get the term value.
    pub fn value(&self) -> &Content {
        &self.value
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Factory registered under [`TermQuery::NAME`].
    pub fn from_content(body: &Content, ctx: &ParseContext<'_>) -> Result<Box<dyn Query>> {
        let (field, value) = single_field(Self::NAME, body)?;

        let query = if is_scalar(value) {
            TermQuery::with_value(field, value.clone())?
        } else {
            let mut parser = ObjectParser::new(value, Self::NAME)?;
            let term = parser.required("value")?.clone();
            let boost = parser.optional_f32("boost")?.unwrap_or(1.0);
            parser.finish(ctx)?;
            TermQuery::with_value(field, term)?.with_boost(boost)
        };
        Ok(Box::new(query))
    }
}

impl Query for TermQuery {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn body_to_content(&self) -> Content {
        let value = if self.boost == 1.0 {
            self.value.clone()
        } else {
            Content::object()
                .field("value", self.value.clone())
                .field("boost", self.boost)
                .build()
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

fn is_scalar(value: &Content) -> bool {
    matches!(
        value,
        Content::String(_) | Content::Int(_) | Content::Float(_) | Content::Bool(_)
    )
}

/// Read the `{"<field>": <value>}` shape shared by field-level queries.
pub(crate) fn single_field<'c>(
    query_name: &str,
    body: &'c Content,
) -> Result<(&'c str, &'c Content)> {
    let members = body.as_object().ok_or_else(|| {
        RankEvalError::query(format!(
            "[{query_name}] query malformed, expected an object but found {}",
            body.kind()
        ))
    })?;

    match members {
        [(field, value)] => Ok((field.as_str(), value)),
        [] => Err(RankEvalError::query(format!(
            "[{query_name}] query doesn't specify a field"
        ))),
        [(first, _), (second, _), ..] => Err(RankEvalError::query(format!(
            "[{query_name}] query doesn't support multiple fields, found [{first}] and [{second}]"
        ))),
    }
}
