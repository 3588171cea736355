//! Parse context and object cursor.
//!
//! Every parser in the crate receives a [`ParseContext`]: it carries the query
//! registry used to resolve embedded queries and the [`Strictness`] that
//! decides what happens to members nobody asked for. The context is handed
//! down unchanged, so the policy applies to the whole document tree including
//! query bodies produced by registered factories.
//!
//! [`ObjectParser`] is the cursor over one object. Parsers pull the members
//! they understand and then call [`ObjectParser::finish`], which applies the
//! strictness policy to whatever is left.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::codec::Content;
use crate::error::{RankEvalError, Result};
use crate::query::{Query, QueryRegistry};

/// How unknown object members are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Unknown members fail the parse.
    #[default]
    Strict,
    /// Unknown members are skipped.
    Lenient,
}

/// State shared by every parse call in one document.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    registry: &'a QueryRegistry,
    strictness: Strictness,
}

impl<'a> ParseContext<'a> {
    pub fn new(registry: &'a QueryRegistry, strictness: Strictness) -> Self {
        ParseContext {
            registry,
            strictness,
        }
    }

    pub fn strict(registry: &'a QueryRegistry) -> Self {
        Self::new(registry, Strictness::Strict)
    }

    pub fn lenient(registry: &'a QueryRegistry) -> Self {
        Self::new(registry, Strictness::Lenient)
    }

    pub fn registry(&self) -> &'a QueryRegistry {
        self.registry
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }

    /// Parse a query object of the form `{"<type>": <body>}`.
    ///
    /// The type name is resolved through the registry and the body is handed
    /// to the registered factory together with this context. Factory errors
    /// are returned as they are.
    pub fn parse_inner_query(&self, content: &Content) -> Result<Box<dyn Query>> {
        let members = content.as_object().ok_or_else(|| {
            RankEvalError::malformed(format!(
                "[query] expected an object but found {}",
                content.kind()
            ))
        })?;

        match members {
            [(name, body)] => {
                let factory = self.registry.resolve(name)?;
                tracing::trace!(query = %name, "resolving query");
                factory(body, self)
            }
            [] => Err(RankEvalError::malformed("[query] query object is empty")),
            [(first, _), (second, _), ..] => Err(RankEvalError::malformed(format!(
                "[{first}] malformed query, expected a single query type but found [{second}]"
            ))),
        }
    }
}

/// Cursor over the members of one object.
#[derive(Debug)]
pub struct ObjectParser<'c> {
    type_name: &'static str,
    members: &'c [(String, Content)],
    consumed: Vec<bool>,
}

impl<'c> ObjectParser<'c> {
    /// Open `content` as an object belonging to `type_name`.
    ///
    /// Fails if `content` is not an object or names a member twice.
    pub fn new(content: &'c Content, type_name: &'static str) -> Result<Self> {
        let members = content.as_object().ok_or_else(|| {
            RankEvalError::malformed(format!(
                "[{type_name}] expected an object but found {}",
                content.kind()
            ))
        })?;

        let mut seen = HashSet::with_capacity(members.len());
        for (name, _) in members {
            if !seen.insert(name.as_str()) {
                return Err(RankEvalError::malformed(format!(
                    "[{type_name}] duplicate field [{name}]"
                )));
            }
        }

        Ok(ObjectParser {
            type_name,
            members,
            consumed: vec![false; members.len()],
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Take a member. Explicit `null` counts as absent.
    pub fn take(&mut self, name: &str) -> Option<&'c Content> {
        let position = self.members.iter().position(|(key, _)| key == name)?;
        self.consumed[position] = true;
        let value = &self.members[position].1;
        (!value.is_null()).then_some(value)
    }

    /// Take a member that must be present.
    pub fn required(&mut self, name: &str) -> Result<&'c Content> {
        self.take(name)
            .ok_or_else(|| RankEvalError::missing_field(name, self.type_name))
    }

    pub fn required_str(&mut self, name: &str) -> Result<&'c str> {
        let value = self.required(name)?;
        self.expect_str(name, value)
    }

    pub fn optional_str(&mut self, name: &str) -> Result<Option<&'c str>> {
        match self.take(name) {
            Some(value) => self.expect_str(name, value).map(Some),
            None => Ok(None),
        }
    }

    pub fn optional_u32(&mut self, name: &str) -> Result<Option<u32>> {
        match self.take(name) {
            Some(value) => self.expect_u32(name, value).map(Some),
            None => Ok(None),
        }
    }

    /// Finite number narrowed to `f32`.
    pub fn optional_f32(&mut self, name: &str) -> Result<Option<f32>> {
        match self.take(name) {
            Some(value) => {
                let number = value
                    .as_f64()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| self.wrong_kind(name, "a finite number", value))?;
                Ok(Some(number as f32))
            }
            None => Ok(None),
        }
    }

    pub fn optional_array(&mut self, name: &str) -> Result<Option<&'c [Content]>> {
        match self.take(name) {
            Some(value) => value
                .as_array()
                .map(Some)
                .ok_or_else(|| self.wrong_kind(name, "an array", value)),
            None => Ok(None),
        }
    }

    pub fn optional_str_list(&mut self, name: &str) -> Result<Option<Vec<String>>> {
        let Some(items) = self.optional_array(name)? else {
            return Ok(None);
        };
        items
            .iter()
            .map(|item| self.expect_str(name, item).map(str::to_string))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Members not taken so far, in document order.
    pub fn remaining(&self) -> impl Iterator<Item = &'c (String, Content)> + '_ {
        self.members
            .iter()
            .zip(&self.consumed)
            .filter(|(_, consumed)| !**consumed)
            .map(|(member, _)| member)
    }

    /// Mark every remaining member as taken and return them.
    pub fn take_remaining(&mut self) -> Vec<&'c (String, Content)> {
        let members = self.members;
        let mut taken = Vec::new();
        for (member, consumed) in members.iter().zip(self.consumed.iter_mut()) {
            if !*consumed {
                *consumed = true;
                taken.push(member);
            }
        }
        taken
    }

    /// Apply the strictness policy to the members nobody took.
    pub fn finish(self, ctx: &ParseContext<'_>) -> Result<()> {
        for (name, _) in self.remaining() {
            if ctx.is_strict() {
                return Err(RankEvalError::unrecognized_field(name, self.type_name));
            }
            tracing::debug!(
                type_name = self.type_name,
                field = %name,
                "skipping unknown field"
            );
        }
        Ok(())
    }

    pub fn expect_str<'v>(&self, name: &str, value: &'v Content) -> Result<&'v str> {
        value
            .as_str()
            .ok_or_else(|| self.wrong_kind(name, "a string", value))
    }

    pub fn expect_u32(&self, name: &str, value: &Content) -> Result<u32> {
        value
            .as_i64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| self.wrong_kind(name, "a non-negative integer", value))
    }

    fn wrong_kind(&self, name: &str, expected: &str, value: &Content) -> RankEvalError {
        let found = match value {
            Content::Int(n) => format!("integer {n}"),
            Content::Float(n) => format!("float {n}"),
            other => other.kind().to_string(),
        };
        RankEvalError::malformed(format!(
            "[{}] field [{name}] expected {expected} but found {found}",
            self.type_name
        ))
    }
}
