//! Batches of rated requests.
//!
//! Written as `{"requests": [<rated request>, ...]}`. Spec ids must be unique
//! within one batch.

use std::collections::HashSet;

use crate::codec::{self, Content, Encoding, ToContent};
use crate::error::{RankEvalError, Result};
use crate::parse::{ObjectParser, ParseContext};
use crate::rated_request::{RatedRequest, UnscopedRatedRequest};

/// A non-empty batch of rated requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankEvalSpec {
    requests: Vec<RatedRequest>,
}

impl RankEvalSpec {
    pub const TYPE_NAME: &'static str = "rank_eval";

    pub fn new(requests: Vec<RatedRequest>) -> Result<Self> {
        let ids = requests.iter().map(RatedRequest::spec_id);
        check_ids(ids).map_err(RankEvalError::invalid_argument)?;
        Ok(RankEvalSpec { requests })
    }

    pub fn requests(&self) -> &[RatedRequest] {
        &self.requests
    }

    pub fn get(&self, spec_id: &str) -> Option<&RatedRequest> {
        self.requests.iter().find(|r| r.spec_id() == spec_id)
    }

    pub fn from_content(content: &Content, ctx: &ParseContext<'_>) -> Result<UnscopedRankEvalSpec> {
        let mut parser = ObjectParser::new(content, Self::TYPE_NAME)?;
        let items = parser
            .optional_array("requests")?
            .ok_or_else(|| RankEvalError::missing_field("requests", Self::TYPE_NAME))?;
        let requests = items
            .iter()
            .map(|item| RatedRequest::from_content(item, ctx))
            .collect::<Result<Vec<_>>>()?;
        parser.finish(ctx)?;

        check_ids(requests.iter().map(UnscopedRatedRequest::spec_id))
            .map_err(RankEvalError::malformed)?;
        Ok(UnscopedRankEvalSpec { requests })
    }

    pub fn from_bytes(
        bytes: &[u8],
        encoding: Encoding,
        ctx: &ParseContext<'_>,
    ) -> Result<UnscopedRankEvalSpec> {
        let content = codec::decode(bytes, encoding)?;
        Self::from_content(&content, ctx)
    }
}

fn check_ids<'a, I: Iterator<Item = &'a str>>(ids: I) -> std::result::Result<(), String> {
    let mut seen = HashSet::new();
    let mut count = 0;
    for id in ids {
        count += 1;
        if !seen.insert(id) {
            return Err(format!(
                "[{}] spec id [{id}] is used by more than one request",
                RankEvalSpec::TYPE_NAME
            ));
        }
    }
    if count == 0 {
        return Err(format!(
            "[{}] at least one rated request is required",
            RankEvalSpec::TYPE_NAME
        ));
    }
    Ok(())
}

impl ToContent for RankEvalSpec {
    fn to_content(&self) -> Content {
        let requests: Vec<Content> = self.requests.iter().map(ToContent::to_content).collect();
        Content::object().field("requests", requests).build()
    }
}

/// A parsed batch whose requests still need their scope.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "call with_scope or with_document_scope to obtain the batch"]
pub struct UnscopedRankEvalSpec {
    requests: Vec<UnscopedRatedRequest>,
}

impl UnscopedRankEvalSpec {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Apply one call-site scope to every request.
    pub fn with_scope(self, indices: Vec<String>, types: Vec<String>) -> RankEvalSpec {
        let requests = self
            .requests
            .into_iter()
            .map(|r| r.with_scope(indices.clone(), types.clone()))
            .collect();
        RankEvalSpec { requests }
    }

    /// Keep the scope each request document carried.
    pub fn with_document_scope(self) -> RankEvalSpec {
        let requests = self
            .requests
            .into_iter()
            .map(UnscopedRatedRequest::with_document_scope)
            .collect();
        RankEvalSpec { requests }
    }
}
