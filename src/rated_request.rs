//! Rated requests.
//!
//! A [`RatedRequest`] names a search request and lists the relevance
//! judgments collected for it. The written form is
//!
//! ```json
//! {
//!   "id": "my_qa_query",
//!   "request": {"query": {"match_all": {}}, "size": 10},
//!   "ratings": [
//!     {"key": {"index": "test", "type": "testtype", "doc_id": "1"}, "rating": 1}
//!   ]
//! }
//! ```
//!
//! Instead of `request` a request may reference a stored search template with
//! `template_id` and `params`.
//!
//! The indices and types a request runs against usually come from the call
//! site rather than from the document. Parsing therefore stops at an
//! [`UnscopedRatedRequest`]; the caller turns it into a [`RatedRequest`] by
//! supplying the scope exactly once.

use std::collections::{BTreeMap, HashSet};

use crate::codec::{self, Content, Encoding, ToContent};
use crate::error::{RankEvalError, Result};
use crate::parse::{ObjectParser, ParseContext};
use crate::rated_document::RatedDocument;
use crate::search_source::SearchSource;

/// Where the search request of a rated request comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuerySource {
    /// An inline search request body.
    Request(SearchSource),
    /// A stored template rendered with `params`.
    Template {
        id: String,
        params: BTreeMap<String, Content>,
    },
}

impl QuerySource {
    pub fn template<S: Into<String>>(id: S) -> Self {
        QuerySource::Template {
            id: id.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn template_with_params<S: Into<String>>(
        id: S,
        params: BTreeMap<String, Content>,
    ) -> Self {
        QuerySource::Template {
            id: id.into(),
            params,
        }
        .canonical()
    }

    /// Sort the members of objects nested in template params, so that two
    /// sources differing only in member order compare equal.
    fn canonical(self) -> Self {
        match self {
            QuerySource::Template { id, params } => QuerySource::Template {
                id,
                params: params
                    .into_iter()
                    .map(|(name, value)| (name, value.sorted()))
                    .collect(),
            },
            request => request,
        }
    }
}

impl From<SearchSource> for QuerySource {
    fn from(source: SearchSource) -> Self {
        QuerySource::Request(source)
    }
}

/// A named search request with its relevance judgments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RatedRequest {
    spec_id: String,
    source: QuerySource,
    indices: Vec<String>,
    types: Vec<String>,
    rated_documents: Vec<RatedDocument>,
}

impl RatedRequest {
    pub const TYPE_NAME: &'static str = "rated_request";

    /// Build a rated request, checking that the id is not empty, that no two
    /// judgments share a document key and that every number in the request
    /// body or template params is finite.
    pub fn new<S, Q>(
        spec_id: S,
        source: Q,
        indices: Vec<String>,
        types: Vec<String>,
        rated_documents: Vec<RatedDocument>,
    ) -> Result<Self>
    where
        S: Into<String>,
        Q: Into<QuerySource>,
    {
        let request = RatedRequest {
            spec_id: spec_id.into(),
            source: source.into().canonical(),
            indices,
            types,
            rated_documents,
        };
        match request.problem() {
            Some(problem) => Err(RankEvalError::invalid_argument(problem)),
            None => Ok(request),
        }
    }

    pub fn spec_id(&self) -> &str {
        &self.spec_id
    }

    pub fn source(&self) -> &QuerySource {
        &self.source
    }

    /// The inline search request, if this request has one.
    pub fn test_request(&self) -> Option<&SearchSource> {
        match &self.source {
            QuerySource::Request(source) => Some(source),
            QuerySource::Template { .. } => None,
        }
    }

    pub fn template_id(&self) -> Option<&str> {
        match &self.source {
            QuerySource::Template { id, .. } => Some(id),
            QuerySource::Request(_) => None,
        }
    }

    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn rated_documents(&self) -> &[RatedDocument] {
        &self.rated_documents
    }

    /// Parse a rated request. The result still needs its scope, see
    /// [`UnscopedRatedRequest`].
    pub fn from_content(content: &Content, ctx: &ParseContext<'_>) -> Result<UnscopedRatedRequest> {
        let mut parser = ObjectParser::new(content, Self::TYPE_NAME)?;

        let spec_id = parser.required_str("id")?.to_string();
        let request = parser.take("request");
        let template_id = parser.optional_str("template_id")?;
        let params = parser.take("params");

        let source = match (request, template_id) {
            (Some(request), None) => {
                if params.is_some() {
                    return Err(RankEvalError::malformed(format!(
                        "[{}] [params] can only be used together with [template_id]",
                        Self::TYPE_NAME
                    )));
                }
                QuerySource::Request(SearchSource::from_content(request, ctx)?)
            }
            (None, Some(template_id)) => {
                let params = match params {
                    Some(params) => read_params(params)?,
                    None => BTreeMap::new(),
                };
                QuerySource::template_with_params(template_id, params)
            }
            (Some(_), Some(_)) => {
                return Err(RankEvalError::malformed(format!(
                    "[{}] [request] and [template_id] are mutually exclusive",
                    Self::TYPE_NAME
                )));
            }
            (None, None) => {
                return Err(RankEvalError::missing_field("request", Self::TYPE_NAME));
            }
        };

        let rated_documents = match parser.optional_array("ratings")? {
            Some(items) => items
                .iter()
                .map(|item| RatedDocument::from_content(item, ctx))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        let indices = parser.optional_str_list("indices")?.unwrap_or_default();
        let types = parser.optional_str_list("types")?.unwrap_or_default();
        parser.finish(ctx)?;

        let request = RatedRequest {
            spec_id,
            source,
            indices,
            types,
            rated_documents,
        };
        if let Some(problem) = request.problem() {
            return Err(RankEvalError::malformed(problem));
        }

        tracing::debug!(
            spec_id = %request.spec_id,
            ratings = request.rated_documents.len(),
            "parsed rated request"
        );
        Ok(UnscopedRatedRequest { request })
    }

    /// Decode `bytes` in the given encoding and parse them.
    pub fn from_bytes(
        bytes: &[u8],
        encoding: Encoding,
        ctx: &ParseContext<'_>,
    ) -> Result<UnscopedRatedRequest> {
        let content = codec::decode(bytes, encoding)?;
        Self::from_content(&content, ctx)
    }

    fn problem(&self) -> Option<String> {
        if self.spec_id.is_empty() {
            return Some(format!("[{}] [id] must not be empty", Self::TYPE_NAME));
        }
        if let QuerySource::Template { id, .. } = &self.source {
            if id.is_empty() {
                return Some(format!(
                    "[{}] [template_id] must not be empty",
                    Self::TYPE_NAME
                ));
            }
        }

        match &self.source {
            QuerySource::Request(source) => {
                if let Some(number) = source.to_content().find_non_finite() {
                    return Some(format!(
                        "[{}] [request] contains the non-finite number {number}",
                        self.spec_id
                    ));
                }
            }
            QuerySource::Template { params, .. } => {
                for (name, value) in params {
                    if let Some(number) = value.find_non_finite() {
                        return Some(format!(
                            "[{}] [params] [{name}] contains the non-finite number {number}",
                            self.spec_id
                        ));
                    }
                    if let Some(duplicate) = value.find_duplicate_member() {
                        return Some(format!(
                            "[{}] [params] [{name}] has duplicate field [{duplicate}]",
                            self.spec_id
                        ));
                    }
                }
            }
        }

        let mut seen = HashSet::with_capacity(self.rated_documents.len());
        for doc in &self.rated_documents {
            if let Some(problem) = doc.key().problem() {
                return Some(format!("[{}] {problem}", self.spec_id));
            }
            if !seen.insert(doc.key()) {
                return Some(format!(
                    "[{}] document key {} is rated more than once",
                    self.spec_id,
                    doc.key()
                ));
            }
        }
        None
    }
}

fn read_params(content: &Content) -> Result<BTreeMap<String, Content>> {
    let members = content.as_object().ok_or_else(|| {
        RankEvalError::malformed(format!(
            "[{}] [params] expected an object but found {}",
            RatedRequest::TYPE_NAME,
            content.kind()
        ))
    })?;

    let mut params = BTreeMap::new();
    for (name, value) in members {
        if params.insert(name.clone(), value.sorted()).is_some() {
            return Err(RankEvalError::malformed(format!(
                "[params] duplicate field [{name}]"
            )));
        }
    }
    Ok(params)
}

impl ToContent for RatedRequest {
    fn to_content(&self) -> Content {
        let mut builder = Content::object().field("id", self.spec_id.as_str());

        builder = match &self.source {
            QuerySource::Request(source) => builder.field("request", source.to_content()),
            QuerySource::Template { id, params } => {
                let params = params
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
                builder
                    .field("template_id", id.as_str())
                    .field("params", Content::Object(params))
            }
        };

        let ratings: Vec<Content> = self
            .rated_documents
            .iter()
            .map(ToContent::to_content)
            .collect();
        builder = builder.field("ratings", ratings);

        if !self.indices.is_empty() {
            builder = builder.field("indices", self.indices.clone());
        }
        if !self.types.is_empty() {
            builder = builder.field("types", self.types.clone());
        }
        builder.build()
    }
}

/// A parsed rated request whose index/type scope has not been decided yet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "call with_scope or with_document_scope to obtain the rated request"]
pub struct UnscopedRatedRequest {
    request: RatedRequest,
}

impl UnscopedRatedRequest {
    pub fn spec_id(&self) -> &str {
        &self.request.spec_id
    }

    /// Indices named by the document itself.
    pub fn document_indices(&self) -> &[String] {
        &self.request.indices
    }

    /// Types named by the document itself.
    pub fn document_types(&self) -> &[String] {
        &self.request.types
    }

    /// Replace whatever scope the document carried with the caller's.
    pub fn with_scope(mut self, indices: Vec<String>, types: Vec<String>) -> RatedRequest {
        self.request.indices = indices;
        self.request.types = types;
        self.request
    }

    /// Keep the scope written in the document.
    pub fn with_document_scope(self) -> RatedRequest {
        self.request
    }
}
