//! Integration tests for parsing rated request documents.

use rankeval::codec::{self, Content};
use rankeval::parse::ObjectParser;
use rankeval::prelude::*;

const MY_QA_QUERY: &str = r#"{
    "id": "my_qa_query",
    "request": {
        "query": {
            "bool": {
                "must": [
                    {"match": {"beverage": "coffee"}},
                    {"term": {"browser": {"value": "safari"}}},
                    {"term": {"time_of_day": {"value": "morning", "boost": 2}}},
                    {"term": {"ip_location": {"value": "ams", "boost": 10}}}
                ]
            }
        },
        "size": 10
    },
    "ratings": [
        {"key": {"index": "test", "type": "testtype", "doc_id": "1"}, "rating": 1},
        {"key": {"index": "test", "type": "testtype", "doc_id": "2"}, "rating": 0},
        {"key": {"index": "test", "type": "testtype", "doc_id": "3"}, "rating": 1}
    ]
}"#;

fn parse_with(json: &str, ctx: &ParseContext<'_>) -> Result<RatedRequest> {
    Ok(RatedRequest::from_bytes(json.as_bytes(), Encoding::Json, ctx)?.with_document_scope())
}

fn parse(json: &str) -> Result<RatedRequest> {
    let registry = QueryRegistry::with_defaults();
    parse_with(json, &ParseContext::strict(&registry))
}

#[test]
fn test_my_qa_query_fixture() -> Result<()> {
    let request = parse(MY_QA_QUERY)?;

    assert_eq!(request.spec_id(), "my_qa_query");
    let source = request.test_request().expect("inline request");
    assert_eq!(source.size(), Some(10));

    let query = source.query().expect("query");
    assert_eq!(query.name(), "bool");
    let bool_query = query
        .as_any()
        .downcast_ref::<BooleanQuery>()
        .expect("bool query");
    assert_eq!(bool_query.clauses_by_occur(Occur::Must).len(), 4);

    let judged: Vec<(&str, u32)> = request
        .rated_documents()
        .iter()
        .map(|d| (d.key().doc_id(), d.rating()))
        .collect();
    assert_eq!(judged, vec![("1", 1), ("2", 0), ("3", 1)]);
    assert!(request.indices().is_empty());
    Ok(())
}

#[test]
fn test_fixture_matches_programmatic_construction() -> Result<()> {
    let mut query = BooleanQuery::new();
    query.add_must(Box::new(MatchQuery::new("beverage", "coffee")));
    query.add_must(Box::new(TermQuery::new("browser", "safari")));
    query.add_must(Box::new(TermQuery::new("time_of_day", "morning").with_boost(2.0)));
    query.add_must(Box::new(TermQuery::new("ip_location", "ams").with_boost(10.0)));

    let expected = RatedRequest::new(
        "my_qa_query",
        SearchSource::new().with_query(query).with_size(10),
        vec![],
        vec![],
        vec![
            RatedDocument::new("test", "testtype", "1", 1),
            RatedDocument::new("test", "testtype", "2", 0),
            RatedDocument::new("test", "testtype", "3", 1),
        ],
    )?;

    assert_eq!(parse(MY_QA_QUERY)?, expected);
    Ok(())
}

#[test]
fn test_missing_id() {
    let json = MY_QA_QUERY.replacen("\"id\": \"my_qa_query\",", "", 1);
    let err = parse(&json).unwrap_err();
    assert!(matches!(err, RankEvalError::MissingField { .. }));
    assert_eq!(err.field(), Some("id"));
}

#[test]
fn test_missing_rating() {
    let json = MY_QA_QUERY.replacen(", \"rating\": 0", "", 1);
    let err = parse(&json).unwrap_err();
    assert!(matches!(err, RankEvalError::Malformed(_)), "{err}");
}

#[test]
fn test_missing_request() {
    let json = r#"{"id": "q", "ratings": []}"#;
    let err = parse(json).unwrap_err();
    assert_eq!(err.field(), Some("request"));
}

#[test]
fn test_ratings_are_optional() -> Result<()> {
    let request = parse(r#"{"id": "q", "request": {"query": {"match_all": {}}}}"#)?;
    assert!(request.rated_documents().is_empty());
    Ok(())
}

#[test]
fn test_unknown_top_level_field() {
    let json = MY_QA_QUERY.replacen("\"id\"", "\"priority\": 3, \"id\"", 1);
    let err = parse(&json).unwrap_err();
    assert!(matches!(
        &err,
        RankEvalError::UnrecognizedField { field, type_name }
            if field == "priority" && type_name == "rated_request"
    ));
}

#[test]
fn test_unknown_nested_fields() {
    let cases = [
        (
            MY_QA_QUERY.replacen("\"size\": 10", "\"size\": 10, \"timeout\": \"1s\"", 1),
            "timeout",
        ),
        (
            MY_QA_QUERY.replacen("\"rating\": 1}", "\"rating\": 1, \"note\": \"x\"}", 1),
            "note",
        ),
        (
            MY_QA_QUERY.replacen("\"doc_id\": \"3\"", "\"doc_id\": \"3\", \"routing\": \"r\"", 1),
            "routing",
        ),
    ];

    for (json, field) in cases {
        let err = parse(&json).unwrap_err();
        assert!(
            matches!(err, RankEvalError::UnrecognizedField { .. }),
            "{field}: {err}"
        );
        assert_eq!(err.field(), Some(field));
    }
}

#[test]
fn test_lenient_mode_skips_unknown_fields() -> Result<()> {
    let json = MY_QA_QUERY
        .replacen("\"id\"", "\"priority\": 3, \"id\"", 1)
        .replacen("\"size\": 10", "\"size\": 10, \"timeout\": \"1s\"", 1);

    let registry = QueryRegistry::with_defaults();
    let lenient = parse_with(&json, &ParseContext::lenient(&registry))?;
    assert_eq!(lenient, parse(MY_QA_QUERY)?);
    Ok(())
}

#[test]
fn test_unknown_query_type() {
    let json = MY_QA_QUERY.replacen("\"match\"", "\"fuzzy\"", 1);
    let err = parse(&json).unwrap_err();
    assert!(matches!(
        &err,
        RankEvalError::UnknownType { name, .. } if name == "fuzzy"
    ));
}

#[test]
fn test_custom_query_type() -> Result<()> {
    #[derive(Debug, Clone)]
    struct ExistsQuery {
        field: String,
    }

    impl Query for ExistsQuery {
        fn name(&self) -> &'static str {
            "exists"
        }

        fn body_to_content(&self) -> Content {
            Content::object().field("field", self.field.as_str()).build()
        }

        fn boost(&self) -> f32 {
            1.0
        }

        fn clone_box(&self) -> Box<dyn Query> {
            Box::new(self.clone())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    let mut builder = QueryRegistry::builder_with_defaults();
    builder.register_query("exists", |body, ctx| {
        let mut parser = ObjectParser::new(body, "exists")?;
        let field = parser.required_str("field")?.to_string();
        parser.finish(ctx)?;
        Ok(Box::new(ExistsQuery { field }) as Box<dyn Query>)
    })?;
    let registry = builder.build();

    let json = r#"{"id": "q", "request": {"query": {"exists": {"field": "title"}}}}"#;
    let request = parse_with(json, &ParseContext::strict(&registry))?;
    let query = request.test_request().and_then(|s| s.query()).expect("query");
    assert_eq!(query.name(), "exists");

    // The default registry does not know about it.
    assert!(matches!(
        parse(json),
        Err(RankEvalError::UnknownType { .. })
    ));
    Ok(())
}

#[test]
fn test_duplicate_keys_are_malformed() {
    let json = MY_QA_QUERY.replacen("\"doc_id\": \"3\"", "\"doc_id\": \"1\"", 1);
    let err = parse(&json).unwrap_err();
    assert!(matches!(err, RankEvalError::Malformed(_)), "{err}");
}

#[test]
fn test_non_integer_rating_is_malformed() {
    let json = MY_QA_QUERY.replacen("\"rating\": 0", "\"rating\": \"high\"", 1);
    assert!(matches!(parse(&json), Err(RankEvalError::Malformed(_))));
}

#[test]
fn test_duplicate_member_is_malformed() {
    let json = MY_QA_QUERY.replacen("\"id\"", "\"id\": \"other\", \"id\"", 1);
    assert!(matches!(parse(&json), Err(RankEvalError::Malformed(_))));
}

#[test]
fn test_document_scope_is_read() -> Result<()> {
    let json = r#"{"id": "q", "request": {}, "indices": ["a", "b"], "types": ["t"]}"#;
    let registry = QueryRegistry::with_defaults();
    let ctx = ParseContext::strict(&registry);
    let unscoped = RatedRequest::from_bytes(json.as_bytes(), Encoding::Json, &ctx)?;
    assert_eq!(unscoped.document_indices(), ["a".to_string(), "b".to_string()]);
    assert_eq!(unscoped.document_types(), ["t".to_string()]);

    let scoped = unscoped.with_scope(vec!["c".to_string()], vec![]);
    assert_eq!(scoped.indices(), ["c".to_string()]);
    assert!(scoped.types().is_empty());
    Ok(())
}

#[test]
fn test_truncated_binary_is_rejected() -> Result<()> {
    let request = parse(MY_QA_QUERY)?;
    let bytes = request.to_bytes(&WriteOptions::new(Encoding::Binary))?;
    let registry = QueryRegistry::with_defaults();
    let ctx = ParseContext::strict(&registry);

    for len in [0, 3, bytes.len() / 2, bytes.len() - 1] {
        assert!(RatedRequest::from_bytes(&bytes[..len], Encoding::Binary, &ctx).is_err());
    }

    let mut corrupted = bytes.clone();
    let middle = corrupted.len() / 2;
    corrupted[middle] ^= 0xff;
    assert!(codec::decode(&corrupted, Encoding::Binary).is_err());
    Ok(())
}
