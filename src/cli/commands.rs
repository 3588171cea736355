//! Command implementations for the rankeval CLI.

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::codec::{Content, Encoding, ToContent, WriteOptions};
use crate::error::Result;
use crate::parse::ParseContext;
use crate::query::QueryRegistry;
use crate::rank_eval_spec::RankEvalSpec;
use crate::rated_request::RatedRequest;

/// Execute a CLI command.
pub fn execute_command(args: RankEvalArgs) -> Result<()> {
    match &args.command {
        Command::Validate(validate_args) => {
            let report = validate(validate_args)?;
            output_result(&report, &args)
        }
        Command::Convert(convert_args) => {
            let report = convert(convert_args)?;
            output_result(&report, &args)
        }
    }
}

/// A parsed input file: one request or a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Single(RatedRequest),
    Batch(RankEvalSpec),
}

impl Parsed {
    pub fn requests(&self) -> &[RatedRequest] {
        match self {
            Parsed::Single(request) => std::slice::from_ref(request),
            Parsed::Batch(spec) => spec.requests(),
        }
    }
}

impl ToContent for Parsed {
    fn to_content(&self) -> Content {
        match self {
            Parsed::Single(request) => request.to_content(),
            Parsed::Batch(spec) => spec.to_content(),
        }
    }
}

/// Parse a document with the default query registry, then apply the scope.
pub fn parse_document(bytes: &[u8], encoding: Encoding, args: &ParseArgs) -> Result<Parsed> {
    let registry = QueryRegistry::with_defaults();
    let ctx = ParseContext::new(&registry, args.strictness());

    let parsed = if args.batch {
        let unscoped = RankEvalSpec::from_bytes(bytes, encoding, &ctx)?;
        Parsed::Batch(if args.has_scope() {
            unscoped.with_scope(args.indices.clone(), args.types.clone())
        } else {
            unscoped.with_document_scope()
        })
    } else {
        let unscoped = RatedRequest::from_bytes(bytes, encoding, &ctx)?;
        Parsed::Single(if args.has_scope() {
            unscoped.with_scope(args.indices.clone(), args.types.clone())
        } else {
            unscoped.with_document_scope()
        })
    };

    tracing::info!(
        requests = parsed.requests().len(),
        %encoding,
        strict = ctx.is_strict(),
        "parsed document"
    );
    Ok(parsed)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(bytes)
}

/// Parse a file and summarize it.
pub fn validate(args: &ValidateArgs) -> Result<ValidationReport> {
    let bytes = read_file(&args.file)?;
    let parsed = parse_document(&bytes, args.encoding, &args.parse)?;

    Ok(ValidationReport {
        file: args.file.display().to_string(),
        encoding: args.encoding,
        requests: parsed.requests().iter().map(RequestSummary::from).collect(),
    })
}

/// Parse a file and write it back in another encoding.
pub fn convert(args: &ConvertArgs) -> Result<ConversionReport> {
    let input = read_file(&args.input)?;
    let parsed = parse_document(&input, args.from, &args.parse)?;

    let options = WriteOptions::new(args.to).with_pretty(args.pretty);
    let output = parsed.to_bytes(&options)?;
    fs::write(&args.output, &output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    tracing::info!(
        from = %args.from,
        to = %args.to,
        bytes_in = input.len(),
        bytes_out = output.len(),
        "converted document"
    );

    Ok(ConversionReport {
        input: args.input.display().to_string(),
        output: args.output.display().to_string(),
        from: args.from,
        to: args.to,
        requests: parsed.requests().len(),
        bytes_in: input.len(),
        bytes_out: output.len(),
    })
}
