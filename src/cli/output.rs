//! Output formatting for CLI commands.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, RankEvalArgs};
use crate::codec::Encoding;
use crate::error::Result;
use crate::rated_request::{QuerySource, RatedRequest};

/// Summary of one parsed rated request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub spec_id: String,
    /// Query type of the inline request, if any.
    pub query_type: Option<String>,
    pub size: Option<u32>,
    pub template_id: Option<String>,
    pub indices: Vec<String>,
    pub types: Vec<String>,
    pub ratings: usize,
    /// Ratings greater than zero.
    pub relevant: usize,
}

impl From<&RatedRequest> for RequestSummary {
    fn from(request: &RatedRequest) -> Self {
        let (query_type, size, template_id) = match request.source() {
            QuerySource::Request(source) => (
                source.query().map(|q| q.name().to_string()),
                source.size(),
                None,
            ),
            QuerySource::Template { id, .. } => (None, None, Some(id.clone())),
        };
        RequestSummary {
            spec_id: request.spec_id().to_string(),
            query_type,
            size,
            template_id,
            indices: request.indices().to_vec(),
            types: request.types().to_vec(),
            ratings: request.rated_documents().len(),
            relevant: request
                .rated_documents()
                .iter()
                .filter(|d| d.rating() > 0)
                .count(),
        }
    }
}

/// Result structure for validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub file: String,
    pub encoding: Encoding,
    pub requests: Vec<RequestSummary>,
}

/// Result structure for conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub input: String,
    pub output: String,
    pub from: Encoding,
    pub to: Encoding,
    pub requests: usize,
    pub bytes_in: usize,
    pub bytes_out: usize,
}

/// Something the CLI can print in human form.
pub trait HumanOutput {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()>;
}

impl HumanOutput for ValidationReport {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Validated {} ({})", self.file, self.encoding)?;
        writeln!(out, "══════════════════")?;
        for summary in &self.requests {
            writeln!(out)?;
            writeln!(out, "Request: {}", summary.spec_id)?;
            writeln!(out, "─────────────")?;
            if let Some(query_type) = &summary.query_type {
                writeln!(out, "Query: {query_type}")?;
            }
            if let Some(size) = summary.size {
                writeln!(out, "Size: {size}")?;
            }
            if let Some(template_id) = &summary.template_id {
                writeln!(out, "Template: {template_id}")?;
            }
            if !summary.indices.is_empty() {
                writeln!(out, "Indices: {}", summary.indices.join(", "))?;
            }
            if !summary.types.is_empty() {
                writeln!(out, "Types: {}", summary.types.join(", "))?;
            }
            writeln!(
                out,
                "Ratings: {} ({} relevant)",
                summary.ratings, summary.relevant
            )?;
        }
        Ok(())
    }
}

impl HumanOutput for ConversionReport {
    fn write_human<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "Converted {} ({}, {} bytes) -> {} ({}, {} bytes)",
            self.input, self.from, self.bytes_in, self.output, self.to, self.bytes_out
        )?;
        writeln!(out, "Requests: {}", self.requests)
    }
}

/// Write a result in the requested format.
pub fn write_result<W, T>(out: &mut W, result: &T, format: OutputFormat) -> Result<()>
where
    W: Write,
    T: Serialize + HumanOutput,
{
    match format {
        OutputFormat::Human => result.write_human(out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, result)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Print a result to stdout, honouring quiet mode for human output.
pub fn output_result<T: Serialize + HumanOutput>(result: &T, args: &RankEvalArgs) -> Result<()> {
    if args.verbosity() == 0 && args.output_format == OutputFormat::Human {
        return Ok(());
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, result, args.output_format)
}
