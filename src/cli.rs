//! CLI front door.
//!
//! Each command reads one file, runs one pipeline, and writes its report to
//! the given writer:
//! - `analyze <file>` - list callback registrations and widget declarations
//! - `convert-header <input> <output>` - run the header pipeline
//! - `convert-impl <input> <output>` - run the implementation pipeline
//!
//! ## Error Handling
//!
//! All functions return `Result<T, PortError>`. Read and write failures are
//! errors; a conversion step that finds nothing to match is not.

use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use qtport_core::error::PortError;
use qtport_core::files::{read_source, write_output};
use qtport_core::output::{emit_response, AnalyzeResponse, ConversionKind, ConvertResponse};
use qtport_core::pipeline::{analyze, convert_header, convert_impl, ConvertOptions};
use qtport_core::tables::Tables;

/// Usage text printed when no command is given.
pub const USAGE: &str = "\
FLTK to Qt Callback Converter

Usage:
  qtport analyze <file>
  qtport convert-header <input.h> <output.h>
  qtport convert-impl <input.cpp> <output.cpp>

Examples:
  qtport analyze ../src/toolkit.cpp
  qtport convert-header ../inc/toolkit.h ../inc/toolkit_qt.h
  qtport convert-impl ../src/toolkit.cpp ../src/toolkit_qt.cpp
";

/// How reports are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Progress lines for humans.
    #[default]
    Text,
    /// One JSON response per command.
    Json,
}

fn stdout_error(err: io::Error) -> PortError {
    PortError::Io {
        path: "<stdout>".to_string(),
        message: err.to_string(),
    }
}

/// Report bindings and widget declarations in `file` without writing anything.
pub fn run_analyze(
    file: &Path,
    options: &ConvertOptions,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<AnalyzeResponse, PortError> {
    let source = read_source(file)?;
    let analysis = analyze(&source, &Tables::standard(), options);
    let response = AnalyzeResponse::new(file.display().to_string(), analysis);
    let rendered = match format {
        OutputFormat::Text => response.write_text(out),
        OutputFormat::Json => emit_response(&response, out),
    };
    rendered.map_err(stdout_error)?;
    Ok(response)
}

/// Convert an FLTK header and write the result to `output`.
pub fn run_convert_header(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<ConvertResponse, PortError> {
    run_convert(ConversionKind::Header, input, output, options, format, out)
}

/// Convert an FLTK implementation file and write the result to `output`.
pub fn run_convert_impl(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<ConvertResponse, PortError> {
    run_convert(
        ConversionKind::Implementation,
        input,
        output,
        options,
        format,
        out,
    )
}

fn run_convert(
    kind: ConversionKind,
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<ConvertResponse, PortError> {
    let source = read_source(input)?;
    let tables = Tables::standard();
    let unit = match kind {
        ConversionKind::Header => convert_header(&source, &tables, options)?,
        ConversionKind::Implementation => convert_impl(&source, &tables, options)?,
    };
    write_output(output, &unit.text)?;

    let response = ConvertResponse::new(
        kind,
        input.display().to_string(),
        output.display().to_string(),
        &source,
        &unit,
    );
    info!(
        input = %input.display(),
        output = %output.display(),
        connections = response.connections,
        "conversion complete"
    );
    let rendered = match format {
        OutputFormat::Text => response.write_text(out),
        OutputFormat::Json => emit_response(&response, out),
    };
    rendered.map_err(stdout_error)?;
    Ok(response)
}
