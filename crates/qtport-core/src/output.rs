//! Report types for CLI responses, as JSON or plain text.
//!
//! Every JSON response carries `status` first and a `schema_version`, and
//! serializes deterministically (bindings and steps keep pipeline order).
//! The text renderings are what a person running the tool by hand sees.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::callbacks::CallbackBinding;
use crate::error::{OutputErrorCode, PortError};
use crate::pipeline::{Analysis, ConversionUnit, StepRecord};
use crate::signals::ResolvedBinding;
use crate::widget_types::WidgetDeclaration;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

/// SHA-256 of text content, hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Analyze
// ============================================================================

/// Response for `analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub schema_version: String,
    pub file: String,
    pub bindings: Vec<ResolvedBinding>,
    pub widgets: Vec<WidgetDeclaration>,
}

impl AnalyzeResponse {
    pub fn new(file: impl Into<String>, analysis: Analysis) -> Self {
        AnalyzeResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            file: file.into(),
            bindings: analysis.bindings,
            widgets: analysis.widgets,
        }
    }

    pub fn write_text(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "\n=== Analyzing {} ===\n", self.file)?;
        writeln!(w, "Found {} callback registrations:\n", self.bindings.len())?;
        for resolved in &self.bindings {
            let CallbackBinding {
                widget, callback, ..
            } = &resolved.binding;
            writeln!(
                w,
                "  {} -> {}  ({}::{})",
                widget, callback, resolved.widget_kind, resolved.signal
            )?;
        }
        writeln!(
            w,
            "\nFound {} FLTK widget declarations:\n",
            self.widgets.len()
        )?;
        for decl in &self.widgets {
            writeln!(
                w,
                "  {}: {} -> {}",
                decl.name,
                decl.source_kind,
                decl.target_display()
            )?;
        }
        writeln!(w)
    }
}

// ============================================================================
// Convert
// ============================================================================

/// Which pipeline produced a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    Header,
    Implementation,
}

/// Response for `convert-header` and `convert-impl`.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResponse {
    pub status: String,
    pub schema_version: String,
    pub kind: ConversionKind,
    pub input: String,
    pub output: String,
    /// Number of `connect` statements synthesized (always 0 for headers).
    pub connections: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub steps: Vec<StepRecord>,
    pub input_hash: ContentHash,
    pub output_hash: ContentHash,
    /// False when the output is byte-identical to the input.
    pub changed: bool,
}

impl ConvertResponse {
    pub fn new(
        kind: ConversionKind,
        input: impl Into<String>,
        output: impl Into<String>,
        source: &str,
        unit: &ConversionUnit,
    ) -> Self {
        ConvertResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            kind,
            input: input.into(),
            output: output.into(),
            connections: unit.connections(),
            class_name: unit.class_name.clone(),
            steps: unit.steps.clone(),
            input_hash: ContentHash::compute(source.as_bytes()),
            output_hash: ContentHash::compute(unit.text.as_bytes()),
            changed: source != unit.text,
        }
    }

    pub fn write_text(&self, w: &mut impl Write) -> io::Result<()> {
        match self.kind {
            ConversionKind::Header => {
                writeln!(w, "Converting header: {} -> {}", self.input, self.output)?;
                writeln!(w, "Header conversion complete!")
            }
            ConversionKind::Implementation => {
                writeln!(
                    w,
                    "Converting implementation: {} -> {}",
                    self.input, self.output
                )?;
                writeln!(w, "Implementation conversion complete!")?;
                writeln!(w, "Generated {} signal/slot connections", self.connections)
            }
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error details for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: u8,
    pub message: String,
}

impl ErrorInfo {
    pub fn from_error(err: &PortError) -> Self {
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
        }
    }
}

/// Response for any failed command.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn new(err: &PortError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Emit a response as pretty-printed JSON followed by a newline.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{analyze, convert_impl, ConvertOptions};
    use crate::tables::Tables;

    #[test]
    fn content_hash_is_sha256_hex() {
        let hash = ContentHash::compute(b"");
        assert_eq!(
            hash.to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn analyze_text_lists_everything() {
        let analysis = analyze(
            "Fl_Button *ok_button;\nok_button->callback(cb_ok, this);\n",
            &Tables::standard(),
            &ConvertOptions::default(),
        );
        let response = AnalyzeResponse::new("form.cpp", analysis);
        let mut out = Vec::new();
        response.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("=== Analyzing form.cpp ==="));
        assert!(text.contains("Found 1 callback registrations:"));
        assert!(text.contains("  ok_button -> cb_ok  (QPushButton::clicked)"));
        assert!(text.contains("  ok_button: Fl_Button -> QPushButton"));
    }

    #[test]
    fn convert_json_shape() {
        let source = "A::A() { b_button->callback(cb_b, this); }\n";
        let unit = convert_impl(source, &Tables::standard(), &ConvertOptions::default()).unwrap();
        let response =
            ConvertResponse::new(ConversionKind::Implementation, "a.cpp", "b.cpp", source, &unit);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["kind"], "implementation");
        assert_eq!(value["connections"], 1);
        assert_eq!(value["class_name"], "A");
        assert_eq!(value["changed"], true);
        assert_eq!(value["steps"][0]["step"], "includes");
        assert_eq!(value["steps"][0]["status"], "skipped");
        assert_eq!(value["steps"][2]["status"], "applied");
        assert_eq!(value["steps"][2]["edits"], 1);
    }

    #[test]
    fn error_response_carries_code() {
        let err = PortError::FileNotFound {
            path: "x.h".to_string(),
        };
        let mut out = Vec::new();
        emit_response(&ErrorResponse::new(&err), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"]["code"], 3);
    }
}
