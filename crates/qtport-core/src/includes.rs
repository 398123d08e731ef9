//! Include directive rewriting.
//!
//! FLTK headers (`<FL/...>`, any case of the `FL/` prefix) are removed line
//! by line. A fixed block of Qt includes goes in right after the first local
//! (`"..."`) include. Files without a local include get no Qt block; the
//! conversion still proceeds.

use tracing::warn;
use winnow::ascii::space0;
use winnow::combinator::{alt, delimited, preceded};
use winnow::prelude::*;
use winnow::token::take_till;
use winnow::ModalResult;

use crate::edit::{
    end_of_line, line_ending, start_of_line, with_line_ending, Span, StepOutcome, TextEdit,
};
use crate::error::PortResult;
use crate::lexer::{tokenize, TokenKind};

/// Qt headers injected after the first local include.
pub const QT_INCLUDES: &[&str] = &[
    "QApplication",
    "QMainWindow",
    "QWidget",
    "QPushButton",
    "QCheckBox",
    "QRadioButton",
    "QComboBox",
    "QSpinBox",
    "QLineEdit",
    "QTextEdit",
    "QLabel",
    "QGroupBox",
    "QTabWidget",
    "QVBoxLayout",
    "QHBoxLayout",
    "QGridLayout",
    "QMessageBox",
    "QFileDialog",
    "QClipboard",
];

/// How the included path is delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeForm {
    /// `#include <path>`
    Angle,
    /// `#include "path"`
    Quoted,
}

/// A parsed `#include` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeDirective<'s> {
    pub path: &'s str,
    pub form: IncludeForm,
}

impl IncludeDirective<'_> {
    /// True for FLTK headers: the path starts with `FL/` in any case.
    pub fn is_fltk(&self) -> bool {
        self.path
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("fl/"))
    }

    /// True for project-local includes.
    pub fn is_local(&self) -> bool {
        self.form == IncludeForm::Quoted
    }
}

/// Parse directive text such as `#include <FL/Fl.H>`.
///
/// Returns `None` for any other directive. Trailing text after the closing
/// delimiter (typically a comment) is ignored.
pub fn parse_include(directive: &str) -> Option<IncludeDirective<'_>> {
    let mut input = directive;
    include_directive.parse_next(&mut input).ok()
}

fn include_directive<'s>(input: &mut &'s str) -> ModalResult<IncludeDirective<'s>> {
    preceded(
        ('#', space0, "include", space0),
        alt((
            delimited('"', take_till(0.., '"'), '"').map(|path| IncludeDirective {
                path,
                form: IncludeForm::Quoted,
            }),
            delimited('<', take_till(0.., '>'), '>').map(|path| IncludeDirective {
                path,
                form: IncludeForm::Angle,
            }),
        )),
    )
    .parse_next(input)
}

/// The Qt include block, one directive per line.
pub fn qt_include_block() -> String {
    QT_INCLUDES
        .iter()
        .map(|header| format!("#include <{}>\n", header))
        .collect()
}

/// Remove FLTK includes and add the Qt block after the first local include.
pub fn rewrite_includes(source: &str) -> PortResult<StepOutcome> {
    let mut edits = Vec::new();
    let mut anchored = false;
    let newline = line_ending(source);

    for tok in tokenize(source) {
        if tok.kind != TokenKind::Directive {
            continue;
        }
        let Some(include) = parse_include(tok.text) else {
            continue;
        };

        if include.is_fltk() {
            let line = Span::new(
                start_of_line(source, tok.span.start),
                end_of_line(source, tok.span.end),
            );
            edits.push(TextEdit::delete(line));
        } else if include.is_local() && !anchored {
            anchored = true;
            let eol = end_of_line(source, tok.span.end);
            let lead = if source[..eol].ends_with('\n') { "" } else { "\n" };
            let block = format!("{}\n{}\n", lead, qt_include_block());
            edits.push(TextEdit::insert(eol, with_line_ending(&block, newline)));
        }
    }

    if !anchored {
        warn!("no local include found; Qt includes were not inserted");
    }

    StepOutcome::from_edits(source, edits, "no FLTK or local includes")
}
