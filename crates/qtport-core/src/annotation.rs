//! `Q_OBJECT` injection for classes deriving from a Qt type.

use crate::edit::{line_ending, with_line_ending, StepOutcome, TextEdit};
use crate::error::PortResult;
use crate::lexer::{significant_tokens, Cursor, Token};

/// The object-model marker required by Qt's signal/slot machinery.
pub const OBJECT_MARKER: &str = "Q_OBJECT";

/// Qt class names are `Q` followed by at least one more character.
fn is_qt_type(name: &str) -> bool {
    name.len() > 1 && name.starts_with('Q')
}

const BASE_SPECIFIERS: [&str; 4] = ["public", "protected", "private", "virtual"];

/// Match `class Name [final] : <bases> {` at `start` where some base is a
/// Qt type. Returns the byte offset just past the opening brace.
///
/// Only the name that starts each base specifier counts, so template
/// arguments (`std::vector<QString>`) never make a class a Qt class.
fn match_qt_class(tokens: &[Token<'_>], start: usize) -> Option<usize> {
    let mut cursor = Cursor::new(tokens, start);
    cursor.eat_ident("class")?;
    cursor.eat_any_ident()?;
    let _ = cursor.eat_ident("final");
    cursor.eat_punct(":")?;

    let mut qt_base = false;
    let mut angle_depth = 0usize;
    let mut base_start = true;
    loop {
        let tok = cursor.bump()?;
        if angle_depth == 0 {
            if tok.is_punct("{") {
                return qt_base.then_some(tok.span.end);
            }
            if tok.is_punct(";") {
                return None;
            }
            if tok.is_punct(",") {
                base_start = true;
                continue;
            }
        }
        if tok.is_punct("<") {
            angle_depth += 1;
        } else if tok.is_punct(">") {
            angle_depth = angle_depth.saturating_sub(1);
        } else if base_start && tok.is_any_ident() {
            if BASE_SPECIFIERS.contains(&tok.text) {
                continue;
            }
            qt_base |= is_qt_type(tok.text);
        }
        base_start = false;
    }
}

/// Insert `Q_OBJECT` as the first line of the first Qt-derived class body.
///
/// Does nothing if the marker appears anywhere in the text already, so
/// running this twice gives the same result as running it once. A file with
/// several qualifying classes only gets the marker in the first one.
pub fn inject_object_marker(source: &str) -> PortResult<StepOutcome> {
    if source.contains(OBJECT_MARKER) {
        return Ok(StepOutcome::skipped(source, "Q_OBJECT already present"));
    }
    let tokens = significant_tokens(source);
    let insert_at = (0..tokens.len()).find_map(|i| match_qt_class(&tokens, i));
    let edits = insert_at
        .map(|offset| {
            let marker = format!("\n    {}\n", OBJECT_MARKER);
            vec![TextEdit::insert(offset, with_line_ending(&marker, line_ending(source)))]
        })
        .unwrap_or_default();
    StepOutcome::from_edits(source, edits, "no class derived from a Qt type")
}
