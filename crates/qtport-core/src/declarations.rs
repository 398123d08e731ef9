//! Callback declaration conversion and the `public slots:` section.
//!
//! FLTK callbacks are declared as static trampolines:
//!
//! ```text
//! static void cb_save(Fl_Widget *, void *);
//! ```
//!
//! Qt slots are ordinary member functions:
//!
//! ```text
//! void cb_save();
//! ```

use crate::edit::{line_ending, with_line_ending, Span, StepOutcome, TextEdit};
use crate::error::PortResult;
use crate::lexer::{significant_tokens, Cursor, Token};

/// Text inserted after the first `public:` marker.
const SLOTS_MARKER: &str = "\n\npublic slots:";

/// Match `static void <prefix>name(Fl_Widget *[a], void *[b]);` at `start`.
///
/// Returns the callback name and the span of the whole declaration.
fn match_static_callback<'s>(
    tokens: &[Token<'s>],
    start: usize,
    prefix: &str,
) -> Option<(&'s str, Span, usize)> {
    let mut cursor = Cursor::new(tokens, start);
    let first = cursor.eat_ident("static")?;
    cursor.eat_ident("void")?;
    let name = cursor.eat_callback_name(prefix)?;
    cursor.eat_punct("(")?;
    cursor.eat_ident("Fl_Widget")?;
    cursor.eat_punct("*")?;
    let _ = cursor.eat_any_ident();
    cursor.eat_punct(",")?;
    cursor.eat_ident("void")?;
    cursor.eat_punct("*")?;
    let _ = cursor.eat_any_ident();
    cursor.eat_punct(")")?;
    let semi = cursor.eat_punct(";")?;
    Some((name.text, first.span.join(&semi.span), cursor.pos()))
}

/// Rewrite static callback declarations to parameterless member functions.
pub fn convert_callback_declarations(source: &str, prefix: &str) -> PortResult<StepOutcome> {
    let tokens = significant_tokens(source);
    let mut edits = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match match_static_callback(&tokens, i, prefix) {
            Some((name, span, next)) => {
                edits.push(TextEdit::replace(span, format!("void {}();", name)));
                i = next;
            }
            None => i += 1,
        }
    }
    StepOutcome::from_edits(source, edits, "no static callback declarations")
}

/// Position of the first general-visibility marker (`public:`), as the span
/// of its colon.
fn first_public_marker(tokens: &[Token<'_>]) -> Option<Span> {
    tokens
        .windows(2)
        .find(|pair| pair[0].is_ident("public") && pair[1].is_punct(":"))
        .map(|pair| pair[1].span)
}

/// True if a slots-visibility marker (`public slots:`) already exists.
fn has_slots_section(tokens: &[Token<'_>]) -> bool {
    tokens.windows(3).any(|w| {
        w[0].is_ident("public")
            && (w[1].is_ident("slots") || w[1].is_ident("Q_SLOTS"))
            && w[2].is_punct(":")
    })
}

/// Insert `public slots:` after the first `public:` unless a slots section
/// already exists. Applying this twice gives the same text as applying it once.
pub fn insert_slots_section(source: &str) -> PortResult<StepOutcome> {
    let tokens = significant_tokens(source);
    if has_slots_section(&tokens) {
        return Ok(StepOutcome::skipped(source, "slots section already present"));
    }
    let Some(colon) = first_public_marker(&tokens) else {
        return Ok(StepOutcome::skipped(source, "no public section"));
    };
    StepOutcome::from_edits(
        source,
        vec![TextEdit::insert(
            colon.end,
            with_line_ending(SLOTS_MARKER, line_ending(source)),
        )],
        "no public section",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "class Toolkit : public Window\n{\npublic:\n    Toolkit();\n    static void cb_save(Fl_Widget *, void *);\n    static void cb_load(Fl_Widget *w, void *data);\n    static void helper(Fl_Widget *, void *);\n};\n";

    #[test]
    fn static_callbacks_become_slots() {
        let outcome = convert_callback_declarations(HEADER, "cb_").unwrap();
        assert!(outcome.text.contains("    void cb_save();\n"));
        assert!(outcome.text.contains("    void cb_load();\n"));
        assert!(outcome.text.contains("static void helper(Fl_Widget *, void *);"));
        assert_eq!(outcome.status, crate::edit::StepStatus::Applied { edits: 2 });
    }

    #[test]
    fn multi_line_declaration_is_matched() {
        let source = "static void cb_go(\n    Fl_Widget * /* w */,\n    void *\n);";
        let outcome = convert_callback_declarations(source, "cb_").unwrap();
        assert_eq!(outcome.text, "void cb_go();");
    }

    #[test]
    fn custom_prefix() {
        let source = "static void on_click(Fl_Widget *, void *);";
        let outcome = convert_callback_declarations(source, "on_").unwrap();
        assert_eq!(outcome.text, "void on_click();");
        let untouched = convert_callback_declarations(source, "cb_").unwrap();
        assert_eq!(untouched.text, source);
    }

    #[test]
    fn slots_inserted_after_first_public_only() {
        let source = "class A : public B {\npublic:\n    A();\npublic:\n    int x;\n};";
        let outcome = insert_slots_section(source).unwrap();
        assert_eq!(
            outcome.text,
            "class A : public B {\npublic:\n\npublic slots:\n    A();\npublic:\n    int x;\n};"
        );
    }

    #[test]
    fn slots_insertion_is_idempotent() {
        let source = "class A {\npublic:\n    void cb_x();\n};";
        let once = insert_slots_section(source).unwrap().text;
        let twice = insert_slots_section(&once).unwrap();
        assert_eq!(twice.text, once);
        assert!(!twice.status.is_applied());
    }

    #[test]
    fn slots_marker_uses_crlf_for_crlf_input() {
        let source = "class A {\r\npublic:\r\n    A();\r\n};\r\n";
        let outcome = insert_slots_section(source).unwrap();
        assert_eq!(
            outcome.text,
            "class A {\r\npublic:\r\n\r\npublic slots:\r\n    A();\r\n};\r\n"
        );
    }

    #[test]
    fn no_public_section_is_a_skip() {
        let source = "struct S { int x; };";
        let outcome = insert_slots_section(source).unwrap();
        assert_eq!(outcome.text, source);
        assert!(!outcome.status.is_applied());
    }
}
