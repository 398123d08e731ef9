//! Static trampoline removal.
//!
//! FLTK implementations forward each static callback to a member function:
//!
//! ```text
//! void Toolkit::cb_save(Fl_Widget *, void *w) { ((Toolkit *)w)->cb_save(); }
//! ```
//!
//! Once `connect` statements call the member function directly these
//! definitions are dead and are deleted, whatever their line layout.

use crate::edit::{swallow_blank_rest, Span, StepOutcome, TextEdit};
use crate::error::PortResult;
use crate::lexer::{significant_tokens, Cursor, Token};

/// Match a trampoline definition at `start`; returns its span and the index
/// of the next token.
fn match_trampoline(tokens: &[Token<'_>], start: usize, prefix: &str) -> Option<(Span, usize)> {
    let mut cursor = Cursor::new(tokens, start);
    let first = cursor.eat_ident("void")?;
    cursor.eat_any_ident()?;
    cursor.eat_punct("::")?;
    let name = cursor.eat_callback_name(prefix)?;

    // (Fl_Widget *[w], void *ctx)
    cursor.eat_punct("(")?;
    cursor.eat_ident("Fl_Widget")?;
    cursor.eat_punct("*")?;
    let _ = cursor.eat_any_ident();
    cursor.eat_punct(",")?;
    cursor.eat_ident("void")?;
    cursor.eat_punct("*")?;
    let context = cursor.eat_any_ident()?;
    cursor.eat_punct(")")?;

    // { ((Type *)ctx)->name(); }
    cursor.eat_punct("{")?;
    cursor.eat_punct("(")?;
    cursor.eat_punct("(")?;
    cursor.eat_any_ident()?;
    cursor.eat_punct("*")?;
    cursor.eat_punct(")")?;
    cursor.eat_ident(context.text)?;
    cursor.eat_punct(")")?;
    cursor.eat_punct("->")?;
    cursor.eat_ident(name.text)?;
    cursor.eat_punct("(")?;
    cursor.eat_punct(")")?;
    cursor.eat_punct(";")?;
    let close = cursor.eat_punct("}")?;

    Some((first.span.join(&close.span), cursor.pos()))
}

/// Delete every cast-and-forward trampoline definition.
pub fn remove_trampolines(source: &str, prefix: &str) -> PortResult<StepOutcome> {
    let tokens = significant_tokens(source);
    let mut edits = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match match_trampoline(&tokens, i, prefix) {
            Some((span, next)) => {
                let end = swallow_blank_rest(source, span.end);
                edits.push(TextEdit::delete(Span::new(span.start, end)));
                i = next;
            }
            None => i += 1,
        }
    }
    StepOutcome::from_edits(source, edits, "no callback trampolines")
}
