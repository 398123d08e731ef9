//! Callback registration extraction.
//!
//! Finds every `widget->callback(cb_name, this);` call site. The resulting
//! bindings drive everything downstream: one binding becomes one `connect`
//! statement, in source order, duplicates included. Registrations written
//! inside `#define` bodies count too.

use serde::Serialize;

use crate::lexer::{directive_tokens, tokenize, Cursor, Token, TokenKind};

/// One `widget->callback(name, this);` registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackBinding {
    /// Identifier immediately left of `->`.
    pub widget: String,
    /// Registered callback, also the name of the Qt slot method.
    pub callback: String,
    /// 1-indexed source line of the widget identifier.
    pub line: u32,
}

fn match_registration<'s>(
    tokens: &[Token<'s>],
    start: usize,
    prefix: &str,
) -> Option<(Token<'s>, Token<'s>, usize)> {
    let mut cursor = Cursor::new(tokens, start);
    let widget = cursor.eat_any_ident()?;
    cursor.eat_punct("->")?;
    cursor.eat_ident("callback")?;
    cursor.eat_punct("(")?;
    let callback = cursor.eat_callback_name(prefix)?;
    cursor.eat_punct(",")?;
    cursor.eat_ident("this")?;
    cursor.eat_punct(")")?;
    cursor.eat_punct(";")?;
    Some((widget, callback, cursor.pos()))
}

/// Significant tokens with `#define` bodies lexed in place.
fn registration_tokens(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for tok in tokenize(source) {
        if tok.kind == TokenKind::Directive {
            let body = directive_tokens(&tok);
            if body.first().is_some_and(|first| first.is_ident("define")) {
                tokens.extend(body);
            }
        } else if !tok.kind.is_trivia() {
            tokens.push(tok);
        }
    }
    tokens
}

/// Extract callback registrations in source order, without deduplication.
pub fn extract_callbacks(source: &str, prefix: &str) -> Vec<CallbackBinding> {
    let tokens = registration_tokens(source);
    let mut bindings = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match match_registration(&tokens, i, prefix) {
            Some((widget, callback, next)) => {
                bindings.push(CallbackBinding {
                    widget: widget.text.to_string(),
                    callback: callback.text.to_string(),
                    line: line_of(source, widget.span.start),
                });
                i = next;
            }
            None => i += 1,
        }
    }
    bindings
}

fn line_of(source: &str, offset: usize) -> u32 {
    let newlines = source.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    u32::try_from(newlines + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(bindings: &[CallbackBinding]) -> Vec<(&str, &str)> {
        bindings
            .iter()
            .map(|b| (b.widget.as_str(), b.callback.as_str()))
            .collect()
    }

    #[test]
    fn order_and_duplicates_are_preserved() {
        let source = "a->callback(cb_one, this);\nb->callback(cb_two, this);\na->callback(cb_one, this);\n";
        let bindings = extract_callbacks(source, "cb_");
        assert_eq!(
            pairs(&bindings),
            vec![("a", "cb_one"), ("b", "cb_two"), ("a", "cb_one")]
        );
        assert_eq!(
            bindings.iter().map(|b| b.line).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn formatting_variation_is_tolerated() {
        let source = "button_ok -> callback (\n    cb_ok , /* self */ this\n) ;";
        let bindings = extract_callbacks(source, "cb_");
        assert_eq!(pairs(&bindings), vec![("button_ok", "cb_ok")]);
    }

    #[test]
    fn chained_access_uses_last_identifier() {
        let bindings = extract_callbacks("ui->check_x->callback(cb_x, this);", "cb_");
        assert_eq!(pairs(&bindings), vec![("check_x", "cb_x")]);
    }

    #[test]
    fn registrations_in_raw_strings_are_ignored() {
        let source = "A::A() {\n  const char *s = R\"(line\nb->callback(cb_x, this);\n)\";\n}\n";
        assert!(extract_callbacks(source, "cb_").is_empty());
    }

    #[test]
    fn registrations_in_macro_bodies_are_found() {
        let source = "#include \"a.h\"\n#define REG(w) w->callback(cb_m, this);\nok->callback(cb_ok, this);\n";
        let bindings = extract_callbacks(source, "cb_");
        assert_eq!(pairs(&bindings), vec![("w", "cb_m"), ("ok", "cb_ok")]);
        assert_eq!(bindings[0].line, 2);
    }

    #[test]
    fn non_matching_shapes_are_ignored() {
        let source = concat!(
            "w->callback(cb_a, data);\n",
            "w->callback(other, this);\n",
            "w->callback(cb_b);\n",
            "w.callback(cb_c, this);\n",
            "// w->callback(cb_d, this);\n",
            "w->callback(cb_e, this)\n",
        );
        assert!(extract_callbacks(source, "cb_").is_empty());
    }
}
