//! Minimal C++ tokenizer for the rewrite steps.
//!
//! The rewriter never builds a syntax tree. It does need to find a handful of
//! constructs (declarations, call sites, class headers, function bodies)
//! reliably across formatting variation, and it must never rewrite text that
//! sits inside a comment or a string literal. Tokenizing first gives both:
//! steps match sequences of *significant* tokens and ignore trivia
//! (whitespace, newlines, comments) between them.
//!
//! ## Token Classes
//!
//! | Kind | Examples |
//! |------|----------|
//! | `Ident` | `Fl_Button`, `cb_save`, `this`, `public` |
//! | `Number` | `42`, `0xFF`, `1.5f` |
//! | `Str` / `Char` | `"text"`, `'c'` |
//! | `Directive` | `#include <FL/Fl.H>` (whole logical line) |
//! | `Punct` | `->`, `::`, `*`, `{` |
//! | trivia | whitespace, newlines, `//` and `/* */` comments |
//!
//! Tokenizing is total: a byte that starts no known token becomes a
//! one-character `Punct`, so every input yields a token stream whose spans
//! tile the source exactly.

use winnow::combinator::{alt, opt, preceded, repeat, terminated};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_until, take_while};
use winnow::ModalResult;

use crate::edit::Span;

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident,
    /// Numeric literal.
    Number,
    /// String literal (possibly unterminated at end of line).
    Str,
    /// Character literal.
    Char,
    /// Preprocessor directive, from `#` to the end of the logical line.
    Directive,
    /// Operator or punctuation. `->` and `::` are single tokens.
    Punct,
    /// Spaces and tabs.
    Whitespace,
    /// `\n` or `\r\n`.
    Newline,
    /// `// ...` up to (not including) the line terminator.
    LineComment,
    /// `/* ... */`.
    BlockComment,
}

impl TokenKind {
    /// Whitespace, newlines and comments.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }
}

/// A token with its source text and byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'s> {
    pub kind: TokenKind,
    pub text: &'s str,
    pub span: Span,
}

impl Token<'_> {
    /// True for an identifier token with exactly this text.
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == name
    }

    /// True for any identifier token.
    pub fn is_any_ident(&self) -> bool {
        self.kind == TokenKind::Ident
    }

    /// True for a punctuation token with exactly this text.
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }
}

/// Tokenize `source` into a gapless token stream, trivia included.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut input = source;
    let mut tokens = Vec::new();
    let mut line_start = true;

    while !input.is_empty() {
        let start = source.len() - input.len();
        let lexed = if line_start && input.starts_with('#') {
            directive.value(TokenKind::Directive).parse_next(&mut input)
        } else {
            token.parse_next(&mut input)
        };

        let kind = match lexed {
            Ok(kind) if input.len() < source.len() - start => kind,
            _ => {
                // No progress: emit the next character on its own.
                let rest = &source[start..];
                let width = rest.chars().next().map(char::len_utf8).unwrap_or(1);
                input = &rest[width..];
                TokenKind::Punct
            }
        };

        let end = source.len() - input.len();
        tokens.push(Token {
            kind,
            text: &source[start..end],
            span: Span::new(start, end),
        });

        line_start = match kind {
            TokenKind::Newline => true,
            TokenKind::Whitespace | TokenKind::BlockComment => line_start,
            _ => false,
        };
    }

    tokens
}

/// Tokenize and keep only significant (non-trivia) tokens.
pub fn significant_tokens(source: &str) -> Vec<Token<'_>> {
    tokenize(source)
        .into_iter()
        .filter(|tok| !tok.kind.is_trivia())
        .collect()
}

/// Significant tokens of a directive's body (everything after `#`), with
/// spans into the original source.
pub fn directive_tokens<'s>(directive: &Token<'s>) -> Vec<Token<'s>> {
    let body_start = directive.span.start + 1;
    significant_tokens(&directive.text[1..])
        .into_iter()
        .map(|tok| Token {
            span: Span::new(tok.span.start + body_start, tok.span.end + body_start),
            ..tok
        })
        .collect()
}

/// True if `name` is `prefix` followed by at least one more character.
pub fn has_callback_prefix(name: &str, prefix: &str) -> bool {
    name.len() > prefix.len() && name.starts_with(prefix)
}

// ============================================================================
// Cursor
// ============================================================================

/// Forward-only matcher over a slice of significant tokens.
///
/// Each `eat_*` method consumes one token when it matches and returns it,
/// leaving the cursor where it was otherwise. Steps chain them with `?`
/// inside a closure returning `Option`.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'t, 's> {
    tokens: &'t [Token<'s>],
    pos: usize,
}

impl<'t, 's> Cursor<'t, 's> {
    pub fn new(tokens: &'t [Token<'s>], pos: usize) -> Self {
        Cursor { tokens, pos }
    }

    /// Index of the next token.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<Token<'s>> {
        self.tokens.get(self.pos).copied()
    }

    /// Consume the next token unconditionally.
    pub fn bump(&mut self) -> Option<Token<'s>> {
        let tok = self.peek()?;
        self.pos += 1;
        Some(tok)
    }

    fn eat_if(&mut self, pred: impl FnOnce(&Token<'s>) -> bool) -> Option<Token<'s>> {
        let tok = self.peek()?;
        if pred(&tok) {
            self.pos += 1;
            Some(tok)
        } else {
            None
        }
    }

    pub fn eat_ident(&mut self, name: &str) -> Option<Token<'s>> {
        self.eat_if(|tok| tok.is_ident(name))
    }

    pub fn eat_any_ident(&mut self) -> Option<Token<'s>> {
        self.eat_if(Token::is_any_ident)
    }

    pub fn eat_punct(&mut self, punct: &str) -> Option<Token<'s>> {
        self.eat_if(|tok| tok.is_punct(punct))
    }

    /// Consume an identifier carrying the callback prefix.
    pub fn eat_callback_name(&mut self, prefix: &str) -> Option<Token<'s>> {
        self.eat_if(|tok| tok.is_any_ident() && has_callback_prefix(tok.text, prefix))
    }

    /// Skip tokens up to and including the one that balances the `open`
    /// token at the cursor, returning the closing token.
    pub fn eat_balanced(&mut self, open: &str, close: &str) -> Option<Token<'s>> {
        self.eat_punct(open)?;
        let mut depth = 1usize;
        while let Some(tok) = self.bump() {
            if tok.is_punct(open) {
                depth += 1;
            } else if tok.is_punct(close) {
                depth -= 1;
                if depth == 0 {
                    return Some(tok);
                }
            }
        }
        None
    }
}

// ============================================================================
// Token grammar
// ============================================================================

fn token(input: &mut &str) -> ModalResult<TokenKind> {
    alt((
        newline.value(TokenKind::Newline),
        whitespace.value(TokenKind::Whitespace),
        line_comment.value(TokenKind::LineComment),
        block_comment.value(TokenKind::BlockComment),
        raw_string.value(TokenKind::Str),
        identifier.value(TokenKind::Ident),
        number.value(TokenKind::Number),
        string_literal.value(TokenKind::Str),
        char_literal.value(TokenKind::Char),
        punct.value(TokenKind::Punct),
    ))
    .parse_next(input)
}

fn newline<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt(("\r\n", "\n")).parse_next(input)
}

fn whitespace<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., |c: char| matches!(c, ' ' | '\t' | '\r' | '\x0b' | '\x0c')).parse_next(input)
}

fn line_comment<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    ("//", take_till(0.., ['\r', '\n'])).take().parse_next(input)
}

fn block_comment<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    ("/*", take_until(0.., "*/"), "*/").take().parse_next(input)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn identifier<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (take_while(1, is_ident_start), take_while(0.., is_ident_continue))
        .take()
        .parse_next(input)
}

fn number<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        take_while(1, |c: char| c.is_ascii_digit()),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '.' || c == '\''
        }),
    )
        .take()
        .parse_next(input)
}

/// A backslash and the character it escapes.
fn escape<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    ('\\', opt(any)).take().parse_next(input)
}

/// `R"delim(` up to the opening parenthesis, with an optional encoding
/// prefix. Returns the delimiter.
fn raw_string_open<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    preceded(
        (opt(alt(("u8", "u", "U", "L"))), "R\""),
        terminated(
            take_till(0..=16, |c: char| {
                matches!(c, '(' | ')' | '"' | '\\') || c.is_whitespace()
            }),
            '(',
        ),
    )
    .parse_next(input)
}

/// Raw string literal `R"delim(...)delim"`, which may span lines and holds
/// no escapes. An unterminated one runs to the end of the text.
fn raw_string<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    let start = *input;
    let delim = raw_string_open(input)?;
    let close = format!("){}\"", delim);
    let rest = *input;
    let consumed = rest.find(&close).map_or(rest.len(), |pos| pos + close.len());
    *input = &rest[consumed..];
    Ok(&start[..start.len() - input.len()])
}

fn string_literal<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        '"',
        repeat::<_, _, (), _, _>(0.., alt((escape, take_till(1.., ['"', '\\', '\n'])))),
        opt('"'),
    )
        .take()
        .parse_next(input)
}

fn char_literal<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        '\'',
        repeat::<_, _, (), _, _>(0.., alt((escape, take_till(1.., ['\'', '\\', '\n'])))),
        opt('\''),
    )
        .take()
        .parse_next(input)
}

fn punct<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt(("->", "::", any.take())).parse_next(input)
}

/// Backslash-newline splice inside a directive.
fn line_continuation<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    ('\\', opt('\r'), '\n').take().parse_next(input)
}

fn directive<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        '#',
        repeat::<_, _, (), _, _>(
            0..,
            alt((line_continuation, take_till(1.., ['\r', '\n', '\\']), "\\")),
        ),
    )
        .take()
        .parse_next(input)
}
