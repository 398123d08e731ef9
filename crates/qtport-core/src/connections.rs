//! `connect(...)` statement synthesis and placement.
//!
//! Each resolved binding becomes one statement inside a generated
//! `connectSignals()` member function, which is placed right after the first
//! constructor definition in the implementation file:
//!
//! ```text
//! void Toolkit::connectSignals()
//! {
//!     connect(button_ok, &QPushButton::clicked, this, &Toolkit::cb_ok);
//!     connect(choice_mode, QOverload<int>::of(&QComboBox::currentIndexChanged), this, &Toolkit::cb_mode);
//! }
//! ```
//!
//! `toggled` and `clicked` use a plain member pointer. Every other signal is
//! wrapped in `QOverload<int>::of`, including `textChanged`, whose Qt
//! signal carries a `QString`. The generated code is not checked.

use crate::edit::{line_ending, with_line_ending, StepOutcome, TextEdit};
use crate::error::PortResult;
use crate::lexer::{significant_tokens, Cursor, Token};
use crate::signals::ResolvedBinding;
use crate::tables::is_direct_signal;

/// Name of the generated member function.
pub const CONNECT_FUNCTION: &str = "connectSignals";

/// Receiving class used when none is configured and no constructor is found.
pub const DEFAULT_CLASS: &str = "QtToolkit";

/// Where the first constructor definition lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSite {
    /// Class named by `Class::Class(`.
    pub class: String,
    /// Byte offset just past the constructor body's closing brace.
    pub body_end: usize,
}

/// One `connect(...)` statement, indented by four spaces.
pub fn connection_statement(resolved: &ResolvedBinding, class: &str) -> String {
    let widget = &resolved.binding.widget;
    let method = &resolved.binding.callback;
    let kind = resolved.widget_kind;
    let signal = resolved.signal;
    if is_direct_signal(signal) {
        format!(
            "    connect({}, &{}::{}, this, &{}::{});",
            widget, kind, signal, class, method
        )
    } else {
        format!(
            "    connect({}, QOverload<int>::of(&{}::{}), this, &{}::{});",
            widget, kind, signal, class, method
        )
    }
}

/// Statements for all bindings, in binding order.
pub fn synthesize(resolved: &[ResolvedBinding], class: &str) -> Vec<String> {
    resolved
        .iter()
        .map(|r| connection_statement(r, class))
        .collect()
}

/// The complete `connectSignals()` definition, or `None` when there is
/// nothing to connect.
pub fn connect_function(class: &str, statements: &[String]) -> Option<String> {
    if statements.is_empty() {
        return None;
    }
    Some(format!(
        "\nvoid {}::{}()\n{{\n{}\n}}\n\n",
        class,
        CONNECT_FUNCTION,
        statements.join("\n")
    ))
}

const BODY_PRECEDERS: [&str; 2] = ["noexcept", "try"];

/// A `{` opens the constructor body unless it is a brace initializer in the
/// member initializer list (`member{value}`, `Base<T>{...}`).
fn opens_body(prev: &Token<'_>) -> bool {
    prev.is_punct(")")
        || prev.is_punct("}")
        || BODY_PRECEDERS.iter().any(|word| prev.is_ident(word))
}

fn match_constructor(
    tokens: &[Token<'_>],
    start: usize,
    class: Option<&str>,
) -> Option<ConstructorSite> {
    let mut cursor = Cursor::new(tokens, start);
    let owner = cursor.eat_any_ident()?;
    if class.is_some_and(|c| c != owner.text) {
        return None;
    }
    cursor.eat_punct("::")?;
    cursor.eat_ident(owner.text)?;
    let mut prev = cursor.eat_balanced("(", ")")?;

    loop {
        let tok = cursor.peek()?;
        if tok.is_punct(";") {
            return None;
        }
        if tok.is_punct("{") {
            let body = opens_body(&prev);
            let close = cursor.eat_balanced("{", "}")?;
            if body {
                return Some(ConstructorSite {
                    class: owner.text.to_string(),
                    body_end: close.span.end,
                });
            }
            prev = close;
        } else if tok.is_punct("(") {
            prev = cursor.eat_balanced("(", ")")?;
        } else {
            prev = cursor.bump()?;
        }
    }
}

/// Find the first constructor definition, optionally for a specific class.
///
/// Declarations (`Class::Class(...);`) are skipped. Bodies are matched with
/// balanced braces, so nested blocks inside the constructor are fine.
pub fn find_first_constructor(source: &str, class: Option<&str>) -> Option<ConstructorSite> {
    let tokens = significant_tokens(source);
    (0..tokens.len()).find_map(|i| match_constructor(&tokens, i, class))
}

/// Insert `function` after the constructor at `site`.
pub fn insert_connect_function(
    source: &str,
    function: Option<&str>,
    site: Option<&ConstructorSite>,
) -> PortResult<StepOutcome> {
    let Some(function) = function else {
        return Ok(StepOutcome::skipped(source, "no connections to insert"));
    };
    let Some(site) = site else {
        return Ok(StepOutcome::skipped(source, "no constructor definition found"));
    };
    StepOutcome::from_edits(
        source,
        vec![TextEdit::insert(
            site.body_end,
            with_line_ending(&format!("\n{}", function), line_ending(source)),
        )],
        "no constructor definition found",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::CallbackBinding;
    use crate::signals::resolve;
    use crate::tables::Tables;

    fn resolved(widget: &str, callback: &str) -> ResolvedBinding {
        let binding = CallbackBinding {
            widget: widget.to_string(),
            callback: callback.to_string(),
            line: 1,
        };
        resolve(&binding, &Tables::standard())
    }

    #[test]
    fn direct_form_for_clicked_and_toggled() {
        assert_eq!(
            connection_statement(&resolved("submitBtn", "cb_onSubmit"), "Form"),
            "    connect(submitBtn, &QPushButton::clicked, this, &Form::cb_onSubmit);"
        );
        assert_eq!(
            connection_statement(&resolved("checkBox", "cb_toggle"), "Form"),
            "    connect(checkBox, &QCheckBox::toggled, this, &Form::cb_toggle);"
        );
    }

    #[test]
    fn overload_form_for_parameterized_signals() {
        assert_eq!(
            connection_statement(&resolved("comboChoice", "cb_pick"), "Form"),
            "    connect(comboChoice, QOverload<int>::of(&QComboBox::currentIndexChanged), this, &Form::cb_pick);"
        );
        assert_eq!(
            connection_statement(&resolved("input_count", "cb_count"), "Form"),
            "    connect(input_count, QOverload<int>::of(&QSpinBox::textChanged), this, &Form::cb_count);"
        );
    }

    #[test]
    fn empty_statement_list_has_no_function() {
        assert_eq!(connect_function("Form", &[]), None);
    }

    #[test]
    fn function_layout() {
        let statements = vec!["    a;".to_string(), "    b;".to_string()];
        let function = connect_function("Form", &statements).unwrap();
        assert_eq!(function, "\nvoid Form::connectSignals()\n{\n    a;\n    b;\n}\n\n");
    }

    #[test]
    fn constructor_with_nested_blocks_and_initializers() {
        let source = "Form::Form(int x) : Base(x), m{1}, n(Foo{2})\n{\n    if (x) { go(); }\n}\nvoid Form::other() {}\n";
        let site = find_first_constructor(source, None).unwrap();
        assert_eq!(site.class, "Form");
        assert_eq!(
            &source[..site.body_end],
            "Form::Form(int x) : Base(x), m{1}, n(Foo{2})\n{\n    if (x) { go(); }\n}"
        );
    }

    #[test]
    fn declarations_and_other_classes_are_skipped() {
        let source = "Form::Form();\nOther::Other() {}\nForm::Form() { init(); }\n";
        let site = find_first_constructor(source, Some("Form")).unwrap();
        assert_eq!(site.body_end, source.len() - 1);
        let first = find_first_constructor(source, None).unwrap();
        assert_eq!(first.class, "Other");
    }

    #[test]
    fn insert_after_constructor() {
        let source = "A::A()\n{\n}\n\nvoid A::f() {}\n";
        let site = find_first_constructor(source, None);
        let function = connect_function("A", &["    x;".to_string()]);
        let outcome = insert_connect_function(source, function.as_deref(), site.as_ref()).unwrap();
        assert_eq!(
            outcome.text,
            "A::A()\n{\n}\n\nvoid A::connectSignals()\n{\n    x;\n}\n\n\n\nvoid A::f() {}\n"
        );
    }

    #[test]
    fn insert_keeps_crlf_line_endings() {
        let source = "A::A()\r\n{\r\n}\r\n";
        let site = find_first_constructor(source, None);
        let function = connect_function("A", &["    x;".to_string()]);
        let outcome = insert_connect_function(source, function.as_deref(), site.as_ref()).unwrap();
        assert_eq!(
            outcome.text,
            "A::A()\r\n{\r\n}\r\n\r\nvoid A::connectSignals()\r\n{\r\n    x;\r\n}\r\n\r\n\r\n"
        );
        assert!(!outcome.text.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn missing_constructor_is_a_skip() {
        let function = connect_function("A", &["    x;".to_string()]);
        let outcome = insert_connect_function("int main() {}", function.as_deref(), None).unwrap();
        assert_eq!(outcome.text, "int main() {}");
        assert!(!outcome.status.is_applied());
    }
}
