//! Widget type replacement and widget declaration discovery.

use serde::Serialize;

use crate::edit::{StepOutcome, TextEdit};
use crate::error::PortResult;
use crate::lexer::significant_tokens;
use crate::tables::Tables;

/// Rewrite pointer-typed uses of mapped FLTK kinds to their Qt kinds.
///
/// A kind name is rewritten only when it is a whole identifier token
/// immediately followed by `*`, so `Fl_Button *b` becomes `QPushButton *b`
/// while `Fl_Button_Group *g`, `new Fl_Button(...)` and unmapped kinds such
/// as `Fl_Widget *` stay byte-identical. Spacing around the `*` is preserved.
pub fn replace_widget_types(source: &str, tables: &Tables) -> PortResult<StepOutcome> {
    let tokens = significant_tokens(source);
    let edits: Vec<TextEdit> = tokens
        .windows(2)
        .filter(|pair| pair[0].is_any_ident() && pair[1].is_punct("*"))
        .filter_map(|pair| {
            tables
                .target_kind(pair[0].text)
                .map(|target| TextEdit::replace(pair[0].span, target))
        })
        .collect();

    StepOutcome::from_edits(source, edits, "no pointer declarations of mapped FLTK kinds")
}

/// A declared FLTK widget member or variable: `Fl_Kind *name;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetDeclaration {
    pub name: String,
    pub source_kind: String,
    /// Qt kind, or `None` when the FLTK kind is not in the table.
    pub target_kind: Option<String>,
}

impl WidgetDeclaration {
    /// Target kind for display, `Unknown` when unmapped.
    pub fn target_display(&self) -> &str {
        self.target_kind.as_deref().unwrap_or("Unknown")
    }
}

/// Find `Fl_Kind *name;` declarations in source order.
pub fn widget_declarations(source: &str, tables: &Tables) -> Vec<WidgetDeclaration> {
    significant_tokens(source)
        .windows(4)
        .filter(|w| {
            w[0].is_any_ident()
                && w[0].text.starts_with("Fl_")
                && w[1].is_punct("*")
                && w[2].is_any_ident()
                && w[3].is_punct(";")
        })
        .map(|w| WidgetDeclaration {
            name: w[2].text.to_string(),
            source_kind: w[0].text.to_string(),
            target_kind: tables.target_kind(w[0].text).map(str::to_string),
        })
        .collect()
}
