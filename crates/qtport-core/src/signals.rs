//! Signal inference from widget naming conventions.
//!
//! FLTK registrations do not say what kind of widget they are attached to,
//! so the kind and the signal are guessed from the widget identifier. Two
//! passes run in sequence:
//!
//! 1. **Kind guess**: substring tests on the lowercased identifier pick a Qt
//!    kind (falling back to `QPushButton`), and the signal table supplies
//!    that kind's default signal.
//! 2. **Keyword override**: a second, simpler set of substring tests may
//!    replace the signal, whatever kind pass 1 chose.
//!
//! The passes test different substrings in different orders and can
//! disagree. `value_input` is guessed to be a `QSpinBox`, yet its signal is
//! overridden to `textChanged`. That disagreement is kept as is: the kind
//! still names the class in the member pointer, the signal comes from the
//! override.

use serde::Serialize;

use crate::callbacks::CallbackBinding;
use crate::tables::{Tables, FALLBACK_KIND};

/// A binding plus the kind and signal it will be connected with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBinding {
    #[serde(flatten)]
    pub binding: CallbackBinding,
    pub widget_kind: &'static str,
    pub signal: &'static str,
}

/// Pass 1: guess the Qt kind of a widget from its identifier.
pub fn guess_widget_kind(widget: &str) -> &'static str {
    let name = widget.to_lowercase();
    let has = |needle: &str| name.contains(needle);

    if has("button") && !has("check") {
        "QPushButton"
    } else if has("check") {
        "QCheckBox"
    } else if has("radio") {
        "QRadioButton"
    } else if has("choice") || has("combo") {
        "QComboBox"
    } else if has("input") && !has("text") {
        "QSpinBox"
    } else if has("input") || has("edit") {
        "QLineEdit"
    } else if has("editor") {
        // Unreachable in practice: "editor" already contains "edit".
        "QTextEdit"
    } else if has("box") || has("label") {
        "QLabel"
    } else {
        FALLBACK_KIND
    }
}

/// Pass 2: keyword override for the signal, independent of pass 1.
pub fn keyword_signal(widget: &str) -> Option<&'static str> {
    let name = widget.to_lowercase();
    let has = |needle: &str| name.contains(needle);

    if has("check") {
        Some("toggled")
    } else if has("choice") || has("combo") {
        Some("currentIndexChanged")
    } else if has("input") && !has("button") {
        Some("textChanged")
    } else if has("button") {
        Some("clicked")
    } else {
        None
    }
}

/// Run both passes: `(kind, signal)` for a widget identifier.
pub fn infer(widget: &str, tables: &Tables) -> (&'static str, &'static str) {
    let kind = guess_widget_kind(widget);
    let signal = keyword_signal(widget).unwrap_or_else(|| tables.signal_for(kind));
    (kind, signal)
}

/// Resolve one binding.
pub fn resolve(binding: &CallbackBinding, tables: &Tables) -> ResolvedBinding {
    let (widget_kind, signal) = infer(&binding.widget, tables);
    ResolvedBinding {
        binding: binding.clone(),
        widget_kind,
        signal,
    }
}

/// Resolve every binding, keeping order and duplicates.
pub fn resolve_all(bindings: &[CallbackBinding], tables: &Tables) -> Vec<ResolvedBinding> {
    bindings.iter().map(|b| resolve(b, tables)).collect()
}
