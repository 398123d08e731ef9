//! Correspondence tables between FLTK and Qt.
//!
//! Two fixed mappings drive the whole conversion:
//!
//! - **widget kinds**: FLTK class name to Qt class name
//! - **signals**: Qt class name to the signal a callback is connected to
//!
//! The tables are plain data. Callers build them once with
//! [`Tables::standard`] and pass them by reference into every step; nothing
//! reads them from ambient globals and nothing mutates them during a run.

use std::collections::BTreeMap;

/// Widget kind that unknown identifiers resolve to.
pub const FALLBACK_KIND: &str = "QPushButton";

/// Signal used for any kind without its own signal row.
pub const FALLBACK_SIGNAL: &str = "clicked";

/// Signals that connect with a plain member pointer. Every other signal is
/// connected through `QOverload<int>::of(...)`.
pub const DIRECT_SIGNALS: [&str; 2] = ["toggled", "clicked"];

const WIDGET_KINDS: &[(&str, &str)] = &[
    ("Fl_Button", "QPushButton"),
    ("Fl_Check_Button", "QCheckBox"),
    ("Fl_Round_Button", "QRadioButton"),
    ("Fl_Choice", "QComboBox"),
    ("Fl_Choice_", "QComboBox"),
    ("Fl_Value_Input", "QSpinBox"),
    ("Fl_Input", "QLineEdit"),
    ("Fl_Input_", "QLineEdit"),
    ("Fl_Text_Editor", "QTextEdit"),
    ("Fl_Menu_Button", "QMenu"),
    ("Fl_Box", "QLabel"),
    ("Fl_Tabs", "QTabWidget"),
    ("Fl_Group", "QWidget"),
    ("Fl_Double_Window", "QMainWindow"),
    ("Fl_Window", "QDialog"),
];

const SIGNALS: &[(&str, &str)] = &[
    ("QPushButton", "clicked"),
    ("QCheckBox", "toggled"),
    ("QRadioButton", "toggled"),
    ("QComboBox", "currentIndexChanged"),
    ("QSpinBox", "valueChanged"),
    ("QLineEdit", "textChanged"),
    ("QTextEdit", "textChanged"),
];

/// Immutable FLTK/Qt correspondence data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    widget_kinds: BTreeMap<&'static str, &'static str>,
    signals: BTreeMap<&'static str, &'static str>,
}

impl Tables {
    /// The hand-curated FLTK to Qt tables.
    pub fn standard() -> Self {
        Tables {
            widget_kinds: WIDGET_KINDS.iter().copied().collect(),
            signals: SIGNALS.iter().copied().collect(),
        }
    }

    /// Qt kind for an FLTK kind, or `None` when the kind is not in the table.
    ///
    /// The type replacer leaves unmapped kinds alone, so this is the one
    /// lookup that may come back empty.
    pub fn target_kind(&self, source_kind: &str) -> Option<&'static str> {
        self.widget_kinds.get(source_kind).copied()
    }

    /// Default signal for a Qt kind. Always answers: kinds without a row
    /// resolve to [`FALLBACK_SIGNAL`].
    pub fn signal_for(&self, target_kind: &str) -> &'static str {
        self.signals
            .get(target_kind)
            .copied()
            .unwrap_or(FALLBACK_SIGNAL)
    }

    /// All `(source, target)` kind pairs, ordered by source name.
    pub fn widget_pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.widget_kinds.iter().map(|(k, v)| (*k, *v))
    }
}

/// True when `signal` is connected with a plain member pointer.
pub fn is_direct_signal(signal: &str) -> bool {
    DIRECT_SIGNALS.contains(&signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_kind_maps() {
        let tables = Tables::standard();
        assert_eq!(tables.target_kind("Fl_Button"), Some("QPushButton"));
        assert_eq!(tables.target_kind("Fl_Choice_"), Some("QComboBox"));
        assert_eq!(tables.target_kind("Fl_Double_Window"), Some("QMainWindow"));
        assert_eq!(tables.widget_pairs().count(), 15);
    }

    #[test]
    fn unknown_kind_is_unmapped() {
        let tables = Tables::standard();
        assert_eq!(tables.target_kind("Fl_Widget"), None);
        assert_eq!(tables.target_kind("fl_button"), None);
    }

    #[test]
    fn signal_lookup_is_total() {
        let tables = Tables::standard();
        assert_eq!(tables.signal_for("QCheckBox"), "toggled");
        assert_eq!(tables.signal_for("QComboBox"), "currentIndexChanged");
        assert_eq!(tables.signal_for("QLabel"), FALLBACK_SIGNAL);
        assert_eq!(tables.signal_for("NotAWidget"), FALLBACK_SIGNAL);
    }

    #[test]
    fn direct_signals() {
        assert!(is_direct_signal("clicked"));
        assert!(is_direct_signal("toggled"));
        assert!(!is_direct_signal("textChanged"));
        assert!(!is_direct_signal("valueChanged"));
    }
}
