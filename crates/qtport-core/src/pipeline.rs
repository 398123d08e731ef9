//! Conversion pipelines for headers and implementation files.
//!
//! Header path:
//!
//! 1. include rewriting
//! 2. widget type replacement
//! 3. callback declaration conversion
//! 4. `public slots:` insertion
//! 5. `Q_OBJECT` injection
//!
//! Implementation path:
//!
//! 1. include rewriting
//! 2. callback extraction and signal inference
//! 3. `connect` synthesis
//! 4. trampoline removal
//! 5. `connectSignals()` insertion after the first constructor
//!
//! A step that finds nothing to do is recorded as skipped and the pipeline
//! carries on. Only internal edit conflicts abort a conversion.

use serde::Serialize;
use tracing::{debug, warn};

use crate::annotation::inject_object_marker;
use crate::callbacks::extract_callbacks;
use crate::connections::{
    connect_function, find_first_constructor, insert_connect_function, synthesize, DEFAULT_CLASS,
};
use crate::declarations::{convert_callback_declarations, insert_slots_section};
use crate::edit::{StepOutcome, StepStatus};
use crate::error::PortResult;
use crate::includes::rewrite_includes;
use crate::signals::{resolve_all, ResolvedBinding};
use crate::tables::Tables;
use crate::widget_types::{replace_widget_types, widget_declarations, WidgetDeclaration};
use crate::wrappers::remove_trampolines;

/// Default prefix identifying callback names.
pub const DEFAULT_CALLBACK_PREFIX: &str = "cb_";

/// Caller-supplied knobs for a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Receiving class for `&Class::method` and `Class::connectSignals()`.
    /// When unset, the class of the first constructor definition is used.
    pub class_name: Option<String>,
    /// Prefix that marks callback names (`cb_` by default).
    pub callback_prefix: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            class_name: None,
            callback_prefix: DEFAULT_CALLBACK_PREFIX.to_string(),
        }
    }
}

/// Status of one named pipeline step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: &'static str,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// The text being converted plus everything discovered along the way.
///
/// Created fresh for each conversion and dropped once the output is written.
#[derive(Debug, Clone)]
pub struct ConversionUnit {
    pub text: String,
    pub bindings: Vec<ResolvedBinding>,
    pub steps: Vec<StepRecord>,
    /// Receiving class used for `connect` statements (implementation only).
    pub class_name: Option<String>,
}

impl ConversionUnit {
    fn new(source: &str) -> Self {
        ConversionUnit {
            text: source.to_string(),
            bindings: Vec::new(),
            steps: Vec::new(),
            class_name: None,
        }
    }

    fn run(
        &mut self,
        step: &'static str,
        apply: impl FnOnce(&str) -> PortResult<StepOutcome>,
    ) -> PortResult<()> {
        let outcome = apply(&self.text)?;
        match &outcome.status {
            StepStatus::Applied { edits } => debug!(step, edits, "step applied"),
            StepStatus::Skipped { reason } => debug!(step, %reason, "step skipped"),
        }
        self.text = outcome.text;
        self.steps.push(StepRecord {
            step,
            status: outcome.status,
        });
        Ok(())
    }

    /// Number of `connect` statements synthesized.
    pub fn connections(&self) -> usize {
        self.bindings.len()
    }

    /// Status of a step by name.
    pub fn step(&self, name: &str) -> Option<&StepStatus> {
        self.steps
            .iter()
            .find(|record| record.step == name)
            .map(|record| &record.status)
    }
}

/// Convert an FLTK header to Qt.
pub fn convert_header(
    source: &str,
    tables: &Tables,
    options: &ConvertOptions,
) -> PortResult<ConversionUnit> {
    let prefix = options.callback_prefix.as_str();
    let mut unit = ConversionUnit::new(source);
    unit.run("includes", rewrite_includes)?;
    unit.run("widget-types", |text| replace_widget_types(text, tables))?;
    unit.run("declarations", |text| {
        convert_callback_declarations(text, prefix)
    })?;
    unit.run("slots-section", insert_slots_section)?;
    unit.run("object-marker", inject_object_marker)?;
    Ok(unit)
}

/// Convert an FLTK implementation file to Qt.
pub fn convert_impl(
    source: &str,
    tables: &Tables,
    options: &ConvertOptions,
) -> PortResult<ConversionUnit> {
    let prefix = options.callback_prefix.as_str();
    let mut unit = ConversionUnit::new(source);
    unit.run("includes", rewrite_includes)?;

    let bindings = extract_callbacks(&unit.text, prefix);
    unit.bindings = resolve_all(&bindings, tables);
    debug!(bindings = unit.bindings.len(), "callbacks extracted");

    unit.run("trampolines", |text| remove_trampolines(text, prefix))?;

    let site = find_first_constructor(&unit.text, options.class_name.as_deref());
    let class = options
        .class_name
        .clone()
        .or_else(|| site.as_ref().map(|s| s.class.clone()))
        .unwrap_or_else(|| DEFAULT_CLASS.to_string());

    let statements = synthesize(&unit.bindings, &class);
    let function = connect_function(&class, &statements);
    if function.is_some() && site.is_none() {
        warn!(class = %class, "no constructor definition found; connectSignals() was not inserted");
    }
    unit.run("connect-function", |text| {
        insert_connect_function(text, function.as_deref(), site.as_ref())
    })?;
    unit.class_name = Some(class);
    Ok(unit)
}

/// Bindings and widget declarations found in a file, without converting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub bindings: Vec<ResolvedBinding>,
    pub widgets: Vec<WidgetDeclaration>,
}

/// Report what a conversion would work with.
pub fn analyze(source: &str, tables: &Tables, options: &ConvertOptions) -> Analysis {
    let bindings = extract_callbacks(source, &options.callback_prefix);
    Analysis {
        bindings: resolve_all(&bindings, tables),
        widgets: widget_declarations(source, tables),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(source: &str) -> ConversionUnit {
        convert_header(source, &Tables::standard(), &ConvertOptions::default()).unwrap()
    }

    fn implementation(source: &str) -> ConversionUnit {
        convert_impl(source, &Tables::standard(), &ConvertOptions::default()).unwrap()
    }

    #[test]
    fn header_steps_run_in_order() {
        let unit = header("class A : public QWidget {\npublic:\n    Fl_Button *b;\n};\n");
        let names: Vec<&str> = unit.steps.iter().map(|s| s.step).collect();
        assert_eq!(
            names,
            vec!["includes", "widget-types", "declarations", "slots-section", "object-marker"]
        );
        assert!(unit.text.contains("QPushButton *b;"));
        assert!(unit.text.contains("public slots:"));
        assert!(unit.text.contains("Q_OBJECT"));
    }

    #[test]
    fn impl_without_registrations_has_no_connect_function() {
        let unit = implementation("#include \"a.h\"\nA::A() {}\n");
        assert_eq!(unit.connections(), 0);
        assert!(!unit.text.contains("connectSignals"));
        assert_eq!(
            unit.step("connect-function"),
            Some(&StepStatus::Skipped {
                reason: "no connections to insert".to_string()
            })
        );
    }

    #[test]
    fn class_comes_from_constructor() {
        let unit = implementation("Panel::Panel()\n{\n    ok_button->callback(cb_ok, this);\n}\n");
        assert_eq!(unit.class_name.as_deref(), Some("Panel"));
        assert!(unit
            .text
            .contains("connect(ok_button, &QPushButton::clicked, this, &Panel::cb_ok);"));
    }

    #[test]
    fn explicit_class_wins() {
        let options = ConvertOptions {
            class_name: Some("Main".to_string()),
            ..ConvertOptions::default()
        };
        let source = "Other::Other() {}\nMain::Main() { b->callback(cb_b, this); }\n";
        let unit = convert_impl(source, &Tables::standard(), &options).unwrap();
        let ctor = unit.text.find("Main::Main()").unwrap();
        let function = unit.text.find("void Main::connectSignals()").unwrap();
        assert!(ctor < function);
    }

    #[test]
    fn missing_constructor_still_counts_connections() {
        let unit = implementation("void setup() { b->callback(cb_b, this); }\n");
        assert_eq!(unit.connections(), 1);
        assert_eq!(unit.class_name.as_deref(), Some(DEFAULT_CLASS));
        assert!(!unit.text.contains("connectSignals"));
    }

    #[test]
    fn registrations_in_raw_strings_are_not_connected() {
        let unit = implementation(
            "A::A() {\n  const char *s = R\"(line\nb->callback(cb_x, this);\n)\";\n}\n",
        );
        assert_eq!(unit.connections(), 0);
        assert!(!unit.text.contains("connectSignals"));
    }

    #[test]
    fn analysis_lists_bindings_and_widgets() {
        let analysis = analyze(
            "Fl_Check_Button *check_a;\nFl_Scroll *pane;\ncheck_a->callback(cb_a, this);\n",
            &Tables::standard(),
            &ConvertOptions::default(),
        );
        assert_eq!(analysis.bindings.len(), 1);
        assert_eq!(analysis.bindings[0].signal, "toggled");
        assert_eq!(analysis.widgets.len(), 2);
        assert_eq!(analysis.widgets[1].target_display(), "Unknown");
    }
}
