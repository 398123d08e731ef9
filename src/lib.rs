//! qtport: FLTK to Qt callback converter
//!
//! Rewrites FLTK callback registration code into Qt signal/slot code, one
//! header or implementation file at a time, working directly on source text.

// Engine - re-exported from qtport-core
pub use qtport_core::annotation;
pub use qtport_core::callbacks;
pub use qtport_core::connections;
pub use qtport_core::declarations;
pub use qtport_core::edit;
pub use qtport_core::error;
pub use qtport_core::files;
pub use qtport_core::includes;
pub use qtport_core::lexer;
pub use qtport_core::output;
pub use qtport_core::pipeline;
pub use qtport_core::signals;
pub use qtport_core::tables;
pub use qtport_core::widget_types;
pub use qtport_core::wrappers;

// Front door
pub mod cli;
