//! Core engine for qtport.
//!
//! This crate rewrites FLTK callback code into Qt signal/slot code by
//! working on source text, not on a syntax tree:
//! - Lexer and text edits shared by every step
//! - FLTK/Qt correspondence tables
//! - Header steps: includes, widget types, callback declarations, slots
//!   section, `Q_OBJECT`
//! - Implementation steps: callback extraction, signal inference, `connect`
//!   synthesis, trampoline removal
//! - Pipelines, report types, file I/O and error types

pub mod annotation;
pub mod callbacks;
pub mod connections;
pub mod declarations;
pub mod edit;
pub mod error;
pub mod files;
pub mod includes;
pub mod lexer;
pub mod output;
pub mod pipeline;
pub mod signals;
pub mod tables;
pub mod widget_types;
pub mod wrappers;
