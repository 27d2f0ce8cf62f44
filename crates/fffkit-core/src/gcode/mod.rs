//! G-code command stream model and stateful walk
//!
//! This module provides:
//! - Typed command line representation
//! - Comment annotation extraction (layer markers, fill tags, tool dimensions)
//! - Text parsing and writing
//! - Incremental toolhead state tracking

pub mod line;
pub mod parser;
pub mod tracker;
pub mod writer;

pub use line::{GcodeFile, GcodeLine, GcodeParam, GcodeWord, LineAnnotation, LineKind};
pub use parser::GcodeParser;
pub use tracker::{MoveDelta, StreamEvent, ToolheadTracker};
pub use writer::GcodeWriter;
