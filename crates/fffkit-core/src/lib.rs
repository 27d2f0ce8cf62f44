//! Core types and stream model for fffkit
//!
//! This crate provides:
//! - Typed G-code line representation (command words, parameters, annotations)
//! - Text parsing and writing for the command stream
//! - Incremental toolhead state tracking over a stream walk
//! - Fill-type classification of extrusion moves
//! - Shared geometry primitives and the consumed print profile

pub mod error;
pub mod fill;
pub mod gcode;
pub mod geom;
pub mod profile;

pub use error::{CoreError, Result};
pub use fill::FillType;
pub use gcode::{
    GcodeFile, GcodeLine, GcodeParam, GcodeParser, GcodeWord, GcodeWriter, LineAnnotation,
    LineKind, MoveDelta, StreamEvent, ToolheadTracker,
};
pub use geom::Aabb2;
pub use profile::PrintProfile;
