//! Toolpath preview mesh construction
//!
//! This crate turns a G-code command stream into renderable extruded-ribbon
//! meshes:
//! - A state machine assembles continuous extrusion runs from the stream walk
//! - Each finalized run becomes a quad tube with miter or bevel corner joins
//! - Mesh construction runs off the stream-walking path; completed buffers
//!   are delivered to a caller-provided sink, tagged by layer

pub mod builder;
pub mod jobs;
pub mod joints;
pub mod vertex;

pub use builder::BeadPreviewBuilder;
pub use jobs::{BackgroundExecutor, InlineExecutor, JobExecutor, NoOpPreviewSink, PreviewSink};
pub use joints::{build_run_mesh, is_sharp, SHARP_TURN_THRESHOLD_RAD};
pub use vertex::{PreviewMesh, PreviewVertex, PrintVertex};
