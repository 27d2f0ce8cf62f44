//! Toolpath preview construction over the command stream
//!
//! A single-threaded stream walk assembles continuous extrusion runs; each
//! finalized run is handed to the job executor for mesh construction and
//! delivered to the sink tagged with its layer. Travel moves are reported
//! synchronously as two-point lines.

use std::sync::Arc;

use glam::DVec2;
use tracing::debug;

use fffkit_core::gcode::{GcodeFile, GcodeLine, StreamEvent, ToolheadTracker};
use fffkit_core::PrintProfile;

use crate::jobs::{JobExecutor, PreviewSink};
use crate::joints::build_run_mesh;
use crate::vertex::PrintVertex;

/// Assembles continuous extrusion runs into ribbon meshes.
///
/// State machine per observed line:
/// - no open run: increasing extrusion opens a run seeded with the previous
///   vertex; otherwise the line is a travel move, reported immediately
/// - open run: increasing extrusion appends; a non-increasing line closes
///   the run (excluding that line's vertex) and triggers emission
/// - a layer boundary or the end of the stream closes any open run
pub struct BeadPreviewBuilder {
    tracker: ToolheadTracker,
    run: Option<Vec<PrintVertex>>,
    last_vertex: PrintVertex,
    position_shift: DVec2,
    sink: Arc<dyn PreviewSink>,
    executor: Arc<dyn JobExecutor>,
}

impl BeadPreviewBuilder {
    /// Start a new stream walk. The profile supplies the bed-origin shift
    /// and the default bead cross-section.
    pub fn new(
        profile: &PrintProfile,
        sink: Arc<dyn PreviewSink>,
        executor: Arc<dyn JobExecutor>,
    ) -> Self {
        let tracker = ToolheadTracker::with_dimensions(profile.bead_dimensions());
        let last_vertex = PrintVertex {
            dimensions: profile.bead_dimensions(),
            ..PrintVertex::default()
        };
        Self {
            tracker,
            run: None,
            last_vertex,
            position_shift: profile.position_shift(),
            sink,
            executor,
        }
    }

    /// Observe one line of the stream.
    pub fn observe_line(&mut self, line: &GcodeLine) {
        match self.tracker.observe(line) {
            StreamEvent::LayerBoundary { flushed_layer } => {
                if let Some(run) = self.run.take() {
                    self.emit(run, flushed_layer.unwrap_or(0));
                }
                let layer = self.tracker.current_layer().unwrap_or(0);
                self.sink.progress(&format!("previewing layer {}", layer));
            }
            StreamEvent::Move(delta) => {
                let vertex = PrintVertex {
                    position: delta.position,
                    feedrate: delta.feedrate,
                    extrusion: delta.extrusion,
                    dimensions: delta.dimensions,
                    fill_type: delta.fill_type,
                };

                let increasing = delta.extrusion > self.last_vertex.extrusion;
                match self.run.take() {
                    None if increasing => {
                        // run opens retroactively at the previous vertex
                        let mut seed = self.last_vertex;
                        seed.fill_type = delta.fill_type;
                        self.run = Some(vec![seed, vertex]);
                    }
                    None => {
                        self.sink.travel_ready(
                            vec![self.last_vertex.position, vertex.position],
                            delta.layer_index,
                        );
                    }
                    Some(mut run) if increasing => {
                        run.push(vertex);
                        self.run = Some(run);
                    }
                    Some(run) => self.emit(run, delta.layer_index),
                }
            }
            StreamEvent::FillTypeChange { .. } | StreamEvent::Ignored => {}
        }

        self.last_vertex = PrintVertex {
            position: self.tracker.position(),
            feedrate: self.tracker.feedrate(),
            extrusion: self.tracker.extrusion(),
            dimensions: self.tracker.dimensions(),
            fill_type: self.tracker.fill_type(),
        };
    }

    /// Close any open run. Call exactly once, after the last line.
    pub fn end_stream(&mut self) {
        if let Some(run) = self.run.take() {
            let layer_index = self.tracker.current_layer().unwrap_or(0);
            self.emit(run, layer_index);
        }
    }

    /// Walk a whole parsed document.
    pub fn process_file(&mut self, file: &GcodeFile) {
        for line in file.lines() {
            self.observe_line(line);
        }
        self.end_stream();
    }

    fn emit(&self, run: Vec<PrintVertex>, layer_index: usize) {
        if run.len() < 2 {
            return;
        }
        debug!(
            layer_index,
            vertices = run.len(),
            "finalized extrusion run"
        );

        let start_point_index = self.tracker.point_count().saturating_sub(run.len());
        let position_shift = self.position_shift;
        let sink = Arc::clone(&self.sink);
        self.executor.submit(Box::new(move || {
            let mesh = build_run_mesh(&run, layer_index, position_shift, start_point_index);
            sink.mesh_ready(mesh);
        }));
    }
}
