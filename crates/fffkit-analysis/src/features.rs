//! Per-layer, per-fill-type feature accumulation
//!
//! A layer is divided into sub-layers by fill type; each gets an aggregate
//! physical descriptor accumulated over the stream walk.

use std::collections::HashMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use fffkit_core::gcode::{GcodeFile, GcodeLine, StreamEvent, ToolheadTracker};
use fffkit_core::{Aabb2, FillType};

/// Aggregate physical descriptor for one (layer, fill type) bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInfo {
    /// Bounding box of deposited points, empty until the first point
    pub bounding_box: Aabb2,
    /// Cumulative extrusion amount
    pub extrusion: f64,
    /// Cumulative travel distance while depositing
    pub distance: f64,
    /// Cumulative duration while depositing
    pub duration: f64,
    /// Sum of extrusion-weighted segment midpoints. Kept unscaled so it can
    /// be accumulated incrementally; divide by `extrusion` for the true
    /// center of mass.
    pub unscaled_center_of_mass: DVec2,
}

impl FeatureInfo {
    fn new() -> Self {
        Self {
            bounding_box: Aabb2::EMPTY,
            extrusion: 0.0,
            distance: 0.0,
            duration: 0.0,
            unscaled_center_of_mass: DVec2::ZERO,
        }
    }

    /// True center of mass, or `None` when no extrusion was accumulated
    /// (the value is undefined, never NaN).
    pub fn center_of_mass(&self) -> Option<DVec2> {
        if self.extrusion > 0.0 {
            Some(self.unscaled_center_of_mass / self.extrusion)
        } else {
            None
        }
    }
}

impl Default for FeatureInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// A malformed-input condition observed during accumulation: a depositing
/// move with zero feedrate. The duration contribution is skipped and the
/// condition recorded instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Degeneracy {
    /// Layer the move was on
    pub layer_index: usize,
    /// Fill type in effect
    pub fill_type: FillType,
    /// Source line number of the move
    pub line_number: u32,
}

/// End-of-stream result of a feature accumulation walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerFeatures {
    /// One fill-type map per flushed layer, in layer order
    pub layers: Vec<HashMap<FillType, FeatureInfo>>,
    /// Malformed-input conditions observed during the walk
    pub degeneracies: Vec<Degeneracy>,
}

impl LayerFeatures {
    /// Number of flushed layer contexts.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Accumulate a whole parsed document.
    pub fn accumulate(file: &GcodeFile) -> Self {
        let mut accumulator = FeatureAccumulator::new();
        for line in file.lines() {
            accumulator.observe(line);
        }
        accumulator.finish()
    }
}

/// Walks a command stream and builds a [`LayerFeatures`] map.
///
/// Motion before the first layer boundary marker (priming moves) is ignored;
/// each boundary marker flushes the open layer and starts a fresh one.
#[derive(Debug, Default)]
pub struct FeatureAccumulator {
    tracker: ToolheadTracker,
    layers: Vec<HashMap<FillType, FeatureInfo>>,
    current: Option<HashMap<FillType, FeatureInfo>>,
    degeneracies: Vec<Degeneracy>,
}

impl FeatureAccumulator {
    /// Fresh accumulator at the stream start.
    pub fn new() -> Self {
        Self {
            tracker: ToolheadTracker::new(),
            layers: Vec::new(),
            current: None,
            degeneracies: Vec::new(),
        }
    }

    /// Observe one line of the stream.
    pub fn observe(&mut self, line: &GcodeLine) {
        match self.tracker.observe(line) {
            StreamEvent::LayerBoundary { .. } => {
                if let Some(layer) = self.current.take() {
                    self.layers.push(layer);
                }
                self.current = Some(HashMap::new());
            }
            StreamEvent::Move(delta) if delta.accumulates => {
                let Some(current) = self.current.as_mut() else {
                    return;
                };
                let info = current.entry(delta.fill_type).or_default();

                info.bounding_box
                    .contain(DVec2::new(delta.position.x, delta.position.y));
                info.extrusion += delta.extrusion_delta;
                info.distance += delta.segment_distance;
                info.unscaled_center_of_mass += delta.midpoint * delta.extrusion_delta;

                if delta.feedrate > 0.0 {
                    info.duration += delta.segment_distance / delta.feedrate;
                } else if delta.segment_distance > 0.0 {
                    warn!(
                        line_number = line.line_number,
                        layer_index = delta.layer_index,
                        "zero feedrate on a depositing move, skipping duration"
                    );
                    self.degeneracies.push(Degeneracy {
                        layer_index: delta.layer_index,
                        fill_type: delta.fill_type,
                        line_number: line.line_number,
                    });
                }
            }
            _ => {}
        }
    }

    /// Flush the open layer and return the accumulated features.
    pub fn finish(mut self) -> LayerFeatures {
        if let Some(layer) = self.current.take() {
            self.layers.push(layer);
        }
        LayerFeatures {
            layers: self.layers,
            degeneracies: self.degeneracies,
        }
    }
}
