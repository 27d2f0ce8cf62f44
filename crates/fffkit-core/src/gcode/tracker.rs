//! Incremental toolhead state tracking over the command stream
//!
//! The tracker is an explicit, owned state value: construct one per stream
//! walk and feed it every line in order. It never aborts on a bad line; the
//! exclusion rules below decide what each line contributes.

use glam::{DVec2, DVec3};

use super::line::{GcodeLine, LineKind};
use crate::fill::FillType;

/// What one observed line did to the toolhead.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A layer boundary marker. `flushed_layer` is the index of the layer
    /// that just ended (`None` on the very first marker, which only opens
    /// layer 0).
    LayerBoundary {
        /// Index of the layer closed by this marker, if one was open.
        flushed_layer: Option<usize>,
    },
    /// A comment line switched the fill-type context.
    FillTypeChange {
        /// The newly active fill type.
        fill_type: FillType,
    },
    /// A motion line; see [`MoveDelta`] for what it contributed.
    Move(MoveDelta),
    /// Line had no effect on toolhead state.
    Ignored,
}

/// Per-line delta derived from a motion line.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveDelta {
    /// Toolhead position after the line
    pub position: DVec3,
    /// Feedrate after the line (mm/min)
    pub feedrate: f64,
    /// Cumulative extrusion after the line
    pub extrusion: f64,
    /// Extrusion deposited by this line; zero for retracting/repositioning
    /// moves
    pub extrusion_delta: f64,
    /// XY travel distance of this line; zero when X or Y was unspecified
    pub segment_distance: f64,
    /// XY midpoint of the segment (extrusion-weighted center-of-mass sample)
    pub midpoint: DVec2,
    /// Both X and Y were specified on the line
    pub xy_specified: bool,
    /// Line participates in feature accumulation: X/Y specified and the
    /// extrusion value was present and non-retracting
    pub accumulates: bool,
    /// Bead cross-section (width, height) in effect
    pub dimensions: DVec2,
    /// Fill type in effect
    pub fill_type: FillType,
    /// Layer the line belongs to (0 before the first boundary marker)
    pub layer_index: usize,
}

/// Toolhead state advanced line by line over one stream walk.
///
/// Tracks position, feedrate, cumulative extrusion, the current layer and
/// fill-type context, and the bead cross-section announced by tool comments.
/// Content between boundary markers `k` and `k+1` belongs to layer `k`,
/// keeping stream layer indices aligned with the slice stack.
#[derive(Debug, Clone)]
pub struct ToolheadTracker {
    position: DVec3,
    feedrate: f64,
    extrusion: f64,
    dimensions: DVec2,
    fill_type: FillType,
    layers_flushed: usize,
    point_count: usize,
}

impl ToolheadTracker {
    /// Fresh tracker at the stream start.
    pub fn new() -> Self {
        Self {
            position: DVec3::ZERO,
            feedrate: 0.0,
            extrusion: 0.0,
            dimensions: DVec2::ZERO,
            fill_type: FillType::Unknown,
            layers_flushed: 0,
            point_count: 0,
        }
    }

    /// Fresh tracker with the bead cross-section seeded from a profile
    /// (nozzle diameter x layer height) until tool comments override it.
    pub fn with_dimensions(dimensions: DVec2) -> Self {
        Self {
            dimensions,
            ..Self::new()
        }
    }

    /// Current toolhead position.
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Current feedrate (mm/min).
    pub fn feedrate(&self) -> f64 {
        self.feedrate
    }

    /// Cumulative extrusion observed so far.
    pub fn extrusion(&self) -> f64 {
        self.extrusion
    }

    /// Bead cross-section (width, height) in effect.
    pub fn dimensions(&self) -> DVec2 {
        self.dimensions
    }

    /// Fill type in effect.
    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }

    /// Number of boundary markers observed.
    pub fn layers_flushed(&self) -> usize {
        self.layers_flushed
    }

    /// Index of the layer currently being walked; `None` before the first
    /// boundary marker.
    pub fn current_layer(&self) -> Option<usize> {
        self.layers_flushed.checked_sub(1)
    }

    /// Number of lines observed so far.
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Advance the tracker by one line and report what it contributed.
    pub fn observe(&mut self, line: &GcodeLine) -> StreamEvent {
        self.point_count += 1;

        if line.annotation.layer_boundary {
            let flushed_layer = self.layers_flushed.checked_sub(1);
            self.layers_flushed += 1;
            return StreamEvent::LayerBoundary { flushed_layer };
        }

        if let Some(width) = line.annotation.tool_width_mm {
            self.dimensions.x = width;
        }
        if let Some(height) = line.annotation.tool_height_mm {
            self.dimensions.y = height;
        }

        // fill tags are sticky: they switch the context, absence never resets
        let fill_changed = match line.annotation.fill_type {
            Some(fill_type) if fill_type != self.fill_type => {
                self.fill_type = fill_type;
                true
            }
            _ => false,
        };

        if line.kind != LineKind::Motion {
            if fill_changed && line.kind == LineKind::Comment {
                return StreamEvent::FillTypeChange {
                    fill_type: self.fill_type,
                };
            }
            return StreamEvent::Ignored;
        }

        let x = line.param_value('X');
        let y = line.param_value('Y');
        let z = line.param_value('Z');
        let f = line.param_value('F');
        let e = line.param_value('E');

        if let Some(f) = f {
            self.feedrate = f;
        }

        let last_xy = DVec2::new(self.position.x, self.position.y);
        let xy = match (x, y) {
            (Some(x), Some(y)) => Some(DVec2::new(x, y)),
            _ => None,
        };

        let (segment_distance, midpoint) = match xy {
            Some(xy) => (xy.distance(last_xy), (xy + last_xy) * 0.5),
            None => (0.0, last_xy),
        };

        let mut extrusion_delta = 0.0;
        let mut accumulates = false;
        if let Some(e) = e {
            if e >= self.extrusion {
                extrusion_delta = e - self.extrusion;
                accumulates = xy.is_some();
            }
            self.extrusion = e;
        }

        if let Some(xy) = xy {
            self.position.x = xy.x;
            self.position.y = xy.y;
        }
        if let Some(z) = z {
            self.position.z = z;
        }

        StreamEvent::Move(MoveDelta {
            position: self.position,
            feedrate: self.feedrate,
            extrusion: self.extrusion,
            extrusion_delta,
            segment_distance,
            midpoint,
            xy_specified: xy.is_some(),
            accumulates,
            dimensions: self.dimensions,
            fill_type: self.fill_type,
            layer_index: self.layers_flushed.saturating_sub(1),
        })
    }
}

impl Default for ToolheadTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcode::parser::GcodeParser;

    fn observe_all(text: &str) -> (ToolheadTracker, Vec<StreamEvent>) {
        let file = GcodeParser::new().parse_str(text);
        let mut tracker = ToolheadTracker::new();
        let events = file.lines().map(|line| tracker.observe(line)).collect();
        (tracker, events)
    }

    fn move_delta(event: &StreamEvent) -> &MoveDelta {
        match event {
            StreamEvent::Move(delta) => delta,
            other => panic!("expected Move, got {:?}", other),
        }
    }

    #[test]
    fn test_basic_move_delta() {
        let (_, events) = observe_all("G1 X0 Y0 F1200 E0\nG1 X10 Y0 E1");
        let delta = move_delta(&events[1]);
        assert_eq!(delta.segment_distance, 10.0);
        assert_eq!(delta.extrusion_delta, 1.0);
        assert_eq!(delta.midpoint, DVec2::new(5.0, 0.0));
        assert_eq!(delta.feedrate, 1200.0);
        assert!(delta.accumulates);
    }

    #[test]
    fn test_retraction_excluded_but_state_updates() {
        let (tracker, events) = observe_all("G1 X0 Y0 E1\nG1 X5 Y0 E0.5 F900");
        let delta = move_delta(&events[1]);
        assert_eq!(delta.extrusion_delta, 0.0);
        assert!(!delta.accumulates);
        // position, extrusion, and feedrate state still advanced
        assert_eq!(tracker.position().x, 5.0);
        assert_eq!(tracker.extrusion(), 0.5);
        assert_eq!(tracker.feedrate(), 900.0);
    }

    #[test]
    fn test_missing_axis_is_geometrically_inert() {
        let (tracker, events) = observe_all("G1 X0 Y0 E0\nG1 X10 E1 F600");
        let delta = move_delta(&events[1]);
        assert!(!delta.xy_specified);
        assert!(!delta.accumulates);
        assert_eq!(delta.segment_distance, 0.0);
        // F and E still applied, last XY untouched
        assert_eq!(tracker.feedrate(), 600.0);
        assert_eq!(tracker.extrusion(), 1.0);
        assert_eq!(tracker.position().x, 0.0);
    }

    #[test]
    fn test_extrusion_reset_via_g92() {
        let (tracker, events) = observe_all("G1 X0 Y0 E5\nG92 E0\nG1 X10 Y0 E1");
        let delta = move_delta(&events[1]);
        assert_eq!(delta.extrusion_delta, 0.0);
        assert_eq!(tracker.extrusion(), 1.0);
        // counting restarts from the reset value
        let delta = move_delta(&events[2]);
        assert_eq!(delta.extrusion_delta, 1.0);
    }

    #[test]
    fn test_layer_boundaries() {
        let (tracker, events) = observe_all("; layer 0\nG1 X0 Y0 E1\n; layer 1\nG1 X1 Y0 E2");
        assert_eq!(
            events[0],
            StreamEvent::LayerBoundary {
                flushed_layer: None
            }
        );
        assert_eq!(move_delta(&events[1]).layer_index, 0);
        assert_eq!(
            events[2],
            StreamEvent::LayerBoundary {
                flushed_layer: Some(0)
            }
        );
        assert_eq!(move_delta(&events[3]).layer_index, 1);
        assert_eq!(tracker.layers_flushed(), 2);
        assert_eq!(tracker.current_layer(), Some(1));
    }

    #[test]
    fn test_fill_type_context() {
        let (_, events) = observe_all("; feature Fill Type 256\nG1 X0 Y0 E1\n; plain comment\nG1 X1 Y0 E2");
        assert_eq!(
            events[0],
            StreamEvent::FillTypeChange {
                fill_type: FillType::SolidInfill
            }
        );
        // sticky across untagged comments
        assert_eq!(move_delta(&events[3]).fill_type, FillType::SolidInfill);
    }

    #[test]
    fn test_tool_dimensions_update() {
        let (tracker, _) = observe_all("; tool H0.3 W0.5\nG1 X0 Y0 E1");
        assert_eq!(tracker.dimensions(), DVec2::new(0.5, 0.3));
    }

    #[test]
    fn test_point_count() {
        let (tracker, _) = observe_all("; layer 0\nG1 X0 Y0 E1\nM104 S200");
        assert_eq!(tracker.point_count(), 3);
    }
}
