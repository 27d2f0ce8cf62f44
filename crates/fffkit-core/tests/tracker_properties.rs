//! Property tests for the toolhead state tracker

use fffkit_core::gcode::{GcodeParser, StreamEvent, ToolheadTracker};
use proptest::prelude::*;

fn arbitrary_moves() -> impl Strategy<Value = Vec<(f64, f64, f64, f64)>> {
    // (x, y, e, f) tuples with extrusion free to go up or down
    prop::collection::vec(
        (
            -100.0..100.0f64,
            -100.0..100.0f64,
            -10.0..10.0f64,
            1.0..6000.0f64,
        ),
        1..40,
    )
}

proptest! {
    /// Any motion line whose extrusion value is below the last observed one
    /// contributes nothing, but position and feedrate state still advance.
    #[test]
    fn monotonic_exclusion(moves in arbitrary_moves()) {
        let mut text = String::new();
        for (x, y, e, f) in &moves {
            text.push_str(&format!("G1 X{:.3} Y{:.3} E{:.4} F{:.1}\n", x, y, e, f));
        }
        let file = GcodeParser::new().parse_str(&text);

        let mut tracker = ToolheadTracker::new();
        let mut last_extrusion = 0.0f64;
        for line in file.lines() {
            let before = last_extrusion;
            match tracker.observe(line) {
                StreamEvent::Move(delta) => {
                    let e = line.param_value('E').unwrap();
                    if e < before {
                        prop_assert_eq!(delta.extrusion_delta, 0.0);
                        prop_assert!(!delta.accumulates);
                    } else {
                        prop_assert!(delta.extrusion_delta >= 0.0);
                    }
                    // state always advances regardless of exclusion
                    prop_assert_eq!(delta.position.x, line.param_value('X').unwrap());
                    prop_assert_eq!(delta.position.y, line.param_value('Y').unwrap());
                    prop_assert_eq!(delta.feedrate, line.param_value('F').unwrap());
                    last_extrusion = e;
                }
                other => prop_assert!(false, "expected Move, got {:?}", other),
            }
        }
    }

    /// Cumulative extrusion deltas over a walk are non-negative, so any
    /// feature accumulated from them is monotonically non-decreasing.
    #[test]
    fn extrusion_deltas_never_negative(moves in arbitrary_moves()) {
        let mut text = String::new();
        for (x, y, e, f) in &moves {
            text.push_str(&format!("G1 X{:.3} Y{:.3} E{:.4} F{:.1}\n", x, y, e, f));
        }
        let file = GcodeParser::new().parse_str(&text);

        let mut tracker = ToolheadTracker::new();
        for line in file.lines() {
            if let StreamEvent::Move(delta) = tracker.observe(line) {
                prop_assert!(delta.extrusion_delta >= 0.0);
                prop_assert!(delta.segment_distance >= 0.0);
            }
        }
    }
}
