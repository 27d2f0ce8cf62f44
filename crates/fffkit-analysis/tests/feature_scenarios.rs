//! End-to-end accumulation and comparison scenarios

use fffkit_analysis::{compare_gcode, CompareTolerances, FeatureInfo, LayerFeatures};
use fffkit_core::gcode::GcodeParser;
use fffkit_core::FillType;
use glam::DVec2;

fn build_three_layer_stream() -> String {
    // three layers, one Unknown feature each, two points 10mm apart,
    // extrusion increasing by 1.0 per depositing move at 1200 mm/min; the
    // head ping-pongs so each layer starts where the previous one ended
    let mut text = String::new();
    let mut e = 0.0;
    let mut x = 0;
    for layer in 0..3 {
        text.push_str(&format!("; layer {}\n", layer));
        text.push_str(&format!("G1 X{} Y0 F1200 E{}\n", x, e));
        e += 1.0;
        x = if x == 0 { 10 } else { 0 };
        text.push_str(&format!("G1 X{} Y0 E{}\n", x, e));
    }
    text
}

#[test]
fn three_layer_scenario_descriptors() {
    let file = GcodeParser::new().parse_str(&build_three_layer_stream());
    let features = LayerFeatures::accumulate(&file);

    assert_eq!(features.layer_count(), 3);
    for layer in &features.layers {
        assert_eq!(layer.len(), 1);
        let info: &FeatureInfo = &layer[&FillType::Unknown];

        assert!((info.distance - 10.0).abs() < 1e-12);
        assert!((info.extrusion - 1.0).abs() < 1e-12);
        assert!((info.duration - 10.0 / 1200.0).abs() < 1e-12);

        // both endpoints of the pass are contained
        assert_eq!(info.bounding_box.min, DVec2::new(0.0, 0.0));
        assert_eq!(info.bounding_box.max, DVec2::new(10.0, 0.0));
    }
}

#[test]
fn comparing_a_stream_against_itself_succeeds() {
    let text = build_three_layer_stream();
    let a = GcodeParser::new().parse_str(&text);
    let b = GcodeParser::new().parse_str(&text);
    assert!(compare_gcode(&a, &b, &CompareTolerances::default()).is_ok());
}

#[test]
fn first_move_of_each_layer_counts_from_previous_position() {
    // the seed move of layer 1 starts where layer 0 ended
    let text = "; layer 0\nG1 X0 Y0 F1200 E0\nG1 X10 Y0 E1\n; layer 1\nG1 X10 Y10 E2\n";
    let file = GcodeParser::new().parse_str(text);
    let features = LayerFeatures::accumulate(&file);

    let info = &features.layers[1][&FillType::Unknown];
    assert!((info.distance - 10.0).abs() < 1e-12);
    assert_eq!(info.center_of_mass(), Some(DVec2::new(10.0, 5.0)));
}
