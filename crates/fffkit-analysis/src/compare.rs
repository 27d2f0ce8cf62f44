//! Tolerance-based comparison of accumulated feature maps
//!
//! Stateless and re-entrant: the comparator reads its two input maps and
//! raises the first typed failure it finds, in a fixed order (layer count,
//! feature key sets, then per-metric tolerances).

use fffkit_core::gcode::GcodeFile;
use fffkit_core::FillType;

use crate::error::{AnalysisError, Result, Side};
use crate::features::{FeatureInfo, LayerFeatures};

/// Tolerances for feature comparison.
///
/// Each metric is compared with an error-fraction rule: differences below
/// `absolute_floor` are accepted outright (protects near-zero values from
/// fraction blow-up); larger differences must keep `|result - expected| /
/// result` within the per-metric tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareTolerances {
    /// Absolute difference accepted regardless of fraction, in source units
    pub absolute_floor: f64,
    /// Allowed error fraction for bounding-box coordinates
    pub bounding_box: f64,
    /// Allowed error fraction for center-of-mass coordinates
    pub center_of_mass: f64,
    /// Allowed error fraction for cumulative extrusion
    pub extrusion: f64,
    /// Allowed error fraction for cumulative distance
    pub distance: f64,
    /// Allowed error fraction for cumulative duration
    pub duration: f64,
}

impl Default for CompareTolerances {
    fn default() -> Self {
        Self {
            absolute_floor: 1.0,
            bounding_box: 1e-4,
            center_of_mass: 1e-4,
            extrusion: 1e-4,
            distance: 1e-4,
            duration: 1e-4,
        }
    }
}

/// Compare two accumulated feature maps.
///
/// Fails fast: a layer-count or feature-key mismatch aborts before any
/// scalar comparison runs.
pub fn compare_layers(
    result: &LayerFeatures,
    expected: &LayerFeatures,
    tolerances: &CompareTolerances,
) -> Result<()> {
    if result.layer_count() != expected.layer_count() {
        return Err(AnalysisError::LayerCountMismatch {
            result: result.layer_count(),
            expected: expected.layer_count(),
        });
    }

    for (layer_index, (result_layer, expected_layer)) in
        result.layers.iter().zip(expected.layers.iter()).enumerate()
    {
        for fill_type in result_layer.keys() {
            if !expected_layer.contains_key(fill_type) {
                return Err(AnalysisError::MissingFeature {
                    layer_index,
                    fill_type: *fill_type,
                    missing_in: Side::Expected,
                });
            }
        }
        for fill_type in expected_layer.keys() {
            if !result_layer.contains_key(fill_type) {
                return Err(AnalysisError::MissingFeature {
                    layer_index,
                    fill_type: *fill_type,
                    missing_in: Side::Result,
                });
            }
        }
    }

    for (layer_index, (result_layer, expected_layer)) in
        result.layers.iter().zip(expected.layers.iter()).enumerate()
    {
        for (fill_type, result_info) in result_layer {
            let expected_info = &expected_layer[fill_type];
            compare_features(
                result_info,
                expected_info,
                layer_index,
                *fill_type,
                tolerances,
            )?;
        }
    }

    Ok(())
}

/// Accumulate two parsed documents and compare the results.
pub fn compare_gcode(
    result: &GcodeFile,
    expected: &GcodeFile,
    tolerances: &CompareTolerances,
) -> Result<()> {
    compare_layers(
        &LayerFeatures::accumulate(result),
        &LayerFeatures::accumulate(expected),
        tolerances,
    )
}

fn compare_features(
    result: &FeatureInfo,
    expected: &FeatureInfo,
    layer_index: usize,
    fill_type: FillType,
    tolerances: &CompareTolerances,
) -> Result<()> {
    let bbox_metrics: [(&'static str, f64, f64); 4] = [
        (
            "maximum x",
            result.bounding_box.max.x,
            expected.bounding_box.max.x,
        ),
        (
            "maximum y",
            result.bounding_box.max.y,
            expected.bounding_box.max.y,
        ),
        (
            "minimum x",
            result.bounding_box.min.x,
            expected.bounding_box.min.x,
        ),
        (
            "minimum y",
            result.bounding_box.min.y,
            expected.bounding_box.min.y,
        ),
    ];
    for (metric, r, e) in bbox_metrics {
        if let Some(error_fraction) = error_fraction(r, e, tolerances.bounding_box, tolerances) {
            return Err(AnalysisError::FeatureBoundingBoxMismatch {
                layer_index,
                fill_type,
                metric,
                result: r,
                expected: e,
                error_fraction,
            });
        }
    }

    let result_com = result
        .center_of_mass()
        .ok_or_else(|| degenerate_center_of_mass(layer_index, fill_type))?;
    let expected_com = expected
        .center_of_mass()
        .ok_or_else(|| degenerate_center_of_mass(layer_index, fill_type))?;
    for (metric, r, e) in [
        ("x", result_com.x, expected_com.x),
        ("y", result_com.y, expected_com.y),
    ] {
        if let Some(error_fraction) = error_fraction(r, e, tolerances.center_of_mass, tolerances) {
            return Err(AnalysisError::FeatureCenterOfMassMismatch {
                layer_index,
                fill_type,
                metric,
                result: r,
                expected: e,
                error_fraction,
            });
        }
    }

    if let Some(error_fraction) = error_fraction(
        result.extrusion,
        expected.extrusion,
        tolerances.extrusion,
        tolerances,
    ) {
        return Err(AnalysisError::FeatureCumulativeExtrusionMismatch {
            layer_index,
            fill_type,
            result: result.extrusion,
            expected: expected.extrusion,
            error_fraction,
        });
    }

    if let Some(error_fraction) = error_fraction(
        result.distance,
        expected.distance,
        tolerances.distance,
        tolerances,
    ) {
        return Err(AnalysisError::FeatureCumulativeDistanceMismatch {
            layer_index,
            fill_type,
            result: result.distance,
            expected: expected.distance,
            error_fraction,
        });
    }

    if let Some(error_fraction) = error_fraction(
        result.duration,
        expected.duration,
        tolerances.duration,
        tolerances,
    ) {
        return Err(AnalysisError::FeatureCumulativeDurationMismatch {
            layer_index,
            fill_type,
            result: result.duration,
            expected: expected.duration,
            error_fraction,
        });
    }

    Ok(())
}

fn degenerate_center_of_mass(layer_index: usize, fill_type: FillType) -> AnalysisError {
    AnalysisError::DegenerateAccumulation {
        layer_index,
        fill_type,
        reason: "center of mass requested with zero accumulated extrusion".to_string(),
    }
}

/// `None` when the metric is within tolerance, else the offending fraction.
fn error_fraction(
    result: f64,
    expected: f64,
    tolerance: f64,
    tolerances: &CompareTolerances,
) -> Option<f64> {
    if (result - expected).abs() < tolerances.absolute_floor {
        return None;
    }
    let fraction = ((result - expected) / result).abs();
    if fraction > tolerance {
        Some(fraction)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fffkit_core::gcode::GcodeParser;

    fn accumulate(text: &str) -> LayerFeatures {
        LayerFeatures::accumulate(&GcodeParser::new().parse_str(text))
    }

    const STREAM: &str = "; layer 0\n; feature Fill Type 1\nG1 X0 Y0 F1200 E0\nG1 X50 Y0 E2\n; layer 1\nG1 X50 Y50 E4\n";

    #[test]
    fn test_equal_inputs_match() {
        let features = accumulate(STREAM);
        assert!(compare_layers(&features, &features, &CompareTolerances::default()).is_ok());
    }

    #[test]
    fn test_layer_count_mismatch_fails_first() {
        let result = accumulate("; layer 0\nG1 X0 Y0 F600 E0\nG1 X5 Y0 E1\n");
        let expected = accumulate(STREAM);
        assert_eq!(
            compare_layers(&result, &expected, &CompareTolerances::default()),
            Err(AnalysisError::LayerCountMismatch {
                result: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn test_missing_feature_both_directions() {
        // two fill types vs the Unknown subset of the same layer
        let with_shell = accumulate(
            "; layer 0\nG1 X0 Y0 F1200 E0\nG1 X25 Y0 E1\n; feature Fill Type 1\nG1 X50 Y0 E2\n",
        );
        let only_unknown = accumulate("; layer 0\nG1 X0 Y0 F1200 E0\nG1 X25 Y0 E1\n");

        let err =
            compare_layers(&with_shell, &only_unknown, &CompareTolerances::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingFeature {
                missing_in: Side::Expected,
                ..
            }
        ));

        let err =
            compare_layers(&only_unknown, &with_shell, &CompareTolerances::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingFeature {
                missing_in: Side::Result,
                ..
            }
        ));
    }

    #[test]
    fn test_metric_mismatch_detected() {
        let result = accumulate("; layer 0\nG1 X0 Y0 F1200 E0\nG1 X200 Y0 E2\n");
        let expected = accumulate("; layer 0\nG1 X0 Y0 F1200 E0\nG1 X50 Y0 E2\n");
        let err = compare_layers(&result, &expected, &CompareTolerances::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::FeatureBoundingBoxMismatch {
                metric: "maximum x",
                ..
            }
        ));
    }

    #[test]
    fn test_absolute_floor_accepts_small_differences() {
        // 0.4 vs 0.1: the fraction (0.75) is enormous but the difference is
        // below the 1.0 floor
        let tolerances = CompareTolerances::default();
        assert_eq!(error_fraction(0.4, 0.1, 1e-4, &tolerances), None);
        // above the floor the fraction rule applies
        assert!(error_fraction(10.0, 8.0, 1e-4, &tolerances).is_some());
    }
}
